//! Quantification intensité → index de ramp, avec ou sans tramage.
//!
//! Quatre modes : arrondi direct, Bayer 8×8 ordonné, et deux diffusions
//! d'erreur (Floyd-Steinberg, Atkinson).
//!
//! Diffusion order is part of the contract: pixels are visited row-major,
//! left to right then top to bottom, and error only flows to cells that have
//! not been visited yet. Changing the scan order changes the output.

use af_core::config::DitherMode;
use af_core::frame::{IntensityBuffer, LevelBuffer};
use rayon::prelude::*;

/// Matrice de Bayer 8x8. Normalisée sur 64 niveaux (0-63).
pub const BAYER_8X8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Amplitude du bruit ordonné, en paliers de quantification.
/// 1.0 = le seuil couvre exactement un palier (±0.5).
pub const ORDERED_STRENGTH: f32 = 1.0;

/// Error diffusion kernel: `(dx, dy, weight)` taps relative to the current pixel.
#[derive(Clone, Copy, Debug)]
pub struct DiffusionKernel {
    /// Forward neighbours only (dy > 0, or dy == 0 and dx > 0).
    pub taps: &'static [(isize, usize, f32)],
}

impl DiffusionKernel {
    /// Fraction of the quantization error pushed to neighbours.
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.taps.iter().map(|&(_, _, w)| w).sum()
    }
}

/// Floyd-Steinberg : 7/16 droite, 3/16 bas-gauche, 5/16 bas, 1/16 bas-droite.
pub const FLOYD_STEINBERG: DiffusionKernel = DiffusionKernel {
    taps: &[
        (1, 0, 7.0 / 16.0),
        (-1, 1, 3.0 / 16.0),
        (0, 1, 5.0 / 16.0),
        (1, 1, 1.0 / 16.0),
    ],
};

/// Atkinson : 1/8 sur six voisins, les 2/8 restants sont perdus.
pub const ATKINSON: DiffusionKernel = DiffusionKernel {
    taps: &[
        (1, 0, 1.0 / 8.0),
        (2, 0, 1.0 / 8.0),
        (-1, 1, 1.0 / 8.0),
        (0, 1, 1.0 / 8.0),
        (1, 1, 1.0 / 8.0),
        (0, 2, 1.0 / 8.0),
    ],
};

/// Maps intensities onto `N` evenly spaced ramp levels.
///
/// # Example
/// ```
/// use af_ascii::dither::Quantizer;
/// let q = Quantizer::new(10);
/// assert_eq!(q.index_of(0.0), 0);
/// assert_eq!(q.index_of(255.0), 9);
/// assert_eq!(q.index_of(1000.0), 9);
/// assert_eq!(Quantizer::new(1).index_of(255.0), 0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Quantizer {
    max_index: usize,
    step: f32,
}

impl Quantizer {
    /// Quantizer for a ramp of `ramp_len` characters.
    #[must_use]
    pub fn new(ramp_len: usize) -> Self {
        let max_index = ramp_len.saturating_sub(1);
        // N = 1 : diviseur gardé à 1, toujours l'index 0
        let divisor = max_index.max(1) as f32;
        Self {
            max_index,
            step: 255.0 / divisor,
        }
    }

    /// Nearest level for an intensity. Input is clamped to [0, 255] first.
    #[inline(always)]
    #[must_use]
    pub fn index_of(&self, value: f32) -> usize {
        let v = value.clamp(0.0, 255.0);
        ((v / self.step).round() as usize).min(self.max_index)
    }

    /// Intensity represented by a level.
    #[inline(always)]
    #[must_use]
    pub fn level_intensity(&self, index: usize) -> f32 {
        index.min(self.max_index) as f32 * self.step
    }

    /// Distance between two adjacent levels.
    #[inline(always)]
    #[must_use]
    pub fn step(&self) -> f32 {
        self.step
    }
}

/// Quantize a buffer into ramp indices according to `mode`.
///
/// Error-diffusion modes consume the buffer as scratch space: once this
/// returns, each cell holds the intensity of the level it was assigned.
///
/// # Example
/// ```
/// use af_core::config::DitherMode;
/// use af_core::frame::IntensityBuffer;
/// use af_ascii::dither::dither;
///
/// let mut buf = IntensityBuffer::filled(4, 4, 255.0);
/// let levels = dither(&mut buf, 10, DitherMode::None);
/// assert!(levels.levels.iter().all(|&i| i == 9));
/// ```
pub fn dither(buffer: &mut IntensityBuffer, ramp_len: usize, mode: DitherMode) -> LevelBuffer {
    let q = Quantizer::new(ramp_len);
    let levels = match mode {
        DitherMode::None => quantize_rows(buffer, |v, _, _| q.index_of(v)),
        DitherMode::Ordered => quantize_rows(buffer, |v, x, y| ordered_index(v, x, y, q)),
        DitherMode::FloydSteinberg => diffuse(buffer, q, &FLOYD_STEINBERG),
        DitherMode::Atkinson => diffuse(buffer, q, &ATKINSON),
    };
    LevelBuffer {
        levels,
        width: buffer.width,
        height: buffer.height,
    }
}

/// Bayer 8×8 : décale l'intensité d'au plus un demi-palier avant quantification.
///
/// Deterministic in `(value, x, y)`; no state is carried between pixels.
/// Pure black and pure white are left untouched so flat extremes do not
/// pick up a pattern.
///
/// # Example
/// ```
/// use af_ascii::dither::{ordered_index, Quantizer};
/// let q = Quantizer::new(2);
/// let a = ordered_index(128.0, 3, 5, q);
/// assert_eq!(a, ordered_index(128.0, 3, 5, q));
/// assert_eq!(ordered_index(255.0, 0, 0, q), 1);
/// ```
#[inline(always)]
#[must_use]
pub fn ordered_index(value: f32, x: usize, y: usize, q: Quantizer) -> usize {
    let v = value.clamp(0.0, 255.0);
    // Seuls le noir et le blanc purs sont exclus : sinon round(0.5) = 1
    // poserait un point sur la case de seuil maximal.
    if v <= 0.0 || v >= 255.0 {
        return q.index_of(v);
    }
    // Seuil normalisé sur [0, 255], centré autour de 127.5
    let threshold = f32::from(BAYER_8X8[y % 8][x % 8]) * 255.0 / 63.0;
    let offset = (threshold - 127.5) / 255.0 * q.step() * ORDERED_STRENGTH;
    q.index_of((v + offset).clamp(0.0, 255.0))
}

/// Stateless per-pixel quantization, parallel over rows.
fn quantize_rows<F>(buffer: &IntensityBuffer, f: F) -> Vec<usize>
where
    F: Fn(f32, usize, usize) -> usize + Sync,
{
    let width = buffer.width;
    let mut levels = vec![0usize; buffer.data.len()];
    if width == 0 {
        return levels;
    }
    levels
        .par_chunks_mut(width)
        .zip(buffer.data.par_chunks(width))
        .enumerate()
        .for_each(|(y, (out, row))| {
            for (x, (slot, &v)) in out.iter_mut().zip(row).enumerate() {
                *slot = f(v, x, y);
            }
        });
    levels
}

/// Sequential row-major error diffusion. Out-of-bounds taps are dropped.
fn diffuse(buffer: &mut IntensityBuffer, q: Quantizer, kernel: &DiffusionKernel) -> Vec<usize> {
    let (width, height) = (buffer.width, buffer.height);
    let mut levels = Vec::with_capacity(width * height);

    for y in 0..height {
        for x in 0..width {
            let value = buffer.get(x, y).clamp(0.0, 255.0);
            let index = q.index_of(value);
            let quantized = q.level_intensity(index);
            buffer.set(x, y, quantized);
            levels.push(index);

            let error = value - quantized;
            if error == 0.0 {
                continue;
            }
            for &(dx, dy, weight) in kernel.taps {
                let nx = x as isize + dx;
                let ny = y + dy;
                if nx < 0 || nx as usize >= width || ny >= height {
                    continue;
                }
                buffer.data[ny * width + nx as usize] += error * weight;
            }
        }
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [DitherMode; 4] = [
        DitherMode::None,
        DitherMode::Ordered,
        DitherMode::FloydSteinberg,
        DitherMode::Atkinson,
    ];

    /// Pseudo-random buffer, including values outside [0, 255].
    fn noisy_buffer(width: usize, height: usize, seed: u32) -> IntensityBuffer {
        let mut state = seed;
        let data = (0..width * height)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
                ((state >> 16) % 400) as f32 - 70.0
            })
            .collect();
        IntensityBuffer::from_vec(width, height, data).unwrap()
    }

    #[test]
    fn indices_always_within_ramp() {
        for n in 1..=12 {
            for mode in MODES {
                for seed in 0..4 {
                    let mut buf = noisy_buffer(9, 7, seed);
                    let levels = dither(&mut buf, n, mode);
                    assert_eq!(levels.levels.len(), 63);
                    assert!(
                        levels.levels.iter().all(|&i| i < n),
                        "index hors ramp pour {mode:?}, N={n}"
                    );
                }
            }
        }
    }

    #[test]
    fn single_char_ramp_is_constant() {
        for mode in MODES {
            let mut buf = noisy_buffer(5, 5, 7);
            let levels = dither(&mut buf, 1, mode);
            assert!(levels.levels.iter().all(|&i| i == 0));
        }
    }

    #[test]
    fn kernel_weight_sums() {
        assert!((FLOYD_STEINBERG.total_weight() - 1.0).abs() < 1e-6);
        assert!((ATKINSON.total_weight() - 0.75).abs() < 1e-6);
        assert!(ATKINSON.total_weight() < 1.0);
    }

    #[test]
    fn kernels_only_reach_unvisited_cells() {
        for kernel in [FLOYD_STEINBERG, ATKINSON] {
            for &(dx, dy, _) in kernel.taps {
                assert!(dy > 0 || dx > 0);
            }
        }
    }

    #[test]
    fn none_mode_rounds_to_nearest_level() {
        let q = Quantizer::new(10);
        // 255 / 9 = 28.33 par palier
        assert_eq!(q.index_of(14.0), 0);
        assert_eq!(q.index_of(15.0), 1);
        assert_eq!(q.index_of(130.0), 5);
    }

    #[test]
    fn quantizer_is_monotonic() {
        let q = Quantizer::new(7);
        let mut prev = 0;
        for i in 0..=255u8 {
            let idx = q.index_of(f32::from(i));
            assert!(idx >= prev, "quantizer non monotone à {i}");
            prev = idx;
        }
        assert_eq!(prev, 6);
    }

    #[test]
    fn ordered_is_deterministic() {
        let first = dither(&mut noisy_buffer(16, 16, 3), 5, DitherMode::Ordered);
        let second = dither(&mut noisy_buffer(16, 16, 3), 5, DitherMode::Ordered);
        assert_eq!(first, second);
    }

    #[test]
    fn ordered_breaks_flat_midtone() {
        let mut buf = IntensityBuffer::filled(8, 8, 128.0);
        let levels = dither(&mut buf, 2, DitherMode::Ordered);
        let ones = levels.levels.iter().filter(|&&i| i == 1).count();
        assert!(ones > 16 && ones < 48, "motif Bayer attendu, {ones} cellules à 1");
    }

    #[test]
    fn ordered_coverage_grows_smoothly_from_black() {
        let q = Quantizer::new(10);
        let coverage = |v: f32| {
            (0..8)
                .flat_map(|y| (0..8).map(move |x| (x, y)))
                .filter(|&(x, y)| ordered_index(v, x, y, q) > 0)
                .count()
        };
        assert_eq!(coverage(0.0), 0);
        assert!(coverage(1.0) > 0, "aucun point à v=1");
        let mut prev = 0;
        for half in 0..=60 {
            let c = coverage(half as f32 / 2.0);
            assert!(c >= prev, "couverture non monotone à v={}", half as f32 / 2.0);
            prev = c;
        }
    }

    #[test]
    fn floyd_steinberg_mid_gray_alternates() {
        let mut buf = IntensityBuffer::filled(4, 4, 128.0);
        let levels = dither(&mut buf, 2, DitherMode::FloydSteinberg);
        assert!(levels.levels.contains(&0));
        assert!(levels.levels.contains(&1));
        // premières cellules : 128 → 1, puis 128 - 127 * 7/16 → 0
        assert_eq!(levels.get(0, 0), 1);
        assert_eq!(levels.get(1, 0), 0);
    }

    #[test]
    fn floyd_steinberg_preserves_average_tone() {
        let mut buf = IntensityBuffer::filled(32, 32, 64.0);
        let levels = dither(&mut buf, 2, DitherMode::FloydSteinberg);
        let ones = levels.levels.iter().filter(|&&i| i == 1).count() as f32;
        let ratio = ones / 1024.0;
        assert!((ratio - 64.0 / 255.0).abs() < 0.05, "ratio = {ratio}");
    }

    #[test]
    fn diffusion_rewrites_buffer_with_levels() {
        let mut buf = IntensityBuffer::filled(3, 3, 100.0);
        let levels = dither(&mut buf, 3, DitherMode::Atkinson);
        let q = Quantizer::new(3);
        for (v, &i) in buf.data.iter().zip(&levels.levels) {
            assert!((v - q.level_intensity(i)).abs() < 1e-3);
        }
    }

    #[test]
    fn uniform_extremes_stay_flat() {
        for mode in MODES {
            let mut white = IntensityBuffer::filled(6, 6, 255.0);
            assert!(dither(&mut white, 10, mode).levels.iter().all(|&i| i == 9));
            let mut black = IntensityBuffer::filled(6, 6, 0.0);
            assert!(dither(&mut black, 10, mode).levels.iter().all(|&i| i == 0));
        }
    }
}
