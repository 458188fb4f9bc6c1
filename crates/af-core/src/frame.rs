use std::time::Duration;

/// Buffer de pixels RGBA décodé.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer noir aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Buffer where every pixel has the same RGBA value.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(2, 2, (255, 255, 255, 255));
    /// assert_eq!(fb.pixel(1, 1), (255, 255, 255, 255));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: (u8, u8, u8, u8)) -> Self {
        let (r, g, b, a) = rgba;
        let data = [r, g, b, a].repeat(width as usize * height as usize);
        Self {
            data,
            width,
            height,
        }
    }

    /// True if either dimension is zero or the data does not cover the grid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0
            || self.height == 0
            || self.data.len() < self.width as usize * self.height as usize * 4
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// let (r, g, b, a) = fb.pixel(0, 0);
    /// assert_eq!((r, g, b, a), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Luminance perceptuelle BT.709, [0.0, 255.0].
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(1, 1, (255, 255, 255, 255));
    /// assert!((fb.luminance(0, 0) - 255.0).abs() < 1e-3);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> f32 {
        let (r, g, b, _) = self.pixel(x, y);
        0.2126 * f32::from(r) + 0.7152 * f32::from(g) + 0.0722 * f32::from(b)
    }
}

/// Décodage brut d'une frame source, avec son délai d'affichage éventuel.
#[derive(Clone, Debug)]
pub struct SourceFrame {
    /// Pixels at native resolution.
    pub buffer: FrameBuffer,
    /// Display delay from the container metadata, if any.
    pub delay: Option<Duration>,
}

/// Grille d'intensités [0, 255], row-major.
///
/// Mutable in place: error diffusion writes into cells that have not been
/// visited yet.
///
/// # Example
/// ```
/// use af_core::frame::IntensityBuffer;
/// let mut buf = IntensityBuffer::filled(3, 2, 128.0);
/// buf.set(2, 1, 10.0);
/// assert_eq!(buf.get(2, 1), 10.0);
/// assert_eq!(buf.get(0, 0), 128.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityBuffer {
    /// Intensities, row-major.
    pub data: Vec<f32>,
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
}

impl IntensityBuffer {
    /// Uniform buffer.
    #[must_use]
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Build from row-major values. Returns `None` on a size mismatch.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::IntensityBuffer;
    /// assert!(IntensityBuffer::from_vec(2, 2, vec![0.0; 4]).is_some());
    /// assert!(IntensityBuffer::from_vec(2, 2, vec![0.0; 3]).is_none());
    /// ```
    #[must_use]
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            data,
            width,
            height,
        })
    }

    /// Value at (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Overwrite (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }
}

/// Grille d'indices dans le ramp (0..N-1), sortie du dither engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelBuffer {
    /// Ramp indices, row-major.
    pub levels: Vec<usize>,
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
}

impl LevelBuffer {
    /// Index at (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> usize {
        self.levels[y * self.width + x]
    }
}

/// Grille de sortie ASCII.
///
/// # Example
/// ```
/// use af_core::frame::AsciiGrid;
/// let grid = AsciiGrid { cells: vec![' ', '@', '#', '.'], width: 2, height: 2 };
/// let rows: Vec<String> = grid.rows().map(|r| r.iter().collect()).collect();
/// assert_eq!(rows, vec![" @", "#."]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiGrid {
    /// Flat array of characters, row-major.
    pub cells: Vec<char>,
    /// Width in characters.
    pub width: usize,
    /// Height in characters.
    pub height: usize,
}

impl AsciiGrid {
    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width.max(1))
    }
}

/// Frame ASCII finale : lignes + délai d'affichage.
///
/// # Example
/// ```
/// use af_core::frame::AsciiFrame;
/// use std::time::Duration;
/// let frame = AsciiFrame { rows: vec!["ab".into(), "cd".into()], delay: Duration::ZERO };
/// assert_eq!(frame.to_text(), "ab\ncd");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiFrame {
    /// Rendered rows, top to bottom.
    pub rows: Vec<String>,
    /// How long this frame stays on screen.
    pub delay: Duration,
}

impl AsciiFrame {
    /// Rows joined with `\n`, no trailing newline.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.rows.join("\n")
    }
}

impl std::fmt::Display for AsciiFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}
