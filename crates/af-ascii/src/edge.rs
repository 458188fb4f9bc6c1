use af_core::frame::IntensityBuffer;

/// Magnitude Sobel maximale théorique : sqrt(2) * 1020 ≈ 1442.
const SOBEL_MAX: f32 = 1442.0;

/// Orientation d'un contour, liée à un caractère de tracé.
///
/// # Example
/// ```
/// use af_ascii::edge::DirectionClass;
/// assert_eq!(DirectionClass::Vertical.glyph(), '|');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectionClass {
    /// `-`
    Horizontal,
    /// `|`
    Vertical,
    /// `\`
    DiagonalDown,
    /// `/`
    DiagonalUp,
    /// `+` : point isolé ou intersection.
    Corner,
}

impl DirectionClass {
    /// Display character for this class.
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::Horizontal => '-',
            Self::Vertical => '|',
            Self::DiagonalDown => '\\',
            Self::DiagonalUp => '/',
            Self::Corner => '+',
        }
    }
}

/// Angle buckets over [0°, 360°), sorted by inclusive upper bound.
///
/// Angles are edge orientations measured counter-clockwise with y pointing
/// up. A lookup takes the first row whose bound is >= the angle, so a
/// boundary angle belongs to the lower-numbered bucket.
pub const DIRECTION_TABLE: [(f32, DirectionClass); 9] = [
    (22.5, DirectionClass::Horizontal),
    (67.5, DirectionClass::DiagonalUp),
    (112.5, DirectionClass::Vertical),
    (157.5, DirectionClass::DiagonalDown),
    (202.5, DirectionClass::Horizontal),
    (247.5, DirectionClass::DiagonalUp),
    (292.5, DirectionClass::Vertical),
    (337.5, DirectionClass::DiagonalDown),
    (360.0, DirectionClass::Horizontal),
];

/// Index of the [`DIRECTION_TABLE`] row that owns `degrees`.
///
/// Any finite angle is first wrapped into [0, 360).
///
/// # Example
/// ```
/// use af_ascii::edge::bucket_index;
/// assert_eq!(bucket_index(22.5), 0);
/// assert_eq!(bucket_index(22.6), 1);
/// assert_eq!(bucket_index(-90.0), 6);
/// ```
#[must_use]
pub fn bucket_index(degrees: f32) -> usize {
    let angle = degrees.rem_euclid(360.0);
    DIRECTION_TABLE
        .iter()
        .position(|&(upper, _)| angle <= upper)
        .unwrap_or(0)
}

/// Classify an edge orientation angle (degrees).
///
/// # Example
/// ```
/// use af_ascii::edge::{classify_angle, DirectionClass};
/// assert_eq!(classify_angle(0.0), DirectionClass::Horizontal);
/// assert_eq!(classify_angle(45.0), DirectionClass::DiagonalUp);
/// assert_eq!(classify_angle(90.0), DirectionClass::Vertical);
/// assert_eq!(classify_angle(135.0), DirectionClass::DiagonalDown);
/// ```
#[must_use]
pub fn classify_angle(degrees: f32) -> DirectionClass {
    DIRECTION_TABLE[bucket_index(degrees)].1
}

/// Compute Sobel gradient components at (x, y).
///
/// Returns `None` on border pixels, where the 3×3 neighbourhood is
/// incomplete. `gy` grows downwards, like image rows.
#[must_use]
pub fn gradient(buffer: &IntensityBuffer, x: usize, y: usize) -> Option<(f32, f32)> {
    if x == 0 || y == 0 || x + 1 >= buffer.width || y + 1 >= buffer.height {
        return None;
    }

    let tl = buffer.get(x - 1, y - 1);
    let tc = buffer.get(x, y - 1);
    let tr = buffer.get(x + 1, y - 1);
    let ml = buffer.get(x - 1, y);
    let mr = buffer.get(x + 1, y);
    let bl = buffer.get(x - 1, y + 1);
    let bc = buffer.get(x, y + 1);
    let br = buffer.get(x + 1, y + 1);

    let gx = -tl + tr - 2.0 * ml + 2.0 * mr - bl + br;
    let gy = -tl - 2.0 * tc - tr + bl + 2.0 * bc + br;

    Some((gx, gy))
}

/// Normalized gradient magnitude [0.0, 1.0].
#[inline(always)]
#[must_use]
pub fn magnitude(gx: f32, gy: f32) -> f32 {
    ((gx * gx + gy * gy).sqrt() / SOBEL_MAX).min(1.0)
}

/// Edge orientation in degrees [0, 360) for a gradient.
///
/// The gradient angle is `atan2(-gy, gx)` (y flipped to point up); the edge
/// runs perpendicular to it, hence the extra 90°.
///
/// # Example
/// ```
/// use af_ascii::edge::edge_angle;
/// // luminance croissante vers la droite → contour vertical
/// assert!((edge_angle(100.0, 0.0) - 90.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn edge_angle(gx: f32, gy: f32) -> f32 {
    ((-gy).atan2(gx).to_degrees() + 90.0).rem_euclid(360.0)
}

/// Per-pixel edge classification. `None` = not an edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    /// Classes, row-major.
    pub classes: Vec<Option<DirectionClass>>,
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
}

impl EdgeMap {
    /// Class at (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<DirectionClass> {
        self.classes[y * self.width + x]
    }

    /// Number of edge cells.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.classes.iter().filter(|c| c.is_some()).count()
    }
}

/// Detect and orient edges over a whole intensity buffer.
///
/// Pixels whose normalized magnitude is at or below `threshold` are left as
/// `None` and fall through to the intensity path of the mapper.
///
/// # Example
/// ```
/// use af_core::frame::IntensityBuffer;
/// use af_ascii::edge::{detect_edges, DirectionClass};
///
/// // moitié gauche noire, moitié droite blanche
/// let data = (0..36).map(|i| if i % 6 >= 3 { 255.0 } else { 0.0 }).collect();
/// let buf = IntensityBuffer::from_vec(6, 6, data).unwrap();
/// let edges = detect_edges(&buf, 0.25);
/// assert_eq!(edges.get(2, 2), Some(DirectionClass::Vertical));
/// assert_eq!(edges.get(0, 2), None);
/// ```
#[must_use]
pub fn detect_edges(buffer: &IntensityBuffer, threshold: f32) -> EdgeMap {
    let (width, height) = (buffer.width, buffer.height);
    let mut angles = vec![None; width * height];
    for y in 0..height {
        for x in 0..width {
            if let Some((gx, gy)) = gradient(buffer, x, y)
                && magnitude(gx, gy) > threshold
            {
                angles[y * width + x] = Some(edge_angle(gx, gy));
            }
        }
    }
    let classes = classify(&angles, width, height);
    log::trace!(
        "{} contours détectés sur {width}×{height}",
        classes.iter().filter(|c| c.is_some()).count()
    );
    EdgeMap {
        classes,
        width,
        height,
    }
}

/// Bucket each edge angle; isolated edge pixels become [`DirectionClass::Corner`].
fn classify(angles: &[Option<f32>], width: usize, height: usize) -> Vec<Option<DirectionClass>> {
    let is_edge = |x: isize, y: isize| {
        x >= 0
            && y >= 0
            && (x as usize) < width
            && (y as usize) < height
            && angles[y as usize * width + x as usize].is_some()
    };

    angles
        .iter()
        .enumerate()
        .map(|(i, angle)| {
            let angle = (*angle)?;
            let (x, y) = ((i % width) as isize, (i / width) as isize);
            let has_neighbour = (-1..=1)
                .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
                .filter(|&(dx, dy)| dx != 0 || dy != 0)
                .any(|(dx, dy)| is_edge(x + dx, y + dy));
            Some(if has_neighbour {
                classify_angle(angle)
            } else {
                DirectionClass::Corner
            })
        })
        .collect()
}
