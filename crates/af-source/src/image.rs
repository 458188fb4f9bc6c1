/// Image and animated GIF sources.
use std::path::Path;
use std::time::Duration;

use af_core::error::CoreError;
use af_core::frame::{FrameBuffer, SourceFrame};
use af_core::traits::Source;
use anyhow::{Context, Result};

/// Source d'image statique. Une seule frame, sans délai.
///
/// # Example
/// ```no_run
/// use af_source::image::ImageSource;
/// use std::path::Path;
/// let source = ImageSource::new(Path::new("test.png")).unwrap();
/// ```
pub struct ImageSource {
    frame: Option<FrameBuffer>,
    size: (u32, u32),
}

impl ImageSource {
    /// Load an image from disk and create a source.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidImage`] if the image cannot be decoded or
    /// has a zero dimension.
    pub fn new(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| CoreError::InvalidImage(e.to_string()))
            .with_context(|| format!("Impossible de charger {}", path.display()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::from_frame(FrameBuffer {
            data: rgba.into_raw(),
            width,
            height,
        })?)
    }

    /// Wrap an already decoded frame.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidImage`] if the frame is empty.
    pub fn from_frame(frame: FrameBuffer) -> Result<Self, CoreError> {
        if frame.is_empty() {
            return Err(CoreError::InvalidImage(format!(
                "image vide ({}×{})",
                frame.width, frame.height
            )));
        }
        let size = (frame.width, frame.height);
        Ok(Self {
            frame: Some(frame),
            size,
        })
    }
}

impl Source for ImageSource {
    fn next_frame(&mut self) -> Option<SourceFrame> {
        self.frame.take().map(|buffer| SourceFrame {
            buffer,
            delay: None,
        })
    }

    fn native_size(&self) -> (u32, u32) {
        self.size
    }

    fn frame_count(&self) -> usize {
        1
    }
}

/// Source de GIF animé. Pré-décode toutes les frames avec leur délai natif.
///
/// # Example
/// ```no_run
/// use af_source::image::GifSource;
/// use std::path::Path;
/// if let Some(source) = GifSource::try_new(Path::new("anim.gif")).unwrap() {
///     use af_core::traits::Source;
///     assert!(source.frame_count() > 1);
/// }
/// ```
pub struct GifSource {
    frames: std::vec::IntoIter<SourceFrame>,
    count: usize,
    size: (u32, u32),
}

impl GifSource {
    /// Décode un GIF animé depuis le disque.
    /// Retourne `Ok(None)` si le GIF n'a qu'une seule frame (utiliser `ImageSource`).
    ///
    /// # Errors
    /// Retourne une erreur si le fichier ne peut être ouvert ou décodé.
    pub fn try_new(path: &Path) -> Result<Option<Self>> {
        use image::AnimationDecoder;
        use image::codecs::gif::GifDecoder;
        use std::fs::File;
        use std::io::BufReader;

        let file =
            File::open(path).with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
        let decoder = GifDecoder::new(BufReader::new(file))
            .map_err(|e| CoreError::InvalidImage(e.to_string()))
            .with_context(|| format!("GIF invalide: {}", path.display()))?;
        let raw_frames = decoder
            .into_frames()
            .collect_frames()
            .map_err(|e| CoreError::InvalidImage(e.to_string()))
            .with_context(|| format!("Erreur décodage frames GIF: {}", path.display()))?;

        if raw_frames.len() <= 1 {
            return Ok(None);
        }

        let mut frames = Vec::with_capacity(raw_frames.len());
        let mut missing_delays = 0usize;
        for raw in raw_frames {
            let (numer, denom) = raw.delay().numer_denom_ms();
            let ms = if denom == 0 { 0 } else { numer / denom };
            let delay = (ms > 0).then(|| Duration::from_millis(u64::from(ms)));
            if delay.is_none() {
                missing_delays += 1;
            }

            let buf = raw.into_buffer();
            let (width, height) = buf.dimensions();
            frames.push(SourceFrame {
                buffer: FrameBuffer {
                    data: buf.into_raw(),
                    width,
                    height,
                },
                delay,
            });
        }
        if missing_delays > 0 {
            log::warn!(
                "{missing_delays} frame(s) GIF sans délai, le délai par défaut sera utilisé"
            );
        }

        let size = frames
            .first()
            .map_or((0, 0), |f| (f.buffer.width, f.buffer.height));
        let count = frames.len();
        log::info!("GIF animé : {count} frames, {}×{}", size.0, size.1);
        Ok(Some(Self {
            frames: frames.into_iter(),
            count,
            size,
        }))
    }
}

impl Source for GifSource {
    fn next_frame(&mut self) -> Option<SourceFrame> {
        self.frames.next()
    }

    fn native_size(&self) -> (u32, u32) {
        self.size
    }

    fn frame_count(&self) -> usize {
        self.count
    }
}

/// Open `path` as a frame source.
///
/// Animated GIFs yield every frame when `animate` is set; anything else
/// (including animated GIFs without `animate`) yields the first frame only.
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded.
pub fn open_source(path: &Path, animate: bool) -> Result<Box<dyn Source>> {
    let is_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));

    if animate && is_gif {
        if let Some(gif) = GifSource::try_new(path)? {
            return Ok(Box::new(gif));
        }
        log::info!("GIF à frame unique, rendu statique");
    }
    let source = ImageSource::new(path)?;
    log::info!(
        "Image chargée : {}×{}",
        source.native_size().0,
        source.native_size().1
    );
    Ok(Box::new(source))
}
