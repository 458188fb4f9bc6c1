use std::path::Path;

use af_ascii::compositor::Compositor;
use af_core::config::RenderConfig;
use af_core::frame::{AsciiFrame, SourceFrame};
use af_source::resize::Resizer;
use anyhow::{Context, Result};
use rayon::prelude::*;

/// Load `path` and render every frame it yields.
///
/// The configuration is validated before the file is opened.
///
/// # Errors
/// Returns an error for an invalid configuration, an unreadable image, or a
/// failed resize.
pub fn render_file(path: &Path, config: &RenderConfig) -> Result<Vec<AsciiFrame>> {
    let compositor = Compositor::new(config)?;
    let mut source = af_source::image::open_source(path, config.animate)?;
    let frames = source.drain();
    log::info!(
        "{} frame(s) à convertir depuis {}",
        frames.len(),
        path.display()
    );
    render_frames(&compositor, frames, config)
}

/// Resize and render decoded frames, preserving their order.
///
/// Frames are independent, so they are processed in parallel; each worker
/// keeps its own resizer.
///
/// # Errors
/// Returns the first resize or conversion error.
pub fn render_frames(
    compositor: &Compositor,
    frames: Vec<SourceFrame>,
    config: &RenderConfig,
) -> Result<Vec<AsciiFrame>> {
    frames
        .into_par_iter()
        .enumerate()
        .map_init(Resizer::new, |resizer, (i, frame)| {
            let resized = resizer
                .resize_to_grid(&frame.buffer, config.width, config.char_aspect)
                .with_context(|| format!("Resize de la frame {i}"))?;
            let ascii = compositor
                .render(&resized, frame.delay)
                .with_context(|| format!("Conversion de la frame {i}"))?;
            log::debug!(
                "Frame {i} : {}×{} caractères, délai {:?}",
                resized.width,
                resized.height,
                ascii.delay
            );
            Ok::<_, anyhow::Error>(ascii)
        })
        .collect()
}
