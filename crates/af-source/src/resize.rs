use af_core::error::CoreError;
use af_core::frame::FrameBuffer;
use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer as FirResizer};

/// Grid dimensions for a source image.
///
/// Width is the requested character count, capped at the source width (no
/// upscaling). Height follows the source aspect ratio, scaled by
/// `char_aspect` to compensate for tall terminal cells. Height is truncated
/// and never below 1.
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] if any input dimension is zero.
///
/// # Example
/// ```
/// use af_source::resize::target_dimensions;
/// assert_eq!(target_dimensions(200, 100, 100, 0.55).unwrap(), (100, 27));
/// assert_eq!(target_dimensions(1, 1, 100, 0.55).unwrap(), (1, 1));
/// ```
pub fn target_dimensions(
    src_width: u32,
    src_height: u32,
    width: u32,
    char_aspect: f32,
) -> Result<(u32, u32), CoreError> {
    if src_width == 0 || src_height == 0 || width == 0 {
        return Err(CoreError::InvalidDimensions {
            width: src_width,
            height: src_height,
        });
    }
    let cols = width.min(src_width);
    let ratio = f64::from(src_height) / f64::from(src_width);
    let height = (ratio * f64::from(cols) * f64::from(char_aspect)) as u32;
    Ok((cols, height.max(1)))
}

/// Resizer réutilisable wrappant fast_image_resize.
///
/// Keeps its scratch buffer between calls so animated sources resize every
/// frame without reallocating.
///
/// # Example
/// ```
/// use af_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch image for source (owned buffer to avoid the mut borrow issue).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new(),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns an error if the resize operation fails.
    ///
    /// # Example
    /// ```
    /// use af_source::resize::Resizer;
    /// use af_core::frame::FrameBuffer;
    /// let mut r = Resizer::new();
    /// let src = FrameBuffer::new(100, 100);
    /// let mut dst = FrameBuffer::new(50, 50);
    /// r.resize_into(&src, &mut dst).unwrap();
    /// ```
    pub fn resize_into(&mut self, src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<()> {
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        // fast_image_resize exige &mut sur la source : copie dans le scratch
        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x4)
                .context("Invalid source dimensions")?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x4)
                .context("Invalid destination dimensions")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Resize failed")?;

        Ok(())
    }

    /// Resize `src` to the character grid for `width` columns.
    ///
    /// # Errors
    /// Returns an error if `src` is empty or the resize fails.
    ///
    /// # Example
    /// ```
    /// use af_source::resize::Resizer;
    /// use af_core::frame::FrameBuffer;
    /// let mut r = Resizer::new();
    /// let out = r.resize_to_grid(&FrameBuffer::new(40, 20), 20, 0.5).unwrap();
    /// assert_eq!((out.width, out.height), (20, 5));
    /// ```
    pub fn resize_to_grid(
        &mut self,
        src: &FrameBuffer,
        width: u32,
        char_aspect: f32,
    ) -> Result<FrameBuffer> {
        if src.is_empty() {
            return Err(CoreError::InvalidImage(format!(
                "image vide ({}×{})",
                src.width, src.height
            ))
            .into());
        }
        let (w, h) = target_dimensions(src.width, src.height, width, char_aspect)?;
        let mut dst = FrameBuffer::new(w, h);
        self.resize_into(src, &mut dst)?;
        log::debug!("Resize {}×{} → {w}×{h}", src.width, src.height);
        Ok(dst)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_source_keeps_at_least_one_row() {
        assert_eq!(target_dimensions(1000, 1, 100, 0.55).unwrap(), (100, 1));
    }

    #[test]
    fn single_pixel_is_not_upscaled() {
        let src = FrameBuffer::filled(1, 1, (0, 0, 0, 255));
        let out = Resizer::new().resize_to_grid(&src, 100, 0.55).unwrap();
        assert_eq!((out.width, out.height), (1, 1));
        assert_eq!(out.pixel(0, 0), (0, 0, 0, 255));
    }

    #[test]
    fn narrow_source_caps_width() {
        assert_eq!(target_dimensions(40, 80, 100, 0.5).unwrap(), (40, 40));
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(matches!(
            target_dimensions(0, 10, 100, 0.55),
            Err(CoreError::InvalidDimensions { .. })
        ));
        assert!(Resizer::new().resize_to_grid(&FrameBuffer::new(0, 0), 10, 0.55).is_err());
    }

    #[test]
    fn uniform_color_survives_resize() {
        let src = FrameBuffer::filled(64, 64, (200, 200, 200, 255));
        let out = Resizer::new().resize_to_grid(&src, 16, 0.55).unwrap();
        assert_eq!((out.width, out.height), (16, 8));
        assert!(out.data.chunks_exact(4).all(|p| p[0].abs_diff(200) <= 1));
    }
}
