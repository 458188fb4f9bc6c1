use std::time::Duration;

use af_core::charset::Ramp;
use af_core::config::RenderConfig;
use af_core::error::CoreError;
use af_core::frame::{AsciiFrame, FrameBuffer, IntensityBuffer};

use crate::assembler::{assemble, resolve_delay};
use crate::dither::dither;
use crate::edge::detect_edges;
use crate::luminance::to_intensity;
use crate::mapper::map_levels;

/// Compositor orchestre la conversion pixel→ASCII d'une frame.
///
/// Pipeline : luminance → (contours) → quantification/tramage → mapping →
/// assemblage. The configuration is validated and the ramp built once, at
/// construction, so a bad config fails before any pixel is touched.
///
/// # Example
/// ```
/// use af_ascii::compositor::Compositor;
/// use af_core::config::RenderConfig;
/// use af_core::frame::FrameBuffer;
///
/// let compositor = Compositor::new(&RenderConfig::default()).unwrap();
/// let frame = compositor.render(&FrameBuffer::new(4, 2), None).unwrap();
/// assert_eq!(frame.to_text(), "    \n    ");
/// ```
#[derive(Clone, Debug)]
pub struct Compositor {
    config: RenderConfig,
    ramp: Ramp,
}

impl Compositor {
    /// Validate `config` and prepare the effective ramp.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if the configuration is not renderable.
    pub fn new(config: &RenderConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let ramp = config.ramp()?;
        log::debug!(
            "Compositor : ramp « {ramp} » ({} niveaux), dither {:?}, contours {}",
            ramp.len(),
            config.dither_mode,
            config.edge_detection
        );
        Ok(Self {
            config: config.clone(),
            ramp,
        })
    }

    /// Render an already-resized RGBA frame.
    ///
    /// `delay` is the source metadata; see [`resolve_delay`].
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidImage`] if the frame is empty.
    pub fn render(
        &self,
        frame: &FrameBuffer,
        delay: Option<Duration>,
    ) -> Result<AsciiFrame, CoreError> {
        let intensity = to_intensity(frame)?;
        Ok(self.render_intensity(intensity, delay))
    }

    /// Render an intensity buffer, consuming it.
    #[must_use]
    pub fn render_intensity(
        &self,
        mut intensity: IntensityBuffer,
        delay: Option<Duration>,
    ) -> AsciiFrame {
        // Les contours se calculent sur l'intensité d'origine, avant tramage
        let edges = self
            .config
            .edge_detection
            .then(|| detect_edges(&intensity, self.config.edge_threshold));

        let levels = dither(&mut intensity, self.ramp.len(), self.config.dither_mode);
        let grid = map_levels(&levels, edges.as_ref(), &self.ramp);
        assemble(&grid, resolve_delay(delay, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::config::DitherMode;

    fn all_chars(frame: &AsciiFrame) -> Vec<char> {
        frame.rows.iter().flat_map(|r| r.chars()).collect()
    }

    #[test]
    fn white_maps_to_last_glyph() {
        let compositor = Compositor::new(&RenderConfig::default()).unwrap();
        let frame = compositor
            .render(&FrameBuffer::filled(5, 3, (255, 255, 255, 255)), None)
            .unwrap();
        assert_eq!(frame.rows.len(), 3);
        assert!(all_chars(&frame).iter().all(|&c| c == '@'));
    }

    #[test]
    fn white_maps_to_space_when_reversed() {
        let config = RenderConfig {
            reverse: true,
            ..RenderConfig::default()
        };
        let compositor = Compositor::new(&config).unwrap();
        let frame = compositor
            .render(&FrameBuffer::filled(5, 3, (255, 255, 255, 255)), None)
            .unwrap();
        assert!(all_chars(&frame).iter().all(|&c| c == ' '));
    }

    #[test]
    fn black_polarity_both_directions() {
        let black = FrameBuffer::filled(2, 2, (0, 0, 0, 255));
        let normal = Compositor::new(&RenderConfig::default()).unwrap();
        assert!(all_chars(&normal.render(&black, None).unwrap()).iter().all(|&c| c == ' '));

        let reversed = Compositor::new(&RenderConfig {
            reverse: true,
            ..RenderConfig::default()
        })
        .unwrap();
        assert!(all_chars(&reversed.render(&black, None).unwrap()).iter().all(|&c| c == '@'));
    }

    #[test]
    fn one_by_one_black_image() {
        for mode in [
            DitherMode::None,
            DitherMode::Ordered,
            DitherMode::FloydSteinberg,
            DitherMode::Atkinson,
        ] {
            let config = RenderConfig {
                dither_mode: mode,
                ..RenderConfig::default()
            };
            let frame = Compositor::new(&config)
                .unwrap()
                .render(&FrameBuffer::filled(1, 1, (0, 0, 0, 255)), None)
                .unwrap();
            assert_eq!(frame.to_text(), " ");
        }
    }

    #[test]
    fn floyd_steinberg_two_char_midgray_is_not_flat() {
        let config = RenderConfig {
            charset: "ab".into(),
            dither_mode: DitherMode::FloydSteinberg,
            ..RenderConfig::default()
        };
        let compositor = Compositor::new(&config).unwrap();
        let frame = compositor.render_intensity(IntensityBuffer::filled(4, 4, 128.0), None);
        let chars = all_chars(&frame);
        assert!(chars.contains(&'a'));
        assert!(chars.contains(&'b'));
    }

    #[test]
    fn edge_mode_draws_line_glyphs() {
        let config = RenderConfig {
            edge_detection: true,
            ..RenderConfig::default()
        };
        let compositor = Compositor::new(&config).unwrap();
        let data = (0..64).map(|i| if i % 8 >= 4 { 255.0 } else { 0.0 }).collect();
        let buf = IntensityBuffer::from_vec(8, 8, data).unwrap();
        let frame = compositor.render_intensity(buf, None);
        assert_eq!(frame.rows[3], "   ||@@@");
    }

    #[test]
    fn pattern_mode_uses_blocks() {
        let config = RenderConfig {
            pattern_mode: true,
            ..RenderConfig::default()
        };
        let compositor = Compositor::new(&config).unwrap();
        let frame = compositor
            .render(&FrameBuffer::filled(3, 1, (255, 255, 255, 255)), None)
            .unwrap();
        assert_eq!(frame.to_text(), "███");
    }

    #[test]
    fn invalid_config_fails_before_rendering() {
        let config = RenderConfig {
            charset: String::new(),
            ..RenderConfig::default()
        };
        assert!(matches!(Compositor::new(&config), Err(CoreError::Config(_))));
    }

    #[test]
    fn empty_frame_is_invalid_image() {
        let compositor = Compositor::new(&RenderConfig::default()).unwrap();
        assert!(matches!(
            compositor.render(&FrameBuffer::new(0, 0), None),
            Err(CoreError::InvalidImage(_))
        ));
    }

    #[test]
    fn frame_delay_defaults_when_missing() {
        let compositor = Compositor::new(&RenderConfig::default()).unwrap();
        let frame = compositor.render_intensity(IntensityBuffer::filled(1, 1, 0.0), None);
        assert_eq!(frame.delay, Duration::from_millis(100));
    }
}
