use std::time::Duration;

use af_core::config::RenderConfig;
use af_core::frame::{AsciiFrame, AsciiGrid};

/// Join grid cells into rows, top to bottom.
///
/// # Example
/// ```
/// use af_core::frame::AsciiGrid;
/// use af_ascii::assembler::assemble;
/// use std::time::Duration;
///
/// let grid = AsciiGrid { cells: vec!['a', 'b', 'c', 'd', 'e', 'f'], width: 3, height: 2 };
/// let frame = assemble(&grid, Duration::ZERO);
/// assert_eq!(frame.to_text(), "abc\ndef");
/// ```
#[must_use]
pub fn assemble(grid: &AsciiGrid, delay: Duration) -> AsciiFrame {
    let rows = if grid.width == 0 {
        Vec::new()
    } else {
        grid.rows().map(|row| row.iter().collect()).collect()
    };
    AsciiFrame { rows, delay }
}

/// Display delay for a frame.
///
/// Uses the source metadata unless it is missing or zero, in which case the
/// configured `frame_delay` applies. With `override_delay`, the configured
/// value always wins.
///
/// # Example
/// ```
/// use af_core::config::RenderConfig;
/// use af_ascii::assembler::resolve_delay;
/// use std::time::Duration;
///
/// let config = RenderConfig::default();
/// assert_eq!(resolve_delay(None, &config), Duration::from_millis(100));
/// assert_eq!(
///     resolve_delay(Some(Duration::from_millis(40)), &config),
///     Duration::from_millis(40)
/// );
/// ```
#[must_use]
pub fn resolve_delay(metadata: Option<Duration>, config: &RenderConfig) -> Duration {
    let fallback = Duration::try_from_secs_f64(config.frame_delay).unwrap_or(Duration::ZERO);
    if config.override_delay {
        return fallback;
    }
    match metadata {
        Some(d) if !d.is_zero() => d,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_metadata_falls_back() {
        let config = RenderConfig {
            frame_delay: 0.25,
            ..RenderConfig::default()
        };
        assert_eq!(
            resolve_delay(Some(Duration::ZERO), &config),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn override_replaces_metadata() {
        let config = RenderConfig {
            frame_delay: 0.5,
            override_delay: true,
            ..RenderConfig::default()
        };
        assert_eq!(
            resolve_delay(Some(Duration::from_millis(30)), &config),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn invalid_delay_never_panics() {
        let config = RenderConfig {
            frame_delay: f64::NAN,
            ..RenderConfig::default()
        };
        assert_eq!(resolve_delay(None, &config), Duration::ZERO);
    }

    #[test]
    fn single_cell_grid() {
        let grid = AsciiGrid {
            cells: vec!['@'],
            width: 1,
            height: 1,
        };
        let frame = assemble(&grid, Duration::ZERO);
        assert_eq!(frame.rows, vec!["@".to_string()]);
        assert_eq!(frame.to_text(), "@");
    }
}
