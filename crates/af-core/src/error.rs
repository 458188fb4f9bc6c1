use thiserror::Error;

/// Errors originating from the core pipeline.
///
/// None of these are retryable: the pipeline is pure computation, so a
/// failure means the input or the configuration is unusable.
#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    /// Source image is unreadable or empty.
    #[error("Image invalide : {0}")]
    InvalidImage(String),

    /// Invalid configuration value (empty ramp, unknown dither mode, ...).
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },
}
