/// Configuration, types, and shared structures for asciify.
///
/// This crate contains all shared types, traits, and configuration logic
/// used across the asciify workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::Ramp;
pub use config::{DitherMode, RenderConfig};
pub use error::CoreError;
pub use frame::{AsciiFrame, AsciiGrid, FrameBuffer, IntensityBuffer, LevelBuffer, SourceFrame};
