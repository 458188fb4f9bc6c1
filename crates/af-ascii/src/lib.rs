pub mod assembler;
pub mod compositor;
pub mod dither;
pub mod edge;
/// ASCII conversion engine for asciify.
///
/// Converts pixel frames to character grids: grayscale, dithering or
/// edge detection, character mapping and frame assembly.
pub mod luminance;
pub mod mapper;

pub use compositor::Compositor;
