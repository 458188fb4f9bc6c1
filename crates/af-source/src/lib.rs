/// Visual source modules for asciify (static images, animated GIFs).

pub mod image;
pub mod resize;

pub use self::image::{GifSource, ImageSource, open_source};
pub use resize::{Resizer, target_dimensions};
