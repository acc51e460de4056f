//! Core buffers: the padded height field and RGBA pixel storage

#[macro_use]
pub mod utils;
pub mod height_field;
pub mod pixels;

pub use height_field::{HeightField, PAD};
pub use pixels::PixelBuffer;
