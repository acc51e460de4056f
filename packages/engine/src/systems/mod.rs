//! Systems - pure passes over the core buffers

pub mod compositor;
pub mod ripple;

pub use compositor::{composite, logo_rect};
pub use ripple::{propagate, shade, RippleParams};
