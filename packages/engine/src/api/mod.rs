//! JS-facing surface that needs a browser (DOM, timers, images)

#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::RippleCanvas;
