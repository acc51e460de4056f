//! Ripple Engine - water-ripple canvas effect in WASM
//!
//! A background photo is darkened, a logo is composited on top, and the result
//! is distorted every tick by a damped height-field wave simulation.
//!
//! Architecture:
//! - core/        - Padded height field, RGBA pixel buffers, safety macros
//! - domain/      - Config and droplet types
//! - systems/     - Pure passes: composite, propagation + refraction
//! - simulation/  - RippleCore state, tick orchestration, lifecycle
//! - api/         - Browser mount (canvas, images, timer, listeners)

// Utils with safety macros (must be first for macro export!)
#[macro_use]
pub mod core;
pub mod error;
pub mod domain;
pub mod systems;
pub mod simulation;
pub mod api;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(feature = "parallel")]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine: panic hook + console logger
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    // A second init() keeps the first logger
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already installed");
    }

    web_sys::console::log_1(&"🌊 Ripple WASM Engine initialized!".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[wasm_bindgen]
pub fn default_canvas_size() -> u32 {
    domain::DEFAULT_CANVAS_SIZE
}

/// Default config as JSON, a starting point for overrides
#[wasm_bindgen]
pub fn default_config_json() -> String {
    domain::RippleConfig::default().to_json()
}

// Re-export main types
pub use crate::core::{HeightField, PixelBuffer};
pub use domain::{DropletKind, RippleConfig};
pub use error::{Result, RippleError};
pub use simulation::{PerfStats, RippleCore, RippleEffect};

#[cfg(target_arch = "wasm32")]
pub use api::RippleCanvas;
