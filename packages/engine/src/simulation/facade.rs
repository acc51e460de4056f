use wasm_bindgen::prelude::*;

use crate::core::PixelBuffer;
use crate::domain::RippleConfig;

use super::commands::{client_to_canvas, ClientRect};
use super::perf_stats::PerfStats;
use super::RippleCore;

/// Headless handle for hosts that drive their own timer and blit the output
/// themselves (workers, offscreen canvases, tests).
#[wasm_bindgen]
pub struct RippleEffect {
    core: RippleCore,
}

#[wasm_bindgen]
impl RippleEffect {
    /// Build from raw RGBA bytes. `config_json` may override any subset of the
    /// defaults; `None` keeps them all.
    #[wasm_bindgen(constructor)]
    pub fn new(
        background: Vec<u8>,
        background_width: u32,
        background_height: u32,
        logo: Vec<u8>,
        logo_width: u32,
        logo_height: u32,
        config_json: Option<String>,
    ) -> Result<RippleEffect, JsValue> {
        let config = match config_json {
            Some(json) => RippleConfig::from_json(&json)?,
            None => RippleConfig::default(),
        };
        let background = PixelBuffer::from_rgba(background_width, background_height, background)?;
        let logo = PixelBuffer::from_rgba(logo_width, logo_height, logo)?;
        let core = RippleCore::new(config, &background, &logo)?;
        log::debug!("ripple effect {}x{} ready", core.width(), core.height());
        Ok(Self { core })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 { self.core.width() }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 { self.core.height() }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    /// Milliseconds the host should wait between `tick` calls
    pub fn tick_interval_ms(&self) -> i32 {
        self.core.tick_interval_ms()
    }

    pub fn config_json(&self) -> String {
        self.core.config_json()
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last tick perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    /// Advance one tick; the output buffer then holds the new frame
    pub fn tick(&mut self) {
        self.core.tick();
    }

    /// Droplet at canvas pixel (x, y) with an explicit intensity
    pub fn drop_at(&mut self, x: i32, y: i32, intensity: f32) -> bool {
        self.core.drop_at(x, y, intensity)
    }

    /// Pointer move / click in canvas coordinates
    pub fn pointer_at(&mut self, x: f64, y: f64) -> bool {
        self.core.pointer_at(x, y)
    }

    /// Pointer move / click in client coordinates, given the element box
    pub fn pointer_from_client(
        &mut self,
        client_x: f64,
        client_y: f64,
        left: f64,
        top: f64,
        rect_width: f64,
        rect_height: f64,
    ) -> bool {
        let rect = ClientRect { left, top, width: rect_width, height: rect_height };
        match client_to_canvas(client_x, client_y, rect, self.core.width(), self.core.height()) {
            Some((x, y)) => self.core.pointer_at(x, y),
            None => false,
        }
    }

    /// Pointer enter burst; returns the droplet count
    pub fn pointer_enter(&mut self) -> u32 {
        self.core.pointer_enter()
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }

    pub fn pending_bursts(&self) -> u32 {
        self.core.pending_bursts() as u32
    }

    pub fn mean_abs_height(&self) -> f32 {
        self.core.mean_abs_height()
    }

    // === OUTPUT (zero-copy view into wasm memory) ===

    /// Pointer to the RGBA output frame, `width * height * 4` bytes
    pub fn output_ptr(&self) -> *const u8 {
        self.core.output_ptr()
    }

    pub fn output_len(&self) -> usize {
        self.core.output_len()
    }

    /// Copy of the current frame, for hosts without memory access
    pub fn output_copy(&self) -> Vec<u8> {
        self.core.pixels().as_bytes().to_vec()
    }
}

impl RippleEffect {
    pub fn core(&self) -> &RippleCore { &self.core }
}
