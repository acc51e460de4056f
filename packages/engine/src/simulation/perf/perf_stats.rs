use wasm_bindgen::prelude::*;

/// Snapshot of the last tick, filled only while perf metrics are enabled
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) inject_ms: f64,
    pub(super) propagate_ms: f64,
    pub(super) droplets_injected: u32,
    pub(super) droplets_discarded: u32,
    pub(super) pending_bursts: u32,
    pub(super) cells: u32,
    pub(super) mean_abs_height: f32,
    pub(super) frame: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }

    pub(crate) fn record_droplet(&mut self, applied: bool) {
        if applied {
            self.droplets_injected = self.droplets_injected.saturating_add(1);
        } else {
            self.droplets_discarded = self.droplets_discarded.saturating_add(1);
        }
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn inject_ms(&self) -> f64 { self.inject_ms }
    #[wasm_bindgen(getter)]
    pub fn propagate_ms(&self) -> f64 { self.propagate_ms }
    #[wasm_bindgen(getter)]
    pub fn droplets_injected(&self) -> u32 { self.droplets_injected }
    #[wasm_bindgen(getter)]
    pub fn droplets_discarded(&self) -> u32 { self.droplets_discarded }
    #[wasm_bindgen(getter)]
    pub fn pending_bursts(&self) -> u32 { self.pending_bursts }
    #[wasm_bindgen(getter)]
    pub fn cells(&self) -> u32 { self.cells }
    #[wasm_bindgen(getter)]
    pub fn mean_abs_height(&self) -> f32 { self.mean_abs_height }
    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u32 { self.frame }
}
