//! RippleCore - water-ripple simulation over a composited snapshot
//!
//! One instance owns everything a mounted effect needs: the ping-pong height
//! field, the immutable source snapshot, the target image that gets blitted,
//! the pending hover burst and the RNG. Nothing is shared between instances
//! and nothing survives a remount.
//!
//! Tick order (see step/step.rs):
//!   burst release -> ambient droplet -> propagation pass -> swap -> clock

use crate::core::{HeightField, PixelBuffer};
use crate::domain::{BurstQueue, Droplet, DropletKind, RippleConfig};
use crate::error::{Result, RippleError};
use crate::systems::{composite, RippleParams};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/random.rs"]
mod random;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "step/step.rs"]
mod step;
#[path = "commands/commands.rs"]
mod commands;
#[path = "lifecycle/lifecycle.rs"]
mod lifecycle;
mod facade;

pub use commands::{client_to_canvas, ClientRect};
pub use facade::RippleEffect;
pub use lifecycle::{Lifecycle, Phase, TickScheduler, REQUIRED_ASSETS};
pub use perf_stats::PerfStats;

use perf_timer::PerfTimer;

pub struct RippleCore {
    config: RippleConfig,
    params: RippleParams,

    field: HeightField,
    source: PixelBuffer,
    target: PixelBuffer,

    bursts: BurstQueue,
    released: Vec<Droplet>,

    // State
    frame: u64,
    clock_ms: f64,
    rng_state: u32,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl RippleCore {
    /// Composite background + overlay + logo and start from a flat field
    pub fn new(config: RippleConfig, background: &PixelBuffer, logo: &PixelBuffer) -> Result<Self> {
        config.validate()?;
        let snapshot = composite(background, logo, &config);
        Ok(init::create_ripple_core(config, snapshot))
    }

    /// Start from an already composited snapshot (must be `canvas_size` square)
    pub fn from_snapshot(config: RippleConfig, snapshot: PixelBuffer) -> Result<Self> {
        config.validate()?;
        let side = config.canvas_size;
        if snapshot.width() != side || snapshot.height() != side {
            return Err(RippleError::InvalidConfig(format!(
                "snapshot is {}x{}, canvas_size is {side}",
                snapshot.width(),
                snapshot.height()
            )));
        }
        Ok(init::create_ripple_core(config, snapshot))
    }

    pub fn width(&self) -> u32 { self.field.width() }

    pub fn height(&self) -> u32 { self.field.height() }

    pub fn frame(&self) -> u64 { self.frame }

    /// Simulated time at the start of the next tick
    pub fn clock_ms(&self) -> f64 { self.clock_ms }

    pub fn config(&self) -> &RippleConfig { &self.config }

    pub fn config_json(&self) -> String {
        self.config.to_json()
    }

    pub fn tick_interval_ms(&self) -> i32 {
        self.config.tick_interval_ms()
    }

    pub fn field(&self) -> &HeightField { &self.field }

    /// The immutable composite
    pub fn source(&self) -> &PixelBuffer { &self.source }

    /// The frame to blit
    pub fn pixels(&self) -> &PixelBuffer { &self.target }

    pub fn output_ptr(&self) -> *const u8 { self.target.as_ptr() }

    pub fn output_len(&self) -> usize { self.target.len() }

    pub fn mean_abs_height(&self) -> f32 { self.field.mean_abs() }

    pub fn pending_bursts(&self) -> usize { self.bursts.len() }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last tick's perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    /// Advance one tick
    pub fn tick(&mut self) {
        step::step(self);
    }

    /// Inject a droplet at canvas pixel (x, y). False when discarded.
    pub fn drop_at(&mut self, x: i32, y: i32, intensity: f32) -> bool {
        commands::drop_at(self, x, y, intensity)
    }

    pub fn drop_kind(&mut self, x: i32, y: i32, kind: DropletKind) -> bool {
        commands::drop_kind(self, x, y, kind)
    }

    /// Pointer move / click at canvas coordinates
    pub fn pointer_at(&mut self, x: f64, y: f64) -> bool {
        commands::pointer_at(self, x, y)
    }

    /// Pointer enter: immediate droplet plus a staggered burst.
    /// Returns how many droplets were scheduled in total.
    pub fn pointer_enter(&mut self) -> u32 {
        commands::pointer_enter(self)
    }

    /// Flatten the field and rewind to frame 0 (snapshot kept)
    pub fn reset(&mut self) {
        commands::reset(self);
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
