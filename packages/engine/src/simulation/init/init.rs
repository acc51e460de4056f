use crate::core::{HeightField, PixelBuffer};
use crate::domain::{BurstQueue, RippleConfig};
use crate::systems::RippleParams;

use super::perf_stats::PerfStats;
use super::random;
use super::RippleCore;

pub(super) fn create_ripple_core(config: RippleConfig, snapshot: PixelBuffer) -> RippleCore {
    let width = snapshot.width();
    let height = snapshot.height();

    RippleCore {
        params: RippleParams::from(&config),
        field: HeightField::new(width, height),
        // First frame shows the composite untouched
        target: snapshot.clone(),
        source: snapshot,
        bursts: BurstQueue::new(),
        released: Vec::with_capacity(8),
        frame: 0,
        clock_ms: 0.0,
        rng_state: random::seed_state(config.seed),
        perf_enabled: false,
        perf_stats: PerfStats::default(),
        config,
    }
}
