use crate::core::height_field::DROPLET_RADIUS;
use crate::systems::propagate;

use super::random::interior_point;
use super::{PerfTimer, RippleCore};

pub(super) fn step(core: &mut RippleCore) {
    let perf_on = core.perf_enabled;
    if perf_on {
        core.perf_stats.reset();
        core.perf_stats.cells = core.width().saturating_mul(core.height());
    }
    let step_start = if perf_on { Some(PerfTimer::start()) } else { None };

    // === INJECTION: due burst droplets, then the ambient droplet ===
    let mut lap = step_start;
    inject(core);
    if let Some(timer) = lap.as_mut() {
        core.perf_stats.inject_ms = timer.lap_ms();
    }

    // === PROPAGATION: full pass over every cell before the swap ===
    propagate(&mut core.field, &core.source, &mut core.target, core.params);
    if let Some(timer) = lap.as_mut() {
        core.perf_stats.propagate_ms = timer.lap_ms();
    }

    core.field.swap();

    if perf_on {
        core.perf_stats.pending_bursts = core.bursts.len() as u32;
        core.perf_stats.mean_abs_height = core.field.mean_abs();
        core.perf_stats.frame = core.frame as u32;
        if let Some(start) = step_start {
            core.perf_stats.step_ms = start.elapsed_ms();
        }
    }

    core.frame += 1;
    core.clock_ms += core.config.tick_ms();
}

fn inject(core: &mut RippleCore) {
    let mut released = std::mem::take(&mut core.released);
    released.clear();
    core.bursts.drain_due(core.clock_ms, &mut released);
    for d in released.iter() {
        let applied = core.field.drop_at(d.x, d.y, d.intensity);
        if core.perf_enabled {
            core.perf_stats.record_droplet(applied);
        }
    }
    core.released = released;

    let interval = core.config.ambient_interval_ticks as u64;
    if interval > 0 && core.frame % interval == 0 {
        let (w, h) = (core.width(), core.height());
        let (x, y) = interior_point(&mut core.rng_state, w, h, DROPLET_RADIUS);
        let applied = core.field.drop_at(x, y, core.config.ambient_intensity);
        if core.perf_enabled {
            core.perf_stats.record_droplet(applied);
        }
    }
}
