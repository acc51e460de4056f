use crate::core::height_field::DROPLET_RADIUS;
use crate::domain::{Droplet, DropletKind};

use super::random::interior_point;
use super::RippleCore;

/// Canvas element box in client (CSS) pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a client-space pointer position onto the canvas pixel grid.
///
/// The canvas keeps its internal resolution while CSS may display it at any
/// size, so each axis is scaled by `canvas_size / displayed_size`. Returns
/// `None` for a collapsed (zero-sized) element.
pub fn client_to_canvas(
    client_x: f64,
    client_y: f64,
    rect: ClientRect,
    canvas_width: u32,
    canvas_height: u32,
) -> Option<(f64, f64)> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let scale_x = canvas_width as f64 / rect.width;
    let scale_y = canvas_height as f64 / rect.height;
    Some(((client_x - rect.left) * scale_x, (client_y - rect.top) * scale_y))
}

pub(super) fn drop_at(core: &mut RippleCore, x: i32, y: i32, intensity: f32) -> bool {
    core.field.drop_at(x, y, intensity)
}

pub(super) fn drop_kind(core: &mut RippleCore, x: i32, y: i32, kind: DropletKind) -> bool {
    let intensity = kind.intensity(&core.config);
    core.field.drop_at(x, y, intensity)
}

pub(super) fn pointer_at(core: &mut RippleCore, x: f64, y: f64) -> bool {
    if !x.is_finite() || !y.is_finite() {
        return false;
    }
    drop_kind(core, x.floor() as i32, y.floor() as i32, DropletKind::Pointer)
}

pub(super) fn pointer_enter(core: &mut RippleCore) -> u32 {
    let count = core.config.hover_droplets;
    if count == 0 {
        return 0;
    }
    let intensity = DropletKind::Hover.intensity(&core.config);
    let spacing = core.config.hover_spacing_ms as f64;
    let (w, h) = (core.width(), core.height());

    let (x, y) = interior_point(&mut core.rng_state, w, h, DROPLET_RADIUS);
    core.field.drop_at(x, y, intensity);

    for i in 1..count {
        let (x, y) = interior_point(&mut core.rng_state, w, h, DROPLET_RADIUS);
        core.bursts.push(core.clock_ms + spacing * i as f64, Droplet { x, y, intensity });
    }
    count
}

pub(super) fn reset(core: &mut RippleCore) {
    core.field.clear();
    core.bursts.clear();
    core.target.clone_from(&core.source);
    core.frame = 0;
    core.clock_ms = 0.0;
    core.rng_state = super::random::seed_state(core.config.seed);
    core.perf_stats.reset();
}
