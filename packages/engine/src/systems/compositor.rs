//! Compositor - builds the source snapshot the ripple distorts
//!
//! Order matches the canvas draw calls it replaces:
//!   1. background scaled to the full canvas
//!   2. black overlay at `overlay_alpha`
//!   3. logo, square, `logo_scale` of the shorter side, centered, alpha-blended
//!
//! The result is opaque. Same inputs always give the same bytes.

use crate::core::PixelBuffer;
use crate::domain::RippleConfig;

/// Logo placement on the canvas: (left, top, side)
pub fn logo_rect(config: &RippleConfig, width: u32, height: u32) -> (u32, u32, u32) {
    let side = config.logo_side(width, height).min(width).min(height);
    ((width - side) / 2, (height - side) / 2, side)
}

pub fn composite(background: &PixelBuffer, logo: &PixelBuffer, config: &RippleConfig) -> PixelBuffer {
    let width = config.canvas_size;
    let height = config.canvas_size;

    let mut out = background.resample_nearest(width, height);

    // Overlay: source-over with black at overlay_alpha
    let keep = 1.0 - config.overlay_alpha;
    for px in out.as_bytes_mut().chunks_exact_mut(4) {
        px[0] = (px[0] as f32 * keep).round() as u8;
        px[1] = (px[1] as f32 * keep).round() as u8;
        px[2] = (px[2] as f32 * keep).round() as u8;
        px[3] = 255;
    }

    let (left, top, side) = logo_rect(config, width, height);
    if side == 0 {
        return out;
    }
    let logo = logo.resample_nearest(side, side);
    for ly in 0..side {
        for lx in 0..side {
            let [r, g, b, a] = logo.pixel(lx, ly);
            if a == 0 {
                continue;
            }
            let (x, y) = (left + lx, top + ly);
            let dst = out.pixel(x, y);
            out.set_pixel(
                x,
                y,
                [blend(r, dst[0], a), blend(g, dst[1], a), blend(b, dst[2], a), 255],
            );
        }
    }

    out
}

/// Source-over for one channel, integer rounding
#[inline]
fn blend(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + dst as u32 * (255 - a) + 127) / 255) as u8
}
