//! Ripple propagation + refraction
//!
//! One pass over every canvas cell does two things:
//!
//! - propagation: `next = (stencil(current) / 6 - next) * damping`, where the
//!   stencil sums the 8 neighbours and the 4 cells two steps away along the
//!   axes. With `next` still holding the tick-before-last this is the usual
//!   "twice the neighbour average minus the previous height" wave update.
//! - refraction: the current height picks a diagonal sampling offset into the
//!   snapshot and a brightness delta for the target pixel.
//!
//! Rows are independent (each writes only its own `next` row and target row),
//! so with the `parallel` feature they are spread over the rayon pool.

use crate::core::{HeightField, PixelBuffer, PAD};
use crate::domain::RippleConfig;

#[derive(Clone, Copy, Debug)]
pub struct RippleParams {
    pub damping: f32,
    pub displacement_factor: f32,
    pub luminance_factor: f32,
}

impl From<&RippleConfig> for RippleParams {
    fn from(config: &RippleConfig) -> Self {
        Self {
            damping: config.damping,
            displacement_factor: config.displacement_factor,
            luminance_factor: config.luminance_factor,
        }
    }
}

/// Add `delta` to R, G and B, clamping each to [0, 255]. Alpha unchanged.
#[inline]
pub fn shade(px: [u8; 4], delta: i32) -> [u8; 4] {
    [
        (px[0] as i32).saturating_add(delta).clamp(0, 255) as u8,
        (px[1] as i32).saturating_add(delta).clamp(0, 255) as u8,
        (px[2] as i32).saturating_add(delta).clamp(0, 255) as u8,
        px[3],
    ]
}

#[inline(always)]
fn stencil_sum(cur: &[f32], i: usize, stride: usize) -> f32 {
    *fast!(cur, [i - 1])
        + *fast!(cur, [i + 1])
        + *fast!(cur, [i - stride])
        + *fast!(cur, [i + stride])
        + *fast!(cur, [i - stride - 1])
        + *fast!(cur, [i - stride + 1])
        + *fast!(cur, [i + stride - 1])
        + *fast!(cur, [i + stride + 1])
        + *fast!(cur, [i - 2])
        + *fast!(cur, [i + 2])
        + *fast!(cur, [i - 2 * stride])
        + *fast!(cur, [i + 2 * stride])
}

struct RowContext<'a> {
    width: u32,
    height: u32,
    stride: usize,
    current: &'a [f32],
    source: &'a [u8],
    params: RippleParams,
}

fn propagate_row(ctx: &RowContext, y: u32, next_row: &mut [f32], target_row: &mut [u8]) {
    let row_base = (y + PAD) as usize * ctx.stride;
    let max_x = ctx.width as i32 - 1;
    let max_y = ctx.height as i32 - 1;
    let p = ctx.params;

    for x in 0..ctx.width {
        let px = (x + PAD) as usize;
        let i = row_base + px;

        let prev = *fast!(next_row, [px]);
        let sum = stencil_sum(ctx.current, i, ctx.stride);
        fast!(next_row, [px] = (sum / 6.0 - prev) * p.damping);

        let h = *fast!(ctx.current, [i]);
        let offset = (h * p.displacement_factor).floor() as i32;
        let sx = (x as i32).saturating_add(offset).clamp(0, max_x) as usize;
        let sy = (y as i32).saturating_add(offset).clamp(0, max_y) as usize;
        let src = (sy * ctx.width as usize + sx) * 4;
        let sample = [
            *fast!(ctx.source, [src]),
            *fast!(ctx.source, [src + 1]),
            *fast!(ctx.source, [src + 2]),
            *fast!(ctx.source, [src + 3]),
        ];

        let delta = (h * p.luminance_factor).floor() as i32;
        let out = shade(sample, delta);
        let dst = x as usize * 4;
        target_row[dst..dst + 4].copy_from_slice(&out);
    }
}

/// Run one propagation + refraction pass. Does not swap the buffers.
pub fn propagate(field: &mut HeightField, source: &PixelBuffer, target: &mut PixelBuffer, params: RippleParams) {
    let width = field.width();
    let height = field.height();
    if width == 0 || height == 0 {
        return;
    }
    debug_assert_eq!((source.width(), source.height()), (width, height));
    debug_assert_eq!((target.width(), target.height()), (width, height));

    let stride = field.stride();
    let row_bytes = target.row_bytes();
    let (current, next) = field.split_mut();
    let ctx = RowContext {
        width,
        height,
        stride,
        current,
        source: source.as_bytes(),
        params,
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        next.par_chunks_mut(stride)
            .skip(PAD as usize)
            .take(height as usize)
            .zip(target.as_bytes_mut().par_chunks_mut(row_bytes))
            .enumerate()
            .for_each(|(y, (next_row, target_row))| {
                propagate_row(&ctx, y as u32, next_row, target_row);
            });
    }

    #[cfg(not(feature = "parallel"))]
    {
        let rows = next.chunks_mut(stride).skip(PAD as usize).take(height as usize);
        let targets = target.as_bytes_mut().chunks_mut(row_bytes);
        for (y, (next_row, target_row)) in rows.zip(targets).enumerate() {
            propagate_row(&ctx, y as u32, next_row, target_row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RippleParams {
        RippleParams::from(&RippleConfig::default())
    }

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buf.set_pixel(x, y, [(x * 9) as u8, (y * 5) as u8, 90, 255]);
            }
        }
        buf
    }

    #[test]
    fn shade_clamps_extreme_deltas() {
        let px = [10, 128, 250, 77];
        assert_eq!(shade(px, 0), px);
        assert_eq!(shade(px, 10), [20, 138, 255, 77]);
        assert_eq!(shade(px, -20), [0, 108, 230, 77]);
        assert_eq!(shade(px, i32::MAX), [255, 255, 255, 77]);
        assert_eq!(shade(px, i32::MIN), [0, 0, 0, 77]);
        assert_eq!(shade([0, 0, 0, 255], 100_000), [255, 255, 255, 255]);
    }

    #[test]
    fn flat_field_copies_snapshot() {
        let source = gradient(12, 9);
        let mut target = PixelBuffer::new(12, 9);
        let mut field = HeightField::new(12, 9);

        propagate(&mut field, &source, &mut target, params());
        assert_eq!(target, source);
        assert!(field.is_flat());
    }

    #[test]
    fn propagation_matches_stencil() {
        let mut field = HeightField::new(16, 16);
        let source = gradient(16, 16);
        let mut target = PixelBuffer::new(16, 16);
        field.drop_at(8, 8, 60.0);

        let p = RippleParams { damping: 0.5, displacement_factor: 0.0, luminance_factor: 0.0 };
        propagate(&mut field, &source, &mut target, p);

        let cur = field.current();
        let stride = field.stride();
        let i = field.index(9, 8);
        let expected = (stencil_sum(cur, i, stride) / 6.0 - 0.0) * 0.5;
        assert!((field.next()[i] - expected).abs() < 1e-5);
        assert!(expected > 0.0);

        // Padding ring stays untouched
        assert_eq!(field.next()[0], 0.0);
        assert_eq!(field.next()[field.padded_len() - 1], 0.0);
    }

    #[test]
    fn height_displaces_and_brightens() {
        let source = gradient(16, 16);
        let mut target = PixelBuffer::new(16, 16);
        let mut field = HeightField::new(16, 16);
        field.drop_at(8, 8, 100.0);

        let p = RippleParams { damping: 0.9, displacement_factor: 0.03125, luminance_factor: 0.125 };
        propagate(&mut field, &source, &mut target, p);

        // h = 100: offset floor(3.125) = 3, delta floor(12.5) = 12
        let expected = shade(source.pixel(11, 11), 12);
        assert_eq!(target.pixel(8, 8), expected);
        // untouched cells copy straight through
        assert_eq!(target.pixel(0, 0), source.pixel(0, 0));
    }

    #[test]
    fn negative_offsets_clamp_to_image() {
        let source = gradient(8, 8);
        let mut target = PixelBuffer::new(8, 8);
        let mut field = HeightField::new(8, 8);
        field.drop_at(2, 2, -1000.0);

        let p = RippleParams { damping: 0.9, displacement_factor: 1.0, luminance_factor: 0.0 };
        propagate(&mut field, &source, &mut target, p);
        assert_eq!(target.pixel(2, 2), source.pixel(0, 0));
    }
}
