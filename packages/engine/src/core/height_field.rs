//! HeightField - ping-pong pair of padded surface-height buffers
//!
//! Layout: `(width + 2*PAD) x (height + 2*PAD)` floats, row-major.
//! Canvas pixel (x, y) lives at padded cell (x + PAD, y + PAD). The padding
//! ring is never written, so the 12-point stencil can read two cells past any
//! canvas edge without a bounds check and always sees zero there.

/// Cells of padding on every side of the canvas area
pub const PAD: u32 = 2;

/// Droplet radius in cells. Equal to the padding so a droplet never spills
/// into the ring.
pub const DROPLET_RADIUS: i32 = PAD as i32;

pub struct HeightField {
    width: u32,
    height: u32,
    stride: usize,

    // "current" is authoritative for this tick; "next" holds the tick before
    // last and receives the propagation result.
    current: Vec<f32>,
    next: Vec<f32>,
}

impl HeightField {
    pub fn new(width: u32, height: u32) -> Self {
        let stride = (width + 2 * PAD) as usize;
        let len = stride * (height + 2 * PAD) as usize;
        Self {
            width,
            height,
            stride,
            current: vec![0.0; len],
            next: vec![0.0; len],
        }
    }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    /// Row length of the padded buffers
    pub fn stride(&self) -> usize { self.stride }

    /// Padded dimensions `(width + 4, height + 4)`
    pub fn padded_dims(&self) -> (u32, u32) {
        (self.width + 2 * PAD, self.height + 2 * PAD)
    }

    pub fn padded_len(&self) -> usize { self.current.len() }

    /// Padded index of canvas pixel (x, y)
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y + PAD) as usize * self.stride + (x + PAD) as usize
    }

    pub fn current(&self) -> &[f32] { &self.current }

    pub fn next(&self) -> &[f32] { &self.next }

    /// Height of canvas pixel (x, y) in the current buffer
    pub fn height_at(&self, x: u32, y: u32) -> f32 {
        self.current[self.index(x, y)]
    }

    /// Split borrow for the propagation pass: read current, write next
    pub(crate) fn split_mut(&mut self) -> (&[f32], &mut [f32]) {
        (&self.current, &mut self.next)
    }

    /// Ping-pong: next becomes current
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Flatten both buffers
    pub fn clear(&mut self) {
        self.current.fill(0.0);
        self.next.fill(0.0);
    }

    pub fn is_flat(&self) -> bool {
        self.current.iter().all(|&h| h == 0.0) && self.next.iter().all(|&h| h == 0.0)
    }

    /// Mean absolute height of the current buffer over the canvas area
    pub fn mean_abs(&self) -> f32 {
        let cells = (self.width * self.height) as usize;
        if cells == 0 {
            return 0.0;
        }
        let mut sum = 0.0f64;
        for y in 0..self.height {
            let row = self.index(0, y);
            for &h in &self.current[row..row + self.width as usize] {
                sum += h.abs() as f64;
            }
        }
        (sum / cells as f64) as f32
    }

    /// True when canvas pixel (x, y) can take a droplet without the droplet
    /// reaching the padding ring.
    #[inline]
    pub fn accepts_droplet(&self, x: i32, y: i32) -> bool {
        x >= DROPLET_RADIUS
            && y >= DROPLET_RADIUS
            && x < self.width as i32 - DROPLET_RADIUS
            && y < self.height as i32 - DROPLET_RADIUS
    }

    /// Raise the current buffer around canvas pixel (x, y).
    ///
    /// Each cell within `DROPLET_RADIUS` gains `intensity * (1 - d / radius)`.
    /// Centers closer than the radius to an edge are discarded, not clamped.
    /// Returns whether the droplet was applied.
    pub fn drop_at(&mut self, x: i32, y: i32, intensity: f32) -> bool {
        if !self.accepts_droplet(x, y) {
            return false;
        }

        let r = DROPLET_RADIUS;
        let radius = r as f32;
        for dy in -r..=r {
            for dx in -r..=r {
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist >= radius {
                    continue;
                }
                let idx = self.index((x + dx) as u32, (y + dy) as u32);
                fast!(self.current, [idx] += intensity * (1.0 - dist / radius));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_is_zero(field: &HeightField) -> bool {
        let (pw, ph) = field.padded_dims();
        let stride = field.stride();
        for buf in [field.current(), field.next()] {
            for py in 0..ph as usize {
                for px in 0..pw as usize {
                    let in_ring = px < PAD as usize
                        || py < PAD as usize
                        || px >= (pw - PAD) as usize
                        || py >= (ph - PAD) as usize;
                    if in_ring && buf[py * stride + px] != 0.0 {
                        return false;
                    }
                }
            }
        }
        true
    }

    #[test]
    fn buffers_are_padded_by_two_cells() {
        let field = HeightField::new(10, 6);
        assert_eq!(field.padded_dims(), (14, 10));
        assert_eq!(field.padded_len(), 140);
        assert_eq!(field.current().len(), field.next().len());
        assert_eq!(field.index(0, 0), 2 * 14 + 2);
    }

    #[test]
    fn droplet_falls_off_with_distance() {
        let mut field = HeightField::new(16, 16);
        assert!(field.drop_at(8, 8, 100.0));

        assert_eq!(field.height_at(8, 8), 100.0);
        assert_eq!(field.height_at(9, 8), 50.0);
        let diag = 100.0 * (1.0 - 2f32.sqrt() / 2.0);
        assert!((field.height_at(9, 9) - diag).abs() < 1e-4);
        // distance == radius contributes nothing
        assert_eq!(field.height_at(10, 8), 0.0);
        assert_eq!(field.height_at(11, 8), 0.0);
    }

    #[test]
    fn droplets_accumulate() {
        let mut field = HeightField::new(16, 16);
        field.drop_at(8, 8, 10.0);
        field.drop_at(8, 8, 15.0);
        assert_eq!(field.height_at(8, 8), 25.0);
    }

    #[test]
    fn droplets_near_edges_are_discarded() {
        let mut field = HeightField::new(16, 16);
        for (x, y) in [(0, 0), (1, 8), (8, 1), (14, 8), (8, 14), (16, 16), (-3, 5), (500, 500)] {
            assert!(!field.drop_at(x, y, 1000.0), "({x},{y}) should be rejected");
        }
        assert!(field.is_flat());

        // First and last accepted centers
        assert!(field.drop_at(2, 2, 1.0));
        assert!(field.drop_at(13, 13, 1.0));
        assert!(ring_is_zero(&field));
    }

    #[test]
    fn swap_exchanges_roles() {
        let mut field = HeightField::new(8, 8);
        field.drop_at(4, 4, 7.0);
        field.swap();
        assert_eq!(field.height_at(4, 4), 0.0);
        assert_eq!(field.next()[field.index(4, 4)], 7.0);
        field.clear();
        assert!(field.is_flat());
    }

    #[test]
    fn mean_abs_counts_negative_heights() {
        let mut field = HeightField::new(5, 5);
        field.drop_at(2, 2, -25.0);
        let expected = field.current().iter().map(|h| h.abs()).sum::<f32>() / 25.0;
        assert!((field.mean_abs() - expected).abs() < 1e-5);
    }
}
