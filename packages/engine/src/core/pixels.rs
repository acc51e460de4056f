//! PixelBuffer - tightly packed RGBA8 image, row-major
//!
//! Same byte layout as canvas `ImageData`, so a buffer can be handed to
//! `putImageData` (or read from `getImageData`) without conversion.

use crate::error::{Result, RippleError};

pub const CHANNELS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Transparent black image
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    /// Single-colour image
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut buf = Self::new(width, height);
        for px in buf.data.chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&rgba);
        }
        buf
    }

    /// Wrap raw RGBA bytes (e.g. from `getImageData`)
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(RippleError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    pub fn as_bytes(&self) -> &[u8] { &self.data }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] { &mut self.data }

    pub fn as_ptr(&self) -> *const u8 { self.data.as_ptr() }

    pub fn len(&self) -> usize { self.data.len() }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Bytes per row
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * CHANNELS
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let o = self.offset(x, y);
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let o = self.offset(x, y);
        self.data[o..o + CHANNELS].copy_from_slice(&rgba);
    }

    /// Nearest-neighbour resample to `width x height`.
    /// Returns an exact copy when the size already matches.
    pub fn resample_nearest(&self, width: u32, height: u32) -> PixelBuffer {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = PixelBuffer::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = ((y as u64 * self.height as u64) / height as u64) as u32;
            for x in 0..width {
                let sx = ((x as u64 * self.width as u64) / width as u64) as u32;
                out.set_pixel(x, y, self.pixel(sx, sy));
            }
        }
        out
    }
}
