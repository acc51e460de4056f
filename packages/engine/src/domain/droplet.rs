//! Droplets - momentary energy injections into the height field
//!
//! A droplet is applied in place the moment it fires and leaves no record.
//! Only the staggered hover burst needs to wait, so it sits in a small queue
//! keyed on the simulation clock until its time comes.

use super::config::RippleConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropletKind {
    /// Idle animation, every N ticks
    Ambient,
    /// Pointer move or click
    Pointer,
    /// Pointer enter burst
    Hover,
}

impl DropletKind {
    pub fn intensity(self, config: &RippleConfig) -> f32 {
        match self {
            DropletKind::Ambient => config.ambient_intensity,
            DropletKind::Pointer => config.pointer_intensity,
            DropletKind::Hover => config.hover_intensity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Droplet {
    pub x: i32,
    pub y: i32,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingDroplet {
    pub due_ms: f64,
    pub droplet: Droplet,
}

/// Droplets waiting for their release time
#[derive(Default)]
pub struct BurstQueue {
    pending: Vec<PendingDroplet>,
}

impl BurstQueue {
    pub fn new() -> Self {
        Self { pending: Vec::with_capacity(16) }
    }

    pub fn push(&mut self, due_ms: f64, droplet: Droplet) {
        self.pending.push(PendingDroplet { due_ms, droplet });
    }

    pub fn len(&self) -> usize { self.pending.len() }

    pub fn is_empty(&self) -> bool { self.pending.is_empty() }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove every droplet due at or before `now_ms`, in scheduling order
    pub fn drain_due(&mut self, now_ms: f64, out: &mut Vec<Droplet>) {
        let mut write = 0;
        for read in 0..self.pending.len() {
            let p = self.pending[read];
            if p.due_ms <= now_ms {
                out.push(p.droplet);
            } else {
                self.pending[write] = p;
                write += 1;
            }
        }
        self.pending.truncate(write);
    }
}
