pub mod config;
pub mod droplet;

pub use config::{RippleConfig, DEFAULT_ALT_TEXT, DEFAULT_CANVAS_SIZE};
pub use droplet::{BurstQueue, Droplet, DropletKind};
