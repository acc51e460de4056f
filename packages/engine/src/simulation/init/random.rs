/// Random number generator (xorshift32)
#[inline]
pub(super) fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// xorshift32 never leaves 0, so a zero seed gets a fixed odd constant
pub(super) fn seed_state(seed: u32) -> u32 {
    if seed == 0 { 0x9E37_79B9 } else { seed }
}

/// Uniform point whose droplet fits entirely inside the canvas
pub(super) fn interior_point(state: &mut u32, width: u32, height: u32, margin: i32) -> (i32, i32) {
    let span_x = (width as i32 - 2 * margin).max(1) as u32;
    let span_y = (height as i32 - 2 * margin).max(1) as u32;
    let x = margin + (xorshift32(state) % span_x) as i32;
    let y = margin + (xorshift32(state) % span_y) as i32;
    (x, y)
}
