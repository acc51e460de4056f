//! Zero-cost indexing for the stencil loops
//!
//! Debug builds keep ordinary bounds-checked indexing so an off-by-one in the
//! padded layout panics with a useful message. Release builds use unchecked
//! access: every index the propagation pass produces is proven in range by the
//! two-cell padding around the height field.
//!
//! ```rust
//! use ripple_engine::fast;
//!
//! let mut heights = vec![0.0f32; 8];
//! fast!(heights, [3] = 1.5);
//! fast!(heights, [3] += 0.5);
//! assert_eq!(*fast!(heights, [3]), 2.0);
//! ```

/// Read, write or accumulate into a slice without bounds checks in release.
///
/// - `fast!(slice, [i])` reads (returns a reference)
/// - `fast!(slice, [i] = v)` writes
/// - `fast!(slice, [i] += v)` accumulates
#[macro_export]
macro_rules! fast {
    ($slice:expr, [$index:expr]) => {{
        #[cfg(debug_assertions)]
        {
            &$slice[$index]
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe { $slice.get_unchecked($index) }
        }
    }};

    ($slice:expr, [$index:expr] = $val:expr) => {{
        #[cfg(debug_assertions)]
        {
            $slice[$index] = $val;
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe { *$slice.get_unchecked_mut($index) = $val; }
        }
    }};

    ($slice:expr, [$index:expr] += $val:expr) => {{
        #[cfg(debug_assertions)]
        {
            $slice[$index] += $val;
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe { *$slice.get_unchecked_mut($index) += $val; }
        }
    }};
}
