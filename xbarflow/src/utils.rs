//! Utilities.

/// Returns ceiling log2.
///
/// This is the number of bits needed to index `value` distinct items.
pub const fn clog2(value: u64) -> u32 {
    if value == 0 {
        0
    } else {
        u64::BITS - (value - 1).leading_zeros()
    }
}

/// Returns floor log2
pub const fn flog2(val: u64) -> u32 {
    if val <= 1 {
        0
    } else {
        1 + flog2(val >> 1)
    }
}

/// Returns `true` if `value` is a nonzero power of two.
pub const fn is_pow2(value: u64) -> bool { value != 0 && (value & (value - 1)) == 0 }

/// Return aligned value of `value` by `by`, rounding up.
///
/// `by` must be a power of two.
///
/// ### Example
/// ```
/// # use xbarflow::align_up;
/// assert_eq!(align_up(0x100, 0x1000), 0x1000);
/// assert_eq!(align_up(0x2000, 0x1000), 0x2000);
/// ```
pub const fn align_up(value: u64, by: u64) -> u64 { (value + by - 1) & !(by - 1) }

/// Returns a mask of the lowest `bits` bits.
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Some or executing the given expression.
#[macro_export]
macro_rules! some_or {
    ($e:expr, $err:expr) => {{
        match $e {
            Some(r) => r,
            None => $err,
        }
    }};
}
