//! One-hot vectors.

/// Returns the index of the set bit of a one-hot vector, or `None` if no bit is set.
///
/// The vector must have at most one bit set.
pub fn one_hot_to_index(bits: &[bool]) -> Option<usize> {
    debug_assert!(is_one_hot_or_zero(bits), "vector is not one-hot: {:?}", bits);
    bits.iter().position(|b| *b)
}

/// Returns a one-hot vector of width `width` with bit `index` set.
pub fn index_to_one_hot(width: usize, index: usize) -> Vec<bool> {
    assert!(index < width, "index {} out of one-hot width {}", index, width);
    (0..width).map(|i| i == index).collect()
}

/// Returns `true` if at most one bit is set.
pub fn is_one_hot_or_zero(bits: &[bool]) -> bool { bits.iter().filter(|b| **b).count() <= 1 }
