//! Key projections and sizing helpers shared by the containers.

/// Key projection for set-like trees: the stored value is its own key.
///
/// # Arguments
///
/// * `value` - The stored value
///
/// # Returns
///
/// * `&K` - The value itself
#[inline]
pub fn identity<K>(value: &K) -> &K {
    value
}

/// Key projection for map-like trees storing `(key, value)` pairs.
///
/// # Arguments
///
/// * `pair` - The stored key-value pair
///
/// # Returns
///
/// * `&K` - The key half of the pair
#[inline]
pub fn pair_key<K, V>(pair: &(K, V)) -> &K {
    &pair.0
}

/// Number of elements held by one deque buffer.
///
/// Small types get a 4 KiB buffer, types of 256 bytes or more get 16 slots.
///
/// # Returns
///
/// * `usize` - The default buffer size for `T`, never zero
#[inline]
pub const fn deque_buf_size<T>() -> usize {
    let size = core::mem::size_of::<T>();
    if size == 0 {
        4096
    } else if size < 256 {
        4096 / size
    } else {
        16
    }
}
