use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;

/// Strict weak ordering used by the ordered containers.
///
/// `less(a, b)` must return `true` exactly when `a` sorts strictly before `b`,
/// and must stay consistent for the whole lifetime of a container.
///
/// Any closure `Fn(&K, &K) -> bool` is a `Compare<K>`.
///
/// # Type Parameters
///
/// * `K` - The key type being ordered
pub trait Compare<K> {
    /// Returns `true` if `a` sorts strictly before `b`
    fn less(&self, a: &K, b: &K) -> bool;
}

/// Ascending order through `Ord`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

/// Descending order through `Ord`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Descending;

/// Total order for floating point keys, with NaN sorting above every other value.
///
/// Keys are compared as `OrderedFloat`, so `-0.0` and `0.0` are equal and
/// every NaN compares equal to every other NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatTotalOrder;

impl<K: Ord> Compare<K> for Natural {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

impl<K: Ord> Compare<K> for Descending {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        b < a
    }
}

impl<T: FloatCore> Compare<T> for FloatTotalOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        OrderedFloat(*a) < OrderedFloat(*b)
    }
}

impl<K, F> Compare<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}
