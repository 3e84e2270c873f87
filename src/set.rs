//! Ordered sets with unique or repeated keys.

use core::fmt;

use crate::{
    Compare, Error, Natural,
    helper::identity,
    tree::{IntoIter, Iter, RbTree},
};

/// An ordered set of unique keys backed by a red-black tree.
///
/// Keys are kept sorted by the comparator `C`; inserting a key equal to one
/// already present leaves the set unchanged.
///
/// # Type Parameters
///
/// * `K` - The key type
/// * `C` - The ordering, [`Natural`] by default
pub struct OrderedSet<K, C = Natural> {
    tree: RbTree<K, K, C>,
}

impl<K, C: Compare<K>> OrderedSet<K, C> {
    /// Creates an empty set ordered by the comparator's default value
    pub fn new() -> Self
    where
        C: Default,
    {
        Self::with_comparator(C::default())
    }

    /// Creates an empty set ordered by `compare`.
    ///
    /// # Arguments
    ///
    /// * `compare` - Strict ordering over keys
    ///
    /// # Returns
    ///
    /// * `Self` - An empty set
    pub fn with_comparator(compare: C) -> Self {
        Self {
            tree: RbTree::with_comparator(identity, compare),
        }
    }

    /// Number of keys in the set
    #[inline]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the set holds no keys
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Adds `key` to the set.
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if the key was not present before
    pub fn insert(&mut self, key: K) -> bool {
        self.tree.insert_unique(key).1
    }

    /// Fallible [`insert`](Self::insert); the set is unchanged on error.
    pub fn try_insert(&mut self, key: K) -> Result<bool, Error> {
        Ok(self.tree.try_insert_unique(key)?.1)
    }

    /// Returns true if a key equal to `key` is present
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Returns the stored key equal to `key`
    pub fn get(&self, key: &K) -> Option<&K> {
        self.tree.get(self.tree.find(key))
    }

    /// Removes `key` from the set.
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if the key was present
    pub fn remove(&mut self, key: &K) -> bool {
        self.tree.erase_unique(key) == 1
    }

    /// Removes and returns the stored key equal to `key`
    pub fn take(&mut self, key: &K) -> Option<K> {
        let pos = self.tree.find(key);
        self.tree.erase(pos).map(|(value, _)| value)
    }

    /// Smallest key
    #[inline]
    pub fn first(&self) -> Option<&K> {
        self.tree.first()
    }

    /// Largest key
    #[inline]
    pub fn last(&self) -> Option<&K> {
        self.tree.last()
    }

    /// Removes and returns the smallest key
    #[inline]
    pub fn pop_first(&mut self) -> Option<K> {
        self.tree.pop_first()
    }

    /// Removes and returns the largest key
    #[inline]
    pub fn pop_last(&mut self) -> Option<K> {
        self.tree.pop_last()
    }

    /// First key not ordered before `key`
    pub fn lower_bound(&self, key: &K) -> Option<&K> {
        self.tree.get(self.tree.lower_bound(key))
    }

    /// First key ordered after `key`
    pub fn upper_bound(&self, key: &K) -> Option<&K> {
        self.tree.get(self.tree.upper_bound(key))
    }

    /// Iterates, in order, over the keys not ordered before `key`
    pub fn range_from(&self, key: &K) -> Iter<'_, K> {
        self.tree.range(self.tree.lower_bound(key), self.tree.end())
    }

    /// Iterates over the keys in order
    #[inline]
    pub fn iter(&self) -> Iter<'_, K> {
        self.tree.iter()
    }

    /// Removes every key
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K, C: Compare<K> + Default> Default for OrderedSet<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, C: Clone> Clone for OrderedSet<K, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq, C> PartialEq for OrderedSet<K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, C> Eq for OrderedSet<K, C> {}

impl<K: fmt::Debug, C> fmt::Debug for OrderedSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tree.iter()).finish()
    }
}

impl<K, C: Compare<K>> Extend<K> for OrderedSet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.tree.insert_unique_hint(self.tree.end(), key);
        }
    }
}

impl<K, C: Compare<K> + Default> FromIterator<K> for OrderedSet<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K, C> IntoIterator for OrderedSet<K, C> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, K, C> IntoIterator for &'a OrderedSet<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.iter()
    }
}

/// An ordered collection of keys that may repeat, backed by a red-black tree.
///
/// Equal keys are kept in insertion order.
pub struct OrderedMultiSet<K, C = Natural> {
    tree: RbTree<K, K, C>,
}

impl<K, C: Compare<K>> OrderedMultiSet<K, C> {
    /// Creates an empty multiset ordered by the comparator's default value
    pub fn new() -> Self
    where
        C: Default,
    {
        Self::with_comparator(C::default())
    }

    /// Creates an empty multiset ordered by `compare`
    pub fn with_comparator(compare: C) -> Self {
        Self {
            tree: RbTree::with_comparator(identity, compare),
        }
    }

    /// Number of stored keys, duplicates included
    #[inline]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the multiset holds no keys
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Adds `key`, after any keys equal to it
    pub fn insert(&mut self, key: K) {
        self.tree.insert_multi(key);
    }

    /// Fallible [`insert`](Self::insert); the multiset is unchanged on error.
    pub fn try_insert(&mut self, key: K) -> Result<(), Error> {
        self.tree.try_insert_multi(key).map(|_| ())
    }

    /// Returns true if at least one key equal to `key` is present
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Number of stored keys equal to `key`
    pub fn count(&self, key: &K) -> usize {
        self.tree.count_multi(key)
    }

    /// Removes the oldest key equal to `key`.
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if a key was removed
    pub fn remove_one(&mut self, key: &K) -> bool {
        let pos = self.tree.find(key);
        self.tree.erase(pos).is_some()
    }

    /// Removes every key equal to `key`.
    ///
    /// # Returns
    ///
    /// * `usize` - The number of keys removed
    pub fn remove_all(&mut self, key: &K) -> usize {
        self.tree.erase_multi(key)
    }

    /// Iterates over the keys equal to `key`, oldest first
    pub fn equal_range(&self, key: &K) -> Iter<'_, K> {
        let (first, last) = self.tree.equal_range_multi(key);
        self.tree.range(first, last)
    }

    /// Smallest key
    #[inline]
    pub fn first(&self) -> Option<&K> {
        self.tree.first()
    }

    /// Largest key
    #[inline]
    pub fn last(&self) -> Option<&K> {
        self.tree.last()
    }

    /// Removes and returns the smallest key
    #[inline]
    pub fn pop_first(&mut self) -> Option<K> {
        self.tree.pop_first()
    }

    /// Removes and returns the largest key
    #[inline]
    pub fn pop_last(&mut self) -> Option<K> {
        self.tree.pop_last()
    }

    /// First key not ordered before `key`
    pub fn lower_bound(&self, key: &K) -> Option<&K> {
        self.tree.get(self.tree.lower_bound(key))
    }

    /// First key ordered after `key`
    pub fn upper_bound(&self, key: &K) -> Option<&K> {
        self.tree.get(self.tree.upper_bound(key))
    }

    /// Iterates, in order, over the keys not ordered before `key`
    pub fn range_from(&self, key: &K) -> Iter<'_, K> {
        self.tree.range(self.tree.lower_bound(key), self.tree.end())
    }

    /// Iterates over the keys in order
    #[inline]
    pub fn iter(&self) -> Iter<'_, K> {
        self.tree.iter()
    }

    /// Removes every key
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K, C: Compare<K> + Default> Default for OrderedMultiSet<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, C: Clone> Clone for OrderedMultiSet<K, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq, C> PartialEq for OrderedMultiSet<K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, C> Eq for OrderedMultiSet<K, C> {}

impl<K: fmt::Debug, C> fmt::Debug for OrderedMultiSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tree.iter()).finish()
    }
}

impl<K, C: Compare<K>> Extend<K> for OrderedMultiSet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.tree.insert_multi_hint(self.tree.end(), key);
        }
    }
}

impl<K, C: Compare<K> + Default> FromIterator<K> for OrderedMultiSet<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K, C> IntoIterator for OrderedMultiSet<K, C> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, K, C> IntoIterator for &'a OrderedMultiSet<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.iter()
    }
}
