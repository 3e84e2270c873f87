//! Ordered maps with unique or repeated keys.

use alloc::vec;
use core::{fmt, iter::FusedIterator, ops::Index};

use crate::{
    Compare, Error, Natural,
    helper::pair_key,
    tree::{self, RbTree},
};

/// Splits a stored entry into a shared key and a mutable value.
fn split_entry<K, V>(entry: &mut (K, V)) -> (&K, &mut V) {
    let (key, value) = entry;
    (key, value)
}

/// Iterator over the entries of a map, in key order.
pub struct Iter<'a, K, V> {
    inner: tree::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over the entries of a map with mutable values, in key order.
pub struct IterMut<'a, K, V> {
    inner: vec::IntoIter<&'a mut (K, V)>,
}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.inner.len()).finish()
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(split_entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(split_entry)
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An ordered map with unique keys backed by a red-black tree.
///
/// Entries are stored as `(K, V)` pairs ordered by key.
///
/// # Type Parameters
///
/// * `K` - The key type
/// * `V` - The value type
/// * `C` - The ordering over keys, [`Natural`] by default
pub struct OrderedMap<K, V, C = Natural> {
    tree: RbTree<(K, V), K, C>,
}

impl<K, V, C: Compare<K>> OrderedMap<K, V, C> {
    /// Creates an empty map ordered by the comparator's default value
    pub fn new() -> Self
    where
        C: Default,
    {
        Self::with_comparator(C::default())
    }

    /// Creates an empty map ordered by `compare`.
    ///
    /// # Arguments
    ///
    /// * `compare` - Strict ordering over keys
    ///
    /// # Returns
    ///
    /// * `Self` - An empty map
    pub fn with_comparator(compare: C) -> Self {
        Self {
            tree: RbTree::with_comparator(pair_key, compare),
        }
    }

    /// Number of entries
    #[inline]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the map holds no entries
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Inserts `value` under `key`.
    ///
    /// If the key is already present its value is replaced and the stored
    /// key is kept.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert under
    /// * `value` - The value to store
    ///
    /// # Returns
    ///
    /// * `Option<V>` - The previous value for the key, if any
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.tree.insert_unique_or_reject((key, value)) {
            Ok(_) => None,
            Err((pos, (_, value))) => self
                .tree
                .get_mut(pos)
                .map(|entry| core::mem::replace(&mut entry.1, value)),
        }
    }

    /// Fallible [`insert`](Self::insert); the map is unchanged on error.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if let Some(current) = self.get_mut(&key) {
            return Ok(Some(core::mem::replace(current, value)));
        }
        self.tree.try_insert_unique((key, value))?;
        Ok(None)
    }

    /// Returns the value stored under `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(self.tree.find(key)).map(|(_, value)| value)
    }

    /// Returns the value stored under `key` mutably
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let pos = self.tree.find(key);
        self.tree.get_mut(pos).map(|(_, value)| value)
    }

    /// Returns the stored key and value for `key`
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.get(self.tree.find(key)).map(|(key, value)| (key, value))
    }

    /// Returns true if an entry for `key` is present
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Removes the entry for `key`.
    ///
    /// # Returns
    ///
    /// * `Option<V>` - The removed value, if the key was present
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes the entry for `key` and returns the stored key and value
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let pos = self.tree.find(key);
        self.tree.erase(pos).map(|(entry, _)| entry)
    }

    /// Entry with the smallest key
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(key, value)| (key, value))
    }

    /// Entry with the largest key
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|(key, value)| (key, value))
    }

    /// Removes and returns the entry with the smallest key
    #[inline]
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    /// Removes and returns the entry with the largest key
    #[inline]
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    /// Iterates over the entries in key order
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    /// Iterates over the entries in key order with mutable values
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.tree.values_mut(),
        }
    }

    /// Iterates over the keys in order
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Iterates over the values in key order
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Iterates over the values in key order, mutably
    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> {
        self.iter_mut().map(|(_, value)| value)
    }

    /// Iterates, in key order, over the entries whose key is not ordered before `key`
    pub fn range_from(&self, key: &K) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.range(self.tree.lower_bound(key), self.tree.end()),
        }
    }

    /// Removes every entry
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K, V, C: Compare<K> + Default> Default for OrderedMap<K, V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for OrderedMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for OrderedMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for OrderedMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OrderedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.tree.iter().map(|(key, value)| (key, value))).finish()
    }
}

impl<K, V, C: Compare<K>> Index<&K> for OrderedMap<K, V, C> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found in OrderedMap"),
        }
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for OrderedMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for OrderedMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> IntoIterator for OrderedMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = tree::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a OrderedMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.tree.iter(),
        }
    }
}

/// An ordered map that may hold several entries per key.
///
/// Entries with equal keys are kept in insertion order.
pub struct OrderedMultiMap<K, V, C = Natural> {
    tree: RbTree<(K, V), K, C>,
}

impl<K, V, C: Compare<K>> OrderedMultiMap<K, V, C> {
    /// Creates an empty multimap ordered by the comparator's default value
    pub fn new() -> Self
    where
        C: Default,
    {
        Self::with_comparator(C::default())
    }

    /// Creates an empty multimap ordered by `compare`
    pub fn with_comparator(compare: C) -> Self {
        Self {
            tree: RbTree::with_comparator(pair_key, compare),
        }
    }

    /// Number of entries, duplicates included
    #[inline]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the multimap holds no entries
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Adds an entry, after any entries with an equal key
    pub fn insert(&mut self, key: K, value: V) {
        self.tree.insert_multi((key, value));
    }

    /// Fallible [`insert`](Self::insert); the multimap is unchanged on error.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), Error> {
        self.tree.try_insert_multi((key, value)).map(|_| ())
    }

    /// Iterates over the values stored under `key`, oldest first.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Returns
    ///
    /// * `impl Iterator<Item = &V>` - Values for `key` in insertion order
    pub fn get_all(&self, key: &K) -> impl DoubleEndedIterator<Item = &V> {
        let (first, last) = self.tree.equal_range_multi(key);
        self.tree.range(first, last).map(|(_, value)| value)
    }

    /// Number of entries stored under `key`
    pub fn count(&self, key: &K) -> usize {
        self.tree.count_multi(key)
    }

    /// Returns true if at least one entry for `key` is present
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Removes every entry stored under `key` and returns how many were removed
    pub fn remove_all(&mut self, key: &K) -> usize {
        self.tree.erase_multi(key)
    }

    /// Entry with the smallest key
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(key, value)| (key, value))
    }

    /// Entry with the largest key
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|(key, value)| (key, value))
    }

    /// Iterates over the entries in key order
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    /// Removes every entry
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K, V, C: Compare<K> + Default> Default for OrderedMultiMap<K, V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for OrderedMultiMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for OrderedMultiMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for OrderedMultiMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OrderedMultiMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tree.iter()).finish()
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for OrderedMultiMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for entry in iter {
            self.tree.insert_multi_hint(self.tree.end(), entry);
        }
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for OrderedMultiMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> IntoIterator for OrderedMultiMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = tree::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FloatTotalOrder;
    use alloc::{string::String, vec::Vec};

    #[test]
    fn test_map_insert_replaces_value() {
        let mut map = OrderedMap::<&str, i32>::new();
        assert_eq!(map.insert("b", 2), None);
        assert_eq!(map.insert("a", 1), None);
        assert_eq!(map.insert("b", 20), Some(2));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"b"), Some(&20));
        assert_eq!(map[&"a"], 1);
        assert_eq!(map.try_insert("c", 3), Ok(None));
        assert_eq!(map.try_insert("c", 30), Ok(Some(3)));
    }

    #[test]
    fn test_map_keeps_original_key_on_replace() {
        let by_len = |a: &String, b: &String| a.len() < b.len();
        let mut map = OrderedMap::with_comparator(by_len);
        map.insert(String::from("one"), 1);
        assert_eq!(map.insert(String::from("two"), 2), Some(1));
        assert_eq!(
            map.get_key_value(&String::from("six")),
            Some((&String::from("one"), &2))
        );
    }

    #[test]
    fn test_map_lookup_and_remove() {
        let mut map: OrderedMap<i32, char> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
        assert!(map.contains_key(&2));
        assert!(!map.contains_key(&4));
        assert_eq!(map.first_key_value(), Some((&1, &'a')));
        assert_eq!(map.last_key_value(), Some((&3, &'c')));

        if let Some(value) = map.get_mut(&2) {
            *value = 'B';
        }
        assert_eq!(map.remove(&2), Some('B'));
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.remove_entry(&1), Some((1, 'a')));
        assert_eq!(map.pop_last(), Some((3, 'c')));
        assert_eq!(map.pop_first(), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_map_iterators() {
        let mut map: OrderedMap<u32, u32> = (0..6).rev().map(|k| (k, k * 10)).collect();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4, 5]);
        assert_eq!(map.values().rev().copied().collect::<Vec<_>>(), [50, 40, 30, 20, 10, 0]);

        for (key, value) in map.iter_mut() {
            *value += key;
        }
        for value in map.values_mut() {
            *value += 1;
        }
        let entries: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
        assert_eq!(entries, [(0, 1), (1, 12), (2, 23), (3, 34), (4, 45), (5, 56)]);

        let tail: Vec<_> = map.range_from(&4).map(|(&k, _)| k).collect();
        assert_eq!(tail, [4, 5]);
        assert_eq!((&map).into_iter().count(), 6);
        assert_eq!(map.into_iter().next_back(), Some((5, 56)));
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn test_map_index_missing_key_panics() {
        let map = OrderedMap::<i32, i32>::new();
        let _ = map[&1];
    }

    #[test]
    fn test_map_clone_equality_and_debug() {
        let mut map = OrderedMap::<i32, &str>::new();
        map.extend([(2, "two"), (1, "one")]);
        let copy = map.clone();
        assert_eq!(copy, map);
        map.clear();
        assert_ne!(copy, map);
        assert_eq!(alloc::format!("{copy:?}"), r#"{1: "one", 2: "two"}"#);
    }

    #[test]
    fn test_map_with_float_keys() {
        let mut map = OrderedMap::<f64, usize, FloatTotalOrder>::new();
        map.insert(f64::NAN, 0);
        map.insert(0.5, 1);
        map.insert(f64::NAN, 2);
        map.insert(-0.0, 3);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&f64::NAN), Some(&2));
        assert_eq!(map.get(&0.0), Some(&3));
        assert!(map.last_key_value().is_some_and(|(k, _)| k.is_nan()));
    }

    #[test]
    fn test_multimap_groups_values() {
        let mut map = OrderedMultiMap::<&str, i32>::new();
        map.insert("x", 1);
        map.insert("y", 2);
        map.insert("x", 3);
        map.insert("x", 4);

        assert_eq!(map.len(), 4);
        assert_eq!(map.count(&"x"), 3);
        assert_eq!(map.get_all(&"x").copied().collect::<Vec<_>>(), [1, 3, 4]);
        assert_eq!(map.get_all(&"z").count(), 0);
        assert_eq!(map.first_key_value(), Some((&"x", &1)));
        assert_eq!(map.last_key_value(), Some((&"y", &2)));

        assert_eq!(map.remove_all(&"x"), 3);
        assert!(!map.contains_key(&"x"));
        assert_eq!(map.iter().collect::<Vec<_>>(), [(&"y", &2)]);
        assert!(map.try_insert("a", 0).is_ok());
        assert_eq!(alloc::format!("{map:?}"), r#"[("a", 0), ("y", 2)]"#);
    }

    #[test]
    fn test_multimap_from_iter_and_clone() {
        let map: OrderedMultiMap<u8, char> = [(2, 'b'), (1, 'a'), (2, 'c')].into_iter().collect();
        let copy = map.clone();
        assert_eq!(copy, map);
        assert_eq!(
            map.into_iter().collect::<Vec<_>>(),
            [(1, 'a'), (2, 'b'), (2, 'c')]
        );
        assert!(copy.iter().next_back().is_some_and(|(&k, &v)| k == 2 && v == 'c'));
        let mut copy = copy;
        copy.clear();
        assert!(copy.is_empty());
    }
}
