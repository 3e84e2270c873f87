use alloc::vec::Vec;
use core::{cmp::Ordering, fmt};

use super::algorithms::{erase_rebalance, insert_rebalance, maximum, minimum, predecessor, successor};
use super::cursor::{self, IntoIter, Iter, Position};
use super::node::{Arena, HEADER, MAX_SLOTS, NodeId};
use crate::{Compare, Deque, Error, Natural};

/// Depth bound for the clone worklist: a red-black tree over `u32` handles
/// is at most `2 * log2(n + 1)` levels deep.
const CLONE_STACK: usize = 2 * u32::BITS as usize + 2;

/// Which link of the parent a cloned node hangs from
#[derive(Debug, Clone, Copy)]
enum Side {
    Root,
    Left,
    Right,
}

/// A red-black tree storing values of type `V` ordered by a key `K`.
///
/// The key of a value is obtained through a projection function supplied at
/// construction, so the same engine serves set-like trees (the value is the
/// key) and map-like trees (the key is part of the value). Keys are ordered
/// by a [`Compare`] functor.
///
/// Nodes live in an arena and are addressed by [`Position`] handles. The
/// arena's first slot is the header sentinel: its parent is the root, its
/// left and right links cache the minimum and maximum, and it serves as the
/// end position.
///
/// Both unique-key (`insert_unique`) and multi-key (`insert_multi`) insertion
/// are available on the same tree; the adapters in this crate each use one.
///
/// - Insertion, erasure and lookup: O(log n)
/// - Access to minimum and maximum: O(1)
/// - Clear, drop and clone never recurse
pub struct RbTree<V, K, C = Natural> {
    /// Node storage, header in slot 0
    arena: Arena<V>,

    /// Number of values in the tree
    len: usize,

    /// Extracts the ordering key from a stored value
    key_of: fn(&V) -> &K,

    /// Strict ordering over keys
    compare: C,
}

impl<V, K, C> RbTree<V, K, C> {
    /// Creates an empty tree ordered by the comparator's default value.
    ///
    /// # Arguments
    ///
    /// * `key_of` - Projection from a stored value to its key
    ///
    /// # Returns
    ///
    /// * `Self` - An empty tree
    pub fn new(key_of: fn(&V) -> &K) -> Self
    where
        C: Default,
    {
        Self::with_comparator(key_of, C::default())
    }

    /// Creates an empty tree ordered by `compare`.
    ///
    /// # Arguments
    ///
    /// * `key_of` - Projection from a stored value to its key
    /// * `compare` - Strict ordering over keys
    ///
    /// # Returns
    ///
    /// * `Self` - An empty tree
    pub fn with_comparator(key_of: fn(&V) -> &K, compare: C) -> Self {
        Self {
            arena: Arena::new(),
            len: 0,
            key_of,
            compare,
        }
    }

    /// Returns the number of values in the tree
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no values
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the largest number of values a tree can hold
    #[inline]
    pub const fn max_size(&self) -> usize {
        MAX_SLOTS - 1
    }

    /// Returns the comparator ordering this tree
    #[inline]
    pub const fn key_comp(&self) -> &C {
        &self.compare
    }

    /// Returns the position of the smallest value, or [`end`](Self::end) if empty
    #[inline]
    pub fn begin(&self) -> Position {
        Position(self.arena.leftmost())
    }

    /// Returns the past-the-last position
    #[inline]
    pub const fn end(&self) -> Position {
        Position::END
    }

    /// Returns the smallest value
    #[inline]
    pub fn first(&self) -> Option<&V> {
        self.arena.value(self.arena.leftmost())
    }

    /// Returns the largest value
    #[inline]
    pub fn last(&self) -> Option<&V> {
        self.arena.value(self.arena.rightmost())
    }

    /// Returns the value at `pos`, or `None` for the end position.
    ///
    /// # Arguments
    ///
    /// * `pos` - A position obtained from this tree
    ///
    /// # Returns
    ///
    /// * `Option<&V>` - The value stored at the position
    #[inline]
    pub fn get(&self, pos: Position) -> Option<&V> {
        self.arena.value(pos.0)
    }

    /// Mutable access to a stored value. Callers must not change its key.
    #[inline]
    pub(crate) fn get_mut(&mut self, pos: Position) -> Option<&mut V> {
        self.arena.value_mut(pos.0)
    }

    /// Returns the position following `pos` in key order.
    ///
    /// The maximum is followed by [`end`](Self::end); `end` is followed by itself.
    #[inline]
    pub fn increment(&self, pos: Position) -> Position {
        cursor::increment(&self.arena, pos)
    }

    /// Returns the position preceding `pos` in key order.
    ///
    /// [`end`](Self::end) is preceded by the maximum.
    #[inline]
    pub fn decrement(&self, pos: Position) -> Position {
        cursor::decrement(&self.arena, pos)
    }

    /// Returns an in-order iterator over all values
    #[inline]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.arena, self.begin(), self.end(), self.len)
    }

    /// Returns an in-order iterator over the values in `[first, last)`.
    ///
    /// # Arguments
    ///
    /// * `first` - Position of the first value to yield
    /// * `last` - Position one past the last value to yield
    ///
    /// # Returns
    ///
    /// * `Iter<'_, V>` - A double-ended iterator over the range
    #[inline]
    pub fn range(&self, first: Position, last: Position) -> Iter<'_, V> {
        Iter::new(&self.arena, first, last, self.len)
    }

    /// Mutable references to every value, in key order. Callers must not
    /// change keys.
    pub(crate) fn values_mut(&mut self) -> alloc::vec::IntoIter<&mut V> {
        let mut order = Vec::with_capacity(self.len);
        let mut x = self.arena.leftmost();
        while x != HEADER {
            order.push(x);
            x = successor(&self.arena, x);
        }

        let mut slots = self.arena.value_slots_mut();
        order
            .into_iter()
            .filter_map(|id| slots[id.index()].take())
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Erases the value at `pos`.
    ///
    /// Positions of all other values stay valid.
    ///
    /// # Arguments
    ///
    /// * `pos` - Position of the value to erase
    ///
    /// # Returns
    ///
    /// * `Option<(V, Position)>` - The erased value and the position that followed it,
    ///   or `None` if `pos` is the end position
    pub fn erase(&mut self, pos: Position) -> Option<(V, Position)> {
        self.arena.value(pos.0)?;

        let next = self.increment(pos);
        let removed = erase_rebalance(&mut self.arena, pos.0);
        let value = self.arena.release(removed)?;
        self.len -= 1;

        Some((value, next))
    }

    /// Erases every value in `[first, last)` and returns how many were erased.
    pub fn erase_range(&mut self, mut first: Position, last: Position) -> usize {
        if first == self.begin() && last.is_end() {
            let erased = self.len;
            self.clear();
            return erased;
        }

        let mut erased = 0;
        while first != last {
            match self.erase(first) {
                Some((_, next)) => {
                    first = next;
                    erased += 1;
                }
                None => break,
            }
        }
        erased
    }

    /// Removes and returns the smallest value
    #[inline]
    pub fn pop_first(&mut self) -> Option<V> {
        self.erase(self.begin()).map(|(value, _)| value)
    }

    /// Removes and returns the largest value
    #[inline]
    pub fn pop_last(&mut self) -> Option<V> {
        let last = self.decrement(self.end());
        self.erase(last).map(|(value, _)| value)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        log::trace!("clearing red-black tree of {} nodes", self.len);
        self.arena.reset();
        self.len = 0;
    }

    /// Moves the contents out, leaving an empty tree with the same ordering.
    pub fn take(&mut self) -> Self
    where
        C: Clone,
    {
        let empty = Self::with_comparator(self.key_of, self.compare.clone());
        core::mem::replace(self, empty)
    }

    /// Deep-copies the structure, colors included, into `arena`.
    ///
    /// `arena` must have room for every node and `pending` for the worklist,
    /// so no allocation happens while copying.
    fn copy_from(&self, mut arena: Arena<V>, mut pending: Vec<(NodeId, NodeId, Side)>) -> Arena<V>
    where
        V: Clone,
    {
        let Some(root) = self.arena.root() else {
            return arena;
        };

        pending.push((root, HEADER, Side::Root));
        while let Some((source, parent, side)) = pending.pop() {
            let Some(value) = self.arena.value(source) else {
                continue;
            };

            let id = arena.allocate(value.clone(), parent);
            arena.set_color(id, self.arena.color(source));
            match side {
                Side::Root => arena.set_root(Some(id)),
                Side::Left => arena.set_left(parent, Some(id)),
                Side::Right => arena.set_right(parent, Some(id)),
            }

            if let Some(right) = self.arena.right(source) {
                pending.push((right, id, Side::Right));
            }
            if let Some(left) = self.arena.left(source) {
                pending.push((left, id, Side::Left));
            }
        }

        if let Some(root) = arena.root() {
            let leftmost = minimum(&arena, root);
            let rightmost = maximum(&arena, root);
            arena.set_leftmost(leftmost);
            arena.set_rightmost(rightmost);
        }
        arena
    }

    /// Clones the tree, reporting allocation failure instead of aborting.
    ///
    /// All storage is reserved before the first node is copied; on failure
    /// nothing is left behind.
    ///
    /// # Returns
    ///
    /// * `Result<Self, Error>` - The clone, or `Error::AllocationFailed`
    pub fn try_clone(&self) -> Result<Self, Error>
    where
        V: Clone,
        C: Clone,
    {
        let arena = Arena::try_with_capacity(self.len)?;
        let mut pending = Vec::new();
        pending.try_reserve_exact(CLONE_STACK)?;

        Ok(Self {
            arena: self.copy_from(arena, pending),
            len: self.len,
            key_of: self.key_of,
            compare: self.compare.clone(),
        })
    }
}

impl<V, K, C: Compare<K>> RbTree<V, K, C> {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self.compare.less(a, b)
    }

    /// Key of a real node.
    #[inline]
    fn key(&self, id: NodeId) -> &K {
        match self.arena.value(id) {
            Some(value) => (self.key_of)(value),
            None => unreachable!("header and vacant slots carry no key"),
        }
    }

    /// Leaf slot for `key` to the right of every equal key.
    fn insert_multi_pos(&self, key: &K) -> (NodeId, bool) {
        let mut parent = HEADER;
        let mut add_to_left = true;
        let mut x = self.arena.root();

        while let Some(node) = x {
            parent = node;
            add_to_left = self.less(key, self.key(node));
            x = if add_to_left {
                self.arena.left(node)
            } else {
                self.arena.right(node)
            };
        }
        (parent, add_to_left)
    }

    /// Leaf slot for `key`, or the node already holding an equal key.
    fn insert_unique_pos(&self, key: &K) -> Result<(NodeId, bool), NodeId> {
        let (parent, add_to_left) = self.insert_multi_pos(key);

        let mut before = parent;
        if add_to_left {
            if parent == HEADER || parent == self.arena.leftmost() {
                return Ok((parent, true));
            }
            before = predecessor(&self.arena, parent);
        }

        if self.less(self.key(before), key) {
            Ok((parent, add_to_left))
        } else {
            Err(before)
        }
    }

    /// Free leaf slot between two adjacent nodes, if either has one.
    fn slot_between(&self, before: NodeId, after: NodeId) -> Option<(NodeId, bool)> {
        if self.arena.right(before).is_none() {
            Some((before, false))
        } else if self.arena.left(after).is_none() {
            Some((after, true))
        } else {
            None
        }
    }

    fn insert_node_at(&mut self, parent: NodeId, value: V, add_to_left: bool) -> Position {
        assert!(self.len < self.max_size(), "red-black tree capacity overflow");

        let node = self.arena.allocate(value, parent);
        if parent == HEADER {
            self.arena.set_root(Some(node));
            self.arena.set_leftmost(node);
            self.arena.set_rightmost(node);
        } else if add_to_left {
            self.arena.set_left(parent, Some(node));
            if parent == self.arena.leftmost() {
                self.arena.set_leftmost(node);
            }
        } else {
            self.arena.set_right(parent, Some(node));
            if parent == self.arena.rightmost() {
                self.arena.set_rightmost(node);
            }
        }

        insert_rebalance(&mut self.arena, node);
        self.len += 1;
        Position(node)
    }

    /// Inserts `value`, keeping values with equal keys.
    ///
    /// The new value lands after every value with an equal key.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to insert
    ///
    /// # Returns
    ///
    /// * `Position` - Position of the inserted value
    pub fn insert_multi(&mut self, value: V) -> Position {
        let (parent, add_to_left) = self.insert_multi_pos((self.key_of)(&value));
        self.insert_node_at(parent, value, add_to_left)
    }

    /// Inserts `value` unless a value with an equal key is present.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to insert
    ///
    /// # Returns
    ///
    /// * `(Position, bool)` - Position of the inserted value and `true`, or
    ///   position of the existing value and `false` (the tree is untouched)
    pub fn insert_unique(&mut self, value: V) -> (Position, bool) {
        match self.insert_unique_or_reject(value) {
            Ok(pos) => (pos, true),
            Err((pos, _)) => (pos, false),
        }
    }

    /// Like `insert_unique`, but hands a rejected value back to the caller.
    pub(crate) fn insert_unique_or_reject(&mut self, value: V) -> Result<Position, (Position, V)> {
        match self.insert_unique_pos((self.key_of)(&value)) {
            Ok((parent, add_to_left)) => Ok(self.insert_node_at(parent, value, add_to_left)),
            Err(existing) => Err((Position(existing), value)),
        }
    }

    /// Makes room for `additional` more values without further allocation.
    ///
    /// # Returns
    ///
    /// * `Result<(), Error>` - `CapacityExceeded` past `max_size()`,
    ///   `AllocationFailed` if storage cannot grow
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let requested = self.len.saturating_add(additional);
        if requested > self.max_size() {
            return Err(Error::CapacityExceeded {
                requested,
                max: self.max_size(),
            });
        }
        self.arena.try_reserve(additional)
    }

    /// Fallible [`insert_multi`](Self::insert_multi); the tree is unchanged on error.
    pub fn try_insert_multi(&mut self, value: V) -> Result<Position, Error> {
        self.try_reserve(1)?;
        Ok(self.insert_multi(value))
    }

    /// Fallible [`insert_unique`](Self::insert_unique); the tree is unchanged on error.
    pub fn try_insert_unique(&mut self, value: V) -> Result<(Position, bool), Error> {
        match self.insert_unique_pos((self.key_of)(&value)) {
            Ok((parent, add_to_left)) => {
                self.try_reserve(1)?;
                Ok((self.insert_node_at(parent, value, add_to_left), true))
            }
            Err(existing) => Ok((Position(existing), false)),
        }
    }

    /// Inserts `value` as close as possible before `hint`, keeping equal keys.
    ///
    /// Runs in amortized O(1) when the value belongs right before `hint`;
    /// otherwise behaves like [`insert_multi`](Self::insert_multi).
    pub fn insert_multi_hint(&mut self, hint: Position, value: V) -> Position {
        let hint = if self.get(hint).is_some() { hint } else { self.end() };
        if self.is_empty() {
            return self.insert_node_at(HEADER, value, true);
        }

        let key = (self.key_of)(&value);
        let slot = if hint == self.begin() {
            self.less(key, self.key(hint.0)).then_some((hint.0, true))
        } else if hint.is_end() {
            let last = self.arena.rightmost();
            (!self.less(key, self.key(last))).then_some((last, false))
        } else {
            let before = predecessor(&self.arena, hint.0);
            if !self.less(key, self.key(before)) && self.less(key, self.key(hint.0)) {
                self.slot_between(before, hint.0)
            } else {
                None
            }
        };

        let (parent, add_to_left) = match slot {
            Some(slot) => slot,
            None => self.insert_multi_pos(key),
        };
        self.insert_node_at(parent, value, add_to_left)
    }

    /// Inserts `value` right before `hint` when that keeps keys strictly
    /// ordered, otherwise behaves like [`insert_unique`](Self::insert_unique).
    ///
    /// Inserting already-sorted input with `end()` as hint is amortized O(1)
    /// per value.
    pub fn insert_unique_hint(&mut self, hint: Position, value: V) -> (Position, bool) {
        let hint = if self.get(hint).is_some() { hint } else { self.end() };
        if self.is_empty() {
            return (self.insert_node_at(HEADER, value, true), true);
        }

        let key = (self.key_of)(&value);
        let slot = if hint == self.begin() {
            self.less(key, self.key(hint.0)).then_some((hint.0, true))
        } else if hint.is_end() {
            let last = self.arena.rightmost();
            self.less(self.key(last), key).then_some((last, false))
        } else {
            let before = predecessor(&self.arena, hint.0);
            if self.less(self.key(before), key) && self.less(key, self.key(hint.0)) {
                self.slot_between(before, hint.0)
            } else {
                None
            }
        };

        match slot {
            Some((parent, add_to_left)) => (self.insert_node_at(parent, value, add_to_left), true),
            None => self.insert_unique(value),
        }
    }

    /// Returns the position of the first value whose key is not less than `key`
    pub fn lower_bound(&self, key: &K) -> Position {
        let mut bound = HEADER;
        let mut x = self.arena.root();

        while let Some(node) = x {
            if self.less(self.key(node), key) {
                x = self.arena.right(node);
            } else {
                bound = node;
                x = self.arena.left(node);
            }
        }
        Position(bound)
    }

    /// Returns the position of the first value whose key is greater than `key`
    pub fn upper_bound(&self, key: &K) -> Position {
        let mut bound = HEADER;
        let mut x = self.arena.root();

        while let Some(node) = x {
            if self.less(key, self.key(node)) {
                bound = node;
                x = self.arena.left(node);
            } else {
                x = self.arena.right(node);
            }
        }
        Position(bound)
    }

    /// Finds a value with a key equal to `key`.
    ///
    /// In a multi-key tree this is the first of the equal values.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Returns
    ///
    /// * `Position` - Position of the value, or [`end`](Self::end) if absent
    pub fn find(&self, key: &K) -> Position {
        let pos = self.lower_bound(key);
        if pos.is_end() || self.less(key, self.key(pos.0)) {
            self.end()
        } else {
            pos
        }
    }

    /// Returns `true` if a value with a key equal to `key` is present
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        !self.find(key).is_end()
    }

    /// Returns `[lower_bound, upper_bound)` for `key`
    #[inline]
    pub fn equal_range_multi(&self, key: &K) -> (Position, Position) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Returns the range holding the single value equal to `key`, or an empty
    /// range at the end position.
    pub fn equal_range_unique(&self, key: &K) -> (Position, Position) {
        let pos = self.find(key);
        if pos.is_end() {
            (pos, pos)
        } else {
            (pos, self.increment(pos))
        }
    }

    /// Counts the values whose key is equal to `key`
    pub fn count_multi(&self, key: &K) -> usize {
        let (first, last) = self.equal_range_multi(key);
        self.range(first, last).count()
    }

    /// Returns 1 if a value equal to `key` is present, 0 otherwise
    #[inline]
    pub fn count_unique(&self, key: &K) -> usize {
        usize::from(self.contains(key))
    }

    /// Erases every value with a key equal to `key` and returns how many were erased.
    pub fn erase_multi(&mut self, key: &K) -> usize {
        let (first, last) = self.equal_range_multi(key);
        self.erase_range(first, last)
    }

    /// Erases the value with a key equal to `key`, returning 1 if one was erased.
    pub fn erase_unique(&mut self, key: &K) -> usize {
        let pos = self.find(key);
        usize::from(self.erase(pos).is_some())
    }
}

impl<V: Clone, K, C: Clone> Clone for RbTree<V, K, C> {
    fn clone(&self) -> Self {
        Self {
            arena: self.copy_from(Arena::with_capacity(self.len), Vec::with_capacity(CLONE_STACK)),
            len: self.len,
            key_of: self.key_of,
            compare: self.compare.clone(),
        }
    }
}

impl<V, K, C> IntoIterator for RbTree<V, K, C> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut values = Deque::with_capacity(self.len);
        let mut x = self.arena.leftmost();
        while x != HEADER {
            let next = successor(&self.arena, x);
            if let Some(value) = self.arena.release(x) {
                values.push_back(value);
            }
            x = next;
        }
        IntoIter::new(values)
    }
}

impl<'a, V, K, C> IntoIterator for &'a RbTree<V, K, C> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: PartialEq, K, C> PartialEq for RbTree<V, K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<V: Eq, K, C> Eq for RbTree<V, K, C> {}

impl<V: PartialOrd, K, C> PartialOrd for RbTree<V, K, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<V: Ord, K, C> Ord for RbTree<V, K, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<V: fmt::Debug, K, C> fmt::Debug for RbTree<V, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
impl<V, K, C: Compare<K>> RbTree<V, K, C> {
    /// Checks every red-black and bookkeeping invariant, returning the black
    /// height of the tree.
    pub(crate) fn check_invariants(&self) -> Result<usize, &'static str> {
        use super::node::Color;

        let Some(root) = self.arena.root() else {
            if self.len != 0 {
                return Err("empty tree with non-zero len");
            }
            if self.arena.leftmost() != HEADER || self.arena.rightmost() != HEADER {
                return Err("empty header is not self-referential");
            }
            return Ok(0);
        };

        if self.arena.color(root) != Color::Black {
            return Err("root is red");
        }
        if self.arena.parent(root) != HEADER {
            return Err("root parent is not the header");
        }
        if self.arena.leftmost() != minimum(&self.arena, root) {
            return Err("header left is not the minimum");
        }
        if self.arena.rightmost() != maximum(&self.arena, root) {
            return Err("header right is not the maximum");
        }

        let (black_height, count) = self.verify_subtree(root)?;
        if count != self.len {
            return Err("len does not match reachable nodes");
        }

        let mut prev: Option<&K> = None;
        for value in self.iter() {
            let key = (self.key_of)(value);
            if prev.is_some_and(|prev| self.less(key, prev)) {
                return Err("in-order traversal is not sorted");
            }
            prev = Some(key);
        }

        Ok(black_height)
    }

    /// Returns (black height, node count) of the subtree.
    fn verify_subtree(&self, node: NodeId) -> Result<(usize, usize), &'static str> {
        use super::node::Color;

        let left = self.arena.left(node);
        let right = self.arena.right(node);

        if self.arena.color(node) == Color::Red && (self.arena.is_red(left) || self.arena.is_red(right)) {
            return Err("red node with red child");
        }

        let mut heights = [1, 1];
        let mut count = 1;
        for (i, child) in [left, right].into_iter().enumerate() {
            if let Some(child) = child {
                if self.arena.parent(child) != node {
                    return Err("child does not point back to parent");
                }
                let (height, nodes) = self.verify_subtree(child)?;
                heights[i] = height;
                count += nodes;
            }
        }

        if heights[0] != heights[1] {
            return Err("black height mismatch");
        }

        let own = usize::from(self.arena.color(node) == Color::Black);
        Ok((heights[0] + own, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FloatTotalOrder;
    use crate::tree::node::Color;
    use crate::utils::helper::{identity, pair_key};

    use ahash::RandomState;
    use alloc::vec::Vec;
    use hashbrown::HashMap;
    use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

    fn int_tree() -> RbTree<i32, i32> {
        RbTree::new(identity)
    }

    fn collect(tree: &RbTree<i32, i32>) -> Vec<i32> {
        tree.iter().copied().collect()
    }

    fn root_color<V, K, C>(tree: &RbTree<V, K, C>) -> Option<Color> {
        tree.arena.root().map(|root| tree.arena.color(root))
    }

    #[test]
    fn test_rbtree_creation() {
        let tree = int_tree();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), tree.end());
        assert!(tree.first().is_none());
        assert!(tree.last().is_none());
        assert_eq!(tree.max_size(), u32::MAX as usize - 1);
        assert_eq!(tree.check_invariants(), Ok(0));
    }

    #[test]
    fn test_rbtree_single_element() {
        let mut tree = int_tree();

        let (pos, inserted) = tree.insert_unique(42);
        assert!(inserted);
        assert_eq!(tree.get(pos), Some(&42));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.first(), Some(&42));
        assert_eq!(tree.last(), Some(&42));
        assert_eq!(root_color(&tree), Some(Color::Black));

        assert_eq!(tree.erase_unique(&42), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), tree.end());
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_insert_erase_scenario() {
        let mut tree = int_tree();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            assert!(tree.insert_unique(key).1);
        }

        assert_eq!(collect(&tree), [1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(root_color(&tree), Some(Color::Black));
        assert!(tree.check_invariants().is_ok());

        assert_eq!(tree.erase_unique(&5), 1);
        assert!(tree.check_invariants().is_ok());
        assert_eq!(collect(&tree), [1, 3, 4, 7, 8, 9]);
    }

    #[test]
    fn test_uniqueness_law() {
        let mut tree = int_tree();
        let (first, inserted) = tree.insert_unique(10);
        assert!(inserted);

        let (second, inserted) = tree.insert_unique(10);
        assert!(!inserted);
        assert_eq!(first, second);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_multiplicity_law() {
        let mut tree: RbTree<(i32, usize), i32> = RbTree::new(pair_key);
        for i in 0..5 {
            tree.insert_multi((2, i));
            tree.insert_multi((1, i));
            tree.insert_multi((3, i));
        }

        assert_eq!(tree.count_multi(&2), 5);
        assert_eq!(tree.count_multi(&4), 0);

        let (first, last) = tree.equal_range_multi(&2);
        let equal: Vec<_> = tree.range(first, last).map(|&(_, i)| i).collect();
        assert_eq!(equal, [0, 1, 2, 3, 4]);

        let keys: Vec<_> = tree.iter().map(|&(k, _)| k).collect();
        assert_eq!(keys, [1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3]);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_find_and_bounds() {
        let mut tree = int_tree();
        for key in [10, 20, 30, 40] {
            tree.insert_unique(key);
        }

        assert_eq!(tree.get(tree.find(&30)), Some(&30));
        assert!(tree.find(&25).is_end());
        assert!(tree.find(&50).is_end());
        assert!(tree.contains(&10));
        assert!(!tree.contains(&0));

        assert_eq!(tree.get(tree.lower_bound(&20)), Some(&20));
        assert_eq!(tree.get(tree.lower_bound(&21)), Some(&30));
        assert_eq!(tree.get(tree.upper_bound(&20)), Some(&30));
        assert!(tree.upper_bound(&40).is_end());
        assert_eq!(tree.lower_bound(&0), tree.begin());

        let (first, last) = tree.equal_range_unique(&20);
        assert_eq!(tree.range(first, last).copied().collect::<Vec<_>>(), [20]);
        let (first, last) = tree.equal_range_unique(&25);
        assert_eq!(first, last);
        assert_eq!(tree.count_unique(&40), 1);
        assert_eq!(tree.count_unique(&41), 0);
    }

    #[test]
    fn test_increment_decrement_through_end() {
        let mut tree = int_tree();
        for key in [2, 1, 3] {
            tree.insert_unique(key);
        }

        let mut pos = tree.begin();
        assert_eq!(tree.get(pos), Some(&1));
        pos = tree.increment(pos);
        pos = tree.increment(pos);
        assert_eq!(tree.get(pos), Some(&3));
        pos = tree.increment(pos);
        assert!(pos.is_end());
        assert_eq!(tree.get(pos), None);
        assert!(tree.increment(pos).is_end());

        pos = tree.decrement(pos);
        assert_eq!(tree.get(pos), Some(&3));
        pos = tree.decrement(tree.decrement(pos));
        assert_eq!(pos, tree.begin());
    }

    #[test]
    fn test_position_stability_after_erase() {
        let mut tree = int_tree();
        let positions: Vec<_> = (0..64).map(|k| tree.insert_unique(k).0).collect();

        for k in (0..64).step_by(3) {
            let (value, _) = tree.erase(positions[k]).unwrap();
            assert_eq!(value, k as i32);
        }
        assert!(tree.check_invariants().is_ok());

        for k in (0..64).filter(|k| k % 3 != 0) {
            let pos = positions[k];
            assert_eq!(tree.get(pos), Some(&(k as i32)));

            let next = tree.increment(pos);
            let expected_next = (k + 1..64).find(|n| n % 3 != 0).map(|n| n as i32);
            assert_eq!(tree.get(next).copied(), expected_next);

            let prev = tree.decrement(pos);
            let expected_prev = (0..k).rev().find(|n| n % 3 != 0).map(|n| n as i32);
            assert_eq!(tree.get(prev).copied(), expected_prev);
        }
    }

    #[test]
    fn test_erase_returns_successor() {
        let mut tree = int_tree();
        for key in 1..=7 {
            tree.insert_unique(key);
        }

        let pos = tree.find(&4);
        let (value, next) = tree.erase(pos).unwrap();
        assert_eq!(value, 4);
        assert_eq!(tree.get(next), Some(&5));

        let last = tree.find(&7);
        let (_, next) = tree.erase(last).unwrap();
        assert!(next.is_end());
        assert!(tree.erase(tree.end()).is_none());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_erase_range_and_multi() {
        let mut tree = int_tree();
        for key in [1, 2, 2, 2, 3, 4, 5] {
            tree.insert_multi(key);
        }

        assert_eq!(tree.erase_multi(&2), 3);
        assert_eq!(collect(&tree), [1, 3, 4, 5]);
        assert_eq!(tree.erase_multi(&2), 0);

        let first = tree.find(&3);
        let last = tree.find(&5);
        assert_eq!(tree.erase_range(first, last), 2);
        assert_eq!(collect(&tree), [1, 5]);

        assert_eq!(tree.erase_range(tree.begin(), tree.end()), 2);
        assert!(tree.is_empty());
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_round_trip_random_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut keys: Vec<i32> = (0..500).collect();
        keys.shuffle(&mut rng);

        let mut tree = int_tree();
        for &key in &keys {
            tree.insert_unique(key);
        }
        assert_eq!(tree.len(), 500);

        keys.shuffle(&mut rng);
        for &key in &keys {
            assert_eq!(tree.erase_unique(&key), 1);
        }

        assert_eq!(tree.len(), 0);
        assert_eq!(tree.begin(), tree.end());
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_randomized_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut tree = int_tree();
        let mut model: HashMap<i32, usize, RandomState> = HashMap::with_hasher(RandomState::new());

        for step in 0..2_000 {
            let key = rng.gen_range(0..128);
            match rng.gen_range(0..4) {
                0 | 1 => {
                    tree.insert_multi(key);
                    *model.entry(key).or_insert(0) += 1;
                }
                2 => {
                    let pos = tree.find(&key);
                    let erased = tree.erase(pos).is_some();
                    let expected = model.get(&key).copied().unwrap_or(0) > 0;
                    assert_eq!(erased, expected, "step {step}");
                    if erased {
                        *model.entry(key).or_insert(1) -= 1;
                    }
                }
                _ => {
                    let erased = tree.erase_multi(&key);
                    assert_eq!(erased, model.remove(&key).unwrap_or(0), "step {step}");
                }
            }

            if let Err(violation) = tree.check_invariants() {
                panic!("step {step}: {violation}");
            }
            assert_eq!(tree.len(), model.values().sum::<usize>());
        }

        for (key, &count) in &model {
            assert_eq!(tree.count_multi(key), count);
        }
    }

    #[test]
    fn test_black_height_is_logarithmic() {
        let mut tree = int_tree();
        for key in 0..1023 {
            tree.insert_unique(key);
        }
        let black_height = tree.check_invariants().unwrap();
        assert!(black_height <= 10, "black height {black_height}");
    }

    #[test]
    fn test_rbtree_sequential_insert_remove() {
        let mut tree = int_tree();
        for i in 0..50 {
            tree.insert_unique(i);
        }
        for i in 0..25 {
            assert_eq!(tree.erase_unique(&i), 1);
        }

        assert_eq!(tree.len(), 25);
        assert_eq!(tree.first(), Some(&25));
        assert_eq!(tree.last(), Some(&49));
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_rbtree_reverse_order_insertion() {
        let mut tree = int_tree();
        for i in (1..=7).rev() {
            tree.insert_unique(i);
        }
        assert_eq!(collect(&tree), [1, 2, 3, 4, 5, 6, 7]);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_float_keys_with_total_order() {
        let mut tree: RbTree<f64, f64, FloatTotalOrder> = RbTree::new(identity);
        for value in [1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 2.0, f64::NAN] {
            tree.insert_multi(value);
        }

        assert_eq!(tree.len(), 6);
        assert_eq!(tree.first(), Some(&f64::NEG_INFINITY));
        assert!(tree.last().is_some_and(|v| v.is_nan()));
        assert_eq!(tree.count_multi(&f64::NAN), 2);
        assert_eq!(tree.get(tree.upper_bound(&2.0)), Some(&f64::INFINITY));
    }

    #[test]
    fn test_hint_insertion() {
        let mut tree = int_tree();
        for key in 0..100 {
            let (pos, inserted) = tree.insert_unique_hint(tree.end(), key);
            assert!(inserted);
            assert_eq!(tree.get(pos), Some(&key));
        }
        assert!(tree.check_invariants().is_ok());

        let (pos, inserted) = tree.insert_unique_hint(tree.begin(), 50);
        assert!(!inserted);
        assert_eq!(tree.get(pos), Some(&50));

        let (_, inserted) = tree.insert_unique_hint(tree.begin(), -1);
        assert!(inserted);
        assert_eq!(tree.first(), Some(&-1));

        let hint = tree.find(&10);
        let pos = tree.insert_multi_hint(hint, 9);
        assert_eq!(tree.get(tree.increment(pos)), Some(&10));
        assert_eq!(tree.count_multi(&9), 2);

        let pos = tree.insert_multi_hint(tree.find(&70), 3);
        assert_eq!(tree.get(pos), Some(&3));
        assert!(tree.check_invariants().is_ok());
        assert_eq!(tree.len(), 103);
    }

    #[test]
    fn test_multi_hint_keeps_equal_keys_in_insertion_order() {
        let mut tree: RbTree<(i32, usize), i32> = RbTree::new(pair_key);
        tree.insert_multi((1, 0));
        let first = tree.begin();
        tree.insert_multi_hint(first, (1, 1));
        tree.insert_multi_hint(tree.end(), (1, 2));

        let order: Vec<_> = tree.iter().map(|&(_, i)| i).collect();
        assert_eq!(order, [0, 1, 2]);
    }

    #[test]
    fn test_try_insert_and_reserve() {
        let mut tree = int_tree();
        assert_eq!(tree.try_insert_unique(1), Ok((tree.begin(), true)));
        assert!(tree.try_insert_multi(1).is_ok());
        assert_eq!(tree.len(), 2);

        let err = tree.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            Error::CapacityExceeded {
                requested: usize::MAX,
                max: tree.max_size()
            }
        );
        assert_eq!(tree.len(), 2);
        assert!(tree.try_reserve(16).is_ok());
    }

    #[test]
    fn test_clone_is_structural_and_independent() {
        let mut tree = int_tree();
        for key in 0..200 {
            tree.insert_unique((key * 37) % 200);
        }
        for key in (0..200).step_by(7) {
            tree.erase_unique(&key);
        }

        let mut copy = tree.clone();
        assert_eq!(copy, tree);
        assert_eq!(copy.check_invariants(), tree.check_invariants());
        assert_eq!(root_color(&copy), root_color(&tree));

        copy.insert_unique(1_000);
        copy.erase_unique(&1);
        assert_ne!(copy, tree);
        assert!(tree.contains(&1));
        assert!(!tree.contains(&1_000));

        let again = tree.try_clone().unwrap();
        assert_eq!(again, tree);
        assert!(again.check_invariants().is_ok());
    }

    #[test]
    fn test_take_leaves_empty_tree() {
        let mut tree = int_tree();
        for key in 0..10 {
            tree.insert_unique(key);
        }

        let moved = tree.take();
        assert_eq!(moved.len(), 10);
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), tree.end());
        tree.insert_unique(3);
        assert_eq!(collect(&tree), [3]);
    }

    #[test]
    fn test_into_iter_both_ends() {
        let mut tree = int_tree();
        for key in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert_unique(key);
        }

        let mut iter = tree.into_iter();
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(7));
        assert_eq!(iter.collect::<Vec<_>>(), [2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_iter_double_ended() {
        let mut tree = int_tree();
        for key in 1..=5 {
            tree.insert_unique(key);
        }

        let mut iter = tree.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);

        let reversed: Vec<_> = tree.iter().rev().copied().collect();
        assert_eq!(reversed, [5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_values_mut_in_key_order() {
        let mut tree: RbTree<(i32, i32), i32> = RbTree::new(pair_key);
        for key in [3, 1, 2] {
            tree.insert_unique((key, 0));
        }
        for (rank, pair) in tree.values_mut().enumerate() {
            pair.1 = rank as i32;
        }
        let pairs: Vec<_> = tree.iter().copied().collect();
        assert_eq!(pairs, [(1, 0), (2, 1), (3, 2)]);
    }

    #[test]
    fn test_pop_first_last_and_clear() {
        let mut tree = int_tree();
        for key in [5, 1, 9, 3] {
            tree.insert_unique(key);
        }

        assert_eq!(tree.pop_first(), Some(1));
        assert_eq!(tree.pop_last(), Some(9));
        assert_eq!(collect(&tree), [3, 5]);

        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.pop_first(), None);
        assert_eq!(tree.pop_last(), None);
        assert!(tree.check_invariants().is_ok());

        tree.insert_unique(8);
        assert_eq!(collect(&tree), [8]);
    }

    #[test]
    fn test_lexicographic_comparison() {
        let mut a = int_tree();
        let mut b = int_tree();
        for key in [1, 2, 3] {
            a.insert_unique(key);
        }
        for key in [1, 2, 4] {
            b.insert_unique(key);
        }
        assert!(a < b);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
        assert_eq!(alloc::format!("{a:?}"), "[1, 2, 3]");
    }

    #[test]
    fn test_descending_comparator() {
        let mut tree: RbTree<i32, i32, _> = RbTree::with_comparator(identity, |a: &i32, b: &i32| a > b);
        for key in [2, 9, 4] {
            tree.insert_unique(key);
        }
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [9, 4, 2]);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_deep_equal_key_chain_clears_without_recursion() {
        let mut tree = int_tree();
        for _ in 0..100_000 {
            tree.insert_multi(1);
        }
        assert_eq!(tree.count_multi(&1), 100_000);
        let copy = tree.clone();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(copy.len(), 100_000);
    }
}
