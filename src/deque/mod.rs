//! Double-ended queue stored as a map of fixed-size buffers.

mod iter;
mod position;

use alloc::{boxed::Box, vec::Vec};
use core::{
    cmp::Ordering,
    fmt,
    ops::{Index, IndexMut},
};

use crate::{Error, helper::deque_buf_size};
use iter::Buffer;
pub use iter::{IntoIter, Iter, IterMut};
use position::SegmentPos;

/// Smallest number of map slots allocated for a deque.
pub const DEQUE_MAP_INIT_SIZE: usize = 8;

/// A double-ended queue built from fixed-size buffers.
///
/// Elements live in equally sized heap buffers; a map (a vector of buffer
/// slots) keeps the buffers in order. Growing at either end allocates at
/// most one buffer and occasionally re-centers or reallocates the map,
/// which moves buffer pointers but never elements.
///
/// - Push and pop at both ends: O(1) amortized
/// - Indexed access: O(1)
/// - Insertion and removal in the middle: O(min(i, len - i))
///
/// A freshly created deque allocates nothing until the first element is
/// pushed.
pub struct Deque<T> {
    /// Buffer slots; exactly the slots `head.node..=tail.node` hold a buffer
    map: Vec<Buffer<T>>,

    /// Slot of the first element
    head: SegmentPos,

    /// Slot one past the last element, always inside an allocated buffer
    tail: SegmentPos,

    /// Number of stored elements
    len: usize,

    /// Number of slots per buffer
    buf_size: usize,
}

impl<T> Deque<T> {
    /// Creates an empty deque with the default buffer size for `T`.
    ///
    /// # Returns
    ///
    /// * `Self` - An empty, unallocated deque
    #[inline]
    pub const fn new() -> Self {
        Self::with_buffer_size(deque_buf_size::<T>())
    }

    /// Creates an empty deque whose buffers hold `buf_size` elements.
    ///
    /// # Arguments
    ///
    /// * `buf_size` - Number of elements per buffer
    ///
    /// # Returns
    ///
    /// * `Self` - An empty, unallocated deque
    ///
    /// # Panics
    ///
    /// Panics if `buf_size` is zero.
    #[inline]
    pub const fn with_buffer_size(buf_size: usize) -> Self {
        assert!(buf_size > 0, "buffer size must be > 0");
        Self {
            map: Vec::new(),
            head: SegmentPos::new(0, 0),
            tail: SegmentPos::new(0, 0),
            len: 0,
            buf_size,
        }
    }

    /// Creates an empty deque with map slots for at least `capacity` elements.
    ///
    /// The reservation is best-effort: if it cannot be allocated the deque
    /// starts out empty and unallocated.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of elements to plan room for
    ///
    /// # Returns
    ///
    /// * `Self` - An empty deque
    pub fn with_capacity(capacity: usize) -> Self {
        let mut deque = Self::new();
        if capacity == 0 {
            return deque;
        }

        let result = if capacity > deque.max_size() {
            Err(Error::CapacityExceeded {
                requested: capacity,
                max: deque.max_size(),
            })
        } else {
            deque.try_initialize_map(capacity / deque.buf_size + 1, 1)
        };

        if let Err(err) = result {
            log::warn!("deque with capacity {capacity} degraded to empty: {err}");
            deque = Self::new();
        }
        deque
    }

    /// Creates a deque holding `count` clones of `value`.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds [`max_size`](Self::max_size) or the buffers
    /// cannot be allocated.
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        match Self::try_from_elem(count, value) {
            Ok(deque) => deque,
            Err(err) => panic!("deque construction failed: {err}"),
        }
    }

    /// Fallible [`from_elem`](Self::from_elem).
    ///
    /// # Returns
    ///
    /// * `Result<Self, Error>` - The filled deque, `CapacityExceeded` or `AllocationFailed`
    pub fn try_from_elem(count: usize, value: T) -> Result<Self, Error>
    where
        T: Clone,
    {
        let mut deque = Self::new();
        if count > deque.max_size() {
            return Err(Error::CapacityExceeded {
                requested: count,
                max: deque.max_size(),
            });
        }
        if count == 0 {
            return Ok(deque);
        }

        let nodes = count / deque.buf_size + 1;
        deque.try_initialize_map(nodes, nodes)?;

        let end = deque.head.offset(count as isize, deque.buf_size);
        for node in deque.head.node..=end.node {
            let filled = if node == end.node { end.cur } else { deque.buf_size };
            deque.buffer_mut(node)[..filled].fill(Some(value.clone()));
        }
        deque.tail = end;
        deque.len = count;
        Ok(deque)
    }

    /// Returns the number of elements
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the deque holds no elements
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the largest number of elements a deque of `T` can hold
    #[inline]
    pub const fn max_size(&self) -> usize {
        let slot = core::mem::size_of::<Option<T>>();
        isize::MAX as usize / if slot == 0 { 1 } else { slot }
    }

    /// Returns the number of elements per buffer
    #[inline]
    pub const fn buffer_size(&self) -> usize {
        self.buf_size
    }

    /// Returns the number of buffers currently allocated
    #[inline]
    pub fn buffer_count(&self) -> usize {
        if self.map.is_empty() {
            0
        } else {
            self.tail.node - self.head.node + 1
        }
    }

    /// Allocates one empty buffer.
    fn try_alloc_buffer(&self) -> Result<Box<[Option<T>]>, Error> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(self.buf_size)?;
        slots.resize_with(self.buf_size, || None);
        Ok(slots.into_boxed_slice())
    }

    fn try_alloc_map(size: usize) -> Result<Vec<Buffer<T>>, Error> {
        let mut map = Vec::new();
        map.try_reserve_exact(size)?;
        map.resize_with(size, || None);
        Ok(map)
    }

    /// Builds a map with room for `nodes` centered buffers, allocates the
    /// first `buffers` of them and points both ends at the first slot.
    fn try_initialize_map(&mut self, nodes: usize, buffers: usize) -> Result<(), Error> {
        let size = DEQUE_MAP_INIT_SIZE.max(nodes + 2);
        let mut map = Self::try_alloc_map(size)?;

        let start = (size - nodes) / 2;
        for slot in &mut map[start..start + buffers] {
            *slot = Some(self.try_alloc_buffer()?);
        }

        self.map = map;
        self.head = SegmentPos::new(start, 0);
        self.tail = self.head;
        Ok(())
    }

    /// Makes sure the map has `nodes` free slots after the tail buffer.
    fn try_reserve_map_at_back(&mut self, nodes: usize) -> Result<(), Error> {
        if nodes + 1 > self.map.len() - self.tail.node {
            self.try_reallocate_map(nodes, false)?;
        }
        Ok(())
    }

    /// Makes sure the map has `nodes` free slots before the head buffer.
    fn try_reserve_map_at_front(&mut self, nodes: usize) -> Result<(), Error> {
        if nodes > self.head.node {
            self.try_reallocate_map(nodes, true)?;
        }
        Ok(())
    }

    /// Re-centers the live buffers in the map, growing it if it is not
    /// more than twice the size needed.
    fn try_reallocate_map(&mut self, nodes_to_add: usize, add_at_front: bool) -> Result<(), Error> {
        let old_nodes = self.tail.node - self.head.node + 1;
        let new_nodes = old_nodes + nodes_to_add;
        let front_gap = if add_at_front { nodes_to_add } else { 0 };

        let new_start = if self.map.len() > 2 * new_nodes {
            let new_start = (self.map.len() - new_nodes) / 2 + front_gap;
            if new_start < self.head.node {
                self.map[new_start..=self.tail.node].rotate_left(self.head.node - new_start);
            } else {
                self.map[self.head.node..new_start + old_nodes].rotate_right(new_start - self.head.node);
            }
            log::trace!(
                "deque map recentered: {old_nodes} buffers moved to slot {new_start} of {}",
                self.map.len()
            );
            new_start
        } else {
            let new_size = self.map.len() + self.map.len().max(nodes_to_add) + 2;
            let mut new_map = Self::try_alloc_map(new_size)?;
            let new_start = (new_size - new_nodes) / 2 + front_gap;
            for (slot, buffer) in new_map[new_start..].iter_mut().zip(&mut self.map[self.head.node..=self.tail.node]) {
                *slot = buffer.take();
            }
            log::trace!(
                "deque map reallocated: {} -> {new_size} slots for {old_nodes} buffers",
                self.map.len()
            );
            self.map = new_map;
            new_start
        };

        self.head.node = new_start;
        self.tail.node = new_start + old_nodes - 1;
        Ok(())
    }

    fn check_capacity(&self, additional: usize) -> Result<(), Error> {
        let requested = self.len.saturating_add(additional);
        if requested > self.max_size() {
            return Err(Error::CapacityExceeded {
                requested,
                max: self.max_size(),
            });
        }
        Ok(())
    }

    #[inline]
    fn buffer(&self, node: usize) -> &[Option<T>] {
        match self.map[node].as_deref() {
            Some(buffer) => buffer,
            None => unreachable!("map slot {node} holds no buffer"),
        }
    }

    #[inline]
    fn buffer_mut(&mut self, node: usize) -> &mut [Option<T>] {
        match self.map[node].as_deref_mut() {
            Some(buffer) => buffer,
            None => unreachable!("map slot {node} holds no buffer"),
        }
    }

    #[inline]
    fn slot_mut(&mut self, pos: SegmentPos) -> &mut Option<T> {
        &mut self.buffer_mut(pos.node)[pos.cur]
    }

    /// Position of the element at `index`, which must be in bounds.
    #[inline]
    fn locate(&self, index: usize) -> SegmentPos {
        self.head.offset(index as isize, self.buf_size)
    }

    /// Appends an element to the back.
    ///
    /// # Panics
    ///
    /// Panics if the deque is full or storage cannot be allocated.
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.try_push_back(value) {
            panic!("deque push_back failed: {err}");
        }
    }

    /// Appends an element to the back, reporting failure instead of panicking.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to append
    ///
    /// # Returns
    ///
    /// * `Result<(), Error>` - `CapacityExceeded` or `AllocationFailed`; the deque is unchanged on error
    pub fn try_push_back(&mut self, value: T) -> Result<(), Error> {
        self.check_capacity(1)?;
        if self.map.is_empty() {
            self.try_initialize_map(1, 1)?;
        }

        if self.tail.cur + 1 < self.buf_size {
            *self.slot_mut(self.tail) = Some(value);
            self.tail.cur += 1;
        } else {
            self.try_reserve_map_at_back(1)?;
            let buffer = self.try_alloc_buffer()?;
            self.map[self.tail.node + 1] = Some(buffer);
            *self.slot_mut(self.tail) = Some(value);
            self.tail = SegmentPos::new(self.tail.node + 1, 0);
        }

        self.len += 1;
        debug_assert_eq!(self.tail.distance(self.head, self.buf_size), self.len as isize);
        Ok(())
    }

    /// Prepends an element to the front.
    ///
    /// # Panics
    ///
    /// Panics if the deque is full or storage cannot be allocated.
    pub fn push_front(&mut self, value: T) {
        if let Err(err) = self.try_push_front(value) {
            panic!("deque push_front failed: {err}");
        }
    }

    /// Prepends an element to the front, reporting failure instead of panicking.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to prepend
    ///
    /// # Returns
    ///
    /// * `Result<(), Error>` - `CapacityExceeded` or `AllocationFailed`; the deque is unchanged on error
    pub fn try_push_front(&mut self, value: T) -> Result<(), Error> {
        self.check_capacity(1)?;
        if self.map.is_empty() {
            self.try_initialize_map(1, 1)?;
        }

        if self.head.cur > 0 {
            self.head.cur -= 1;
        } else {
            self.try_reserve_map_at_front(1)?;
            let buffer = self.try_alloc_buffer()?;
            self.map[self.head.node - 1] = Some(buffer);
            self.head = SegmentPos::new(self.head.node - 1, self.buf_size - 1);
        }
        *self.slot_mut(self.head) = Some(value);

        self.len += 1;
        debug_assert_eq!(self.tail.distance(self.head, self.buf_size), self.len as isize);
        Ok(())
    }

    /// Removes and returns the last element.
    ///
    /// Stepping back out of an empty tail buffer releases it.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        if self.tail.cur > 0 {
            self.tail.cur -= 1;
        } else {
            self.map[self.tail.node] = None;
            self.tail = SegmentPos::new(self.tail.node - 1, self.buf_size - 1);
        }
        self.len -= 1;
        self.slot_mut(self.tail).take()
    }

    /// Removes and returns the first element.
    ///
    /// The head buffer is released as soon as it no longer holds elements.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let value = self.slot_mut(self.head).take();
        if self.head.cur + 1 < self.buf_size {
            self.head.cur += 1;
        } else {
            self.map[self.head.node] = None;
            self.head = SegmentPos::new(self.head.node + 1, 0);
        }
        self.len -= 1;
        value
    }

    /// Returns the first element
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the last element
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.get(self.len.checked_sub(1)?)
    }

    /// Returns the first element mutably
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns the last element mutably
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.len.checked_sub(1)?)
    }

    /// Returns a reference to the element at `index` from the front.
    ///
    /// # Arguments
    ///
    /// * `index` - Zero-based position from the front
    ///
    /// # Returns
    ///
    /// * `Option<&T>` - The element, or `None` if `index` is out of bounds
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let pos = self.locate(index);
        self.buffer(pos.node)[pos.cur].as_ref()
    }

    /// Returns a mutable reference to the element at `index` from the front.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let pos = self.locate(index);
        self.slot_mut(pos).as_mut()
    }

    /// Bounds-checked access.
    ///
    /// # Returns
    ///
    /// * `Result<&T, Error>` - The element, or `Error::OutOfRange`
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        let len = self.len;
        self.get(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    ///
    /// # Returns
    ///
    /// * `Result<&mut T, Error>` - The element, or `Error::OutOfRange`
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len;
        self.get_mut(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Swaps the elements at `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, i: usize, j: usize) {
        assert!(i < self.len && j < self.len, "swap index out of bounds: the len is {}", self.len);
        if i == j {
            return;
        }

        let a = self.locate(i);
        let b = self.locate(j);
        if a.node == b.node {
            self.buffer_mut(a.node).swap(a.cur, b.cur);
        } else {
            let first = self.slot_mut(a).take();
            let second = core::mem::replace(self.slot_mut(b), first);
            *self.slot_mut(a) = second;
        }
    }

    /// Inserts `value` so that it ends up at `index`, shifting whichever
    /// side of the deque is shorter.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` or storage cannot be allocated.
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert(index, value) {
            panic!("deque insert failed: {err}");
        }
    }

    /// Fallible [`insert`](Self::insert).
    ///
    /// # Arguments
    ///
    /// * `index` - Final position of the new element, at most `len`
    /// * `value` - The value to insert
    ///
    /// # Returns
    ///
    /// * `Result<(), Error>` - `OutOfRange`, `CapacityExceeded` or `AllocationFailed`;
    ///   the deque is unchanged on error
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), Error> {
        if index > self.len {
            return Err(Error::OutOfRange { index, len: self.len });
        }

        if index < self.len / 2 {
            self.try_push_front(value)?;
            for i in 0..index {
                self.swap(i, i + 1);
            }
        } else {
            self.try_push_back(value)?;
            for i in (index..self.len - 1).rev() {
                self.swap(i, i + 1);
            }
        }
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting whichever side
    /// of the deque is shorter.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The removed element, or `None` if `index` is out of bounds
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }

        if index < self.len / 2 {
            for i in (0..index).rev() {
                self.swap(i, i + 1);
            }
            self.pop_front()
        } else {
            for i in index..self.len - 1 {
                self.swap(i, i + 1);
            }
            self.pop_back()
        }
    }

    /// Shortens the deque to `len` elements, dropping the rest from the back.
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            self.pop_back();
        }
    }

    /// Resizes to `new_len`, appending clones of `value` or dropping from the back.
    ///
    /// # Panics
    ///
    /// Panics if `new_len` exceeds [`max_size`](Self::max_size) or storage cannot be allocated.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if let Err(err) = self.try_resize(new_len, value) {
            panic!("deque resize failed: {err}");
        }
    }

    /// Fallible [`resize`](Self::resize); on error the appended elements are
    /// dropped again and the deque keeps its old contents.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), Error>
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        self.check_capacity(new_len - self.len)?;
        let old_len = self.len;
        while self.len < new_len {
            if let Err(err) = self.try_push_back(value.clone()) {
                self.truncate(old_len);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Drops every element, keeping a single empty buffer.
    pub fn clear(&mut self) {
        if self.map.is_empty() {
            return;
        }

        for slot in &mut self.map[self.head.node + 1..=self.tail.node] {
            *slot = None;
        }
        let head = self.head.node;
        self.buffer_mut(head).fill_with(|| None);

        self.head.cur = 0;
        self.tail = self.head;
        self.len = 0;
    }

    /// Trims the map to the live buffers; an empty deque releases all storage.
    pub fn shrink_to_fit(&mut self) {
        if self.is_empty() {
            self.map = Vec::new();
            self.head = SegmentPos::default();
            self.tail = SegmentPos::default();
            return;
        }

        let nodes = self.buffer_count();
        let size = nodes + 2;
        if self.map.len() <= size {
            return;
        }

        let mut map = Vec::with_capacity(size);
        map.push(None);
        map.extend(self.map[self.head.node..=self.tail.node].iter_mut().map(Option::take));
        map.push(None);

        log::trace!("deque map shrunk: {} -> {size} slots", self.map.len());
        self.map = map;
        self.head.node = 1;
        self.tail.node = nodes;
    }

    /// Slots holding a buffer, in order.
    fn live_buffers(&self) -> &[Buffer<T>] {
        if self.map.is_empty() {
            &[]
        } else {
            &self.map[self.head.node..=self.tail.node]
        }
    }

    /// Returns a front-to-back iterator
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.live_buffers(), self.len)
    }

    /// Returns a front-to-back iterator yielding mutable references
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let len = self.len;
        let live: &mut [Buffer<T>] = if self.map.is_empty() {
            &mut []
        } else {
            &mut self.map[self.head.node..=self.tail.node]
        };
        IterMut::new(live, len)
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Deque<T> {
    fn clone(&self) -> Self {
        let mut deque = Self::with_buffer_size(self.buf_size);
        deque.extend(self.iter().cloned());
        deque
    }
}

impl<T: fmt::Debug> fmt::Debug for Deque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Deque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Deque<T> {}

impl<T: PartialOrd> PartialOrd for Deque<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for Deque<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T> Index<usize> for Deque<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {} but the index is {index}", self.len),
        }
    }
}

impl<T> IndexMut<usize> for Deque<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T> Extend<T> for Deque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::new();
        deque.extend(iter);
        deque
    }
}

impl<T, const N: usize> From<[T; N]> for Deque<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T> IntoIterator for Deque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a Deque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Deque<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::String, vec::Vec};

    fn contents<T: Clone>(deque: &Deque<T>) -> Vec<T> {
        deque.iter().cloned().collect()
    }

    /// Buffers are present exactly for the live map slots.
    fn assert_buffer_layout<T>(deque: &Deque<T>) {
        if deque.map.is_empty() {
            return;
        }
        for (node, slot) in deque.map.iter().enumerate() {
            let live = (deque.head.node..=deque.tail.node).contains(&node);
            assert_eq!(slot.is_some(), live, "map slot {node}");
        }
        assert_eq!(
            deque.tail.distance(deque.head, deque.buf_size),
            deque.len as isize
        );
    }

    #[test]
    fn test_new_allocates_nothing() {
        let deque = Deque::<u64>::new();
        assert!(deque.is_empty());
        assert_eq!(deque.buffer_count(), 0);
        assert_eq!(deque.buffer_size(), 512);
        assert!(deque.map.is_empty());
    }

    #[test]
    #[should_panic(expected = "buffer size must be > 0")]
    fn test_zero_buffer_size_panics() {
        let _ = Deque::<u8>::with_buffer_size(0);
    }

    #[test]
    fn test_push_pop_front_back() {
        let mut deque = Deque::with_buffer_size(3);

        deque.push_back(1);
        deque.push_back(2);
        deque.push_back(3);

        assert_eq!(deque.front(), Some(&1));
        assert_eq!(deque.back(), Some(&3));

        assert_eq!(deque.pop_front(), Some(1));
        assert_eq!(deque.pop_back(), Some(3));
        assert_eq!(deque.pop_front(), Some(2));
        assert!(deque.is_empty());
        assert_eq!(deque.pop_front(), None);
        assert_eq!(deque.pop_back(), None);
        assert_buffer_layout(&deque);
    }

    #[test]
    fn test_pop_front_releases_exactly_one_buffer() {
        let b = 4;
        let mut deque = Deque::with_buffer_size(b);
        for i in 0..2 * b + 1 {
            deque.push_back(i);
        }
        assert_eq!(deque.buffer_count(), 3);
        let head_node = deque.head.node;

        for i in 0..b {
            assert_eq!(deque.pop_front(), Some(i));
        }

        assert_eq!(deque.buffer_count(), 2);
        assert_eq!(deque.head.node, head_node + 1);
        assert_eq!(deque.head.cur, 0);
        assert!(deque.map[head_node].is_none());
        assert_eq!(contents(&deque), (b..2 * b + 1).collect::<Vec<_>>());
        assert_buffer_layout(&deque);
    }

    #[test]
    fn test_pop_back_releases_tail_buffer() {
        let mut deque = Deque::with_buffer_size(2);
        for i in 0..5 {
            deque.push_back(i);
        }
        assert_eq!(deque.buffer_count(), 3);

        assert_eq!(deque.pop_back(), Some(4));
        assert_eq!(deque.buffer_count(), 3);
        assert_eq!(deque.pop_back(), Some(3));
        assert_eq!(deque.buffer_count(), 2);
        assert_eq!(deque.pop_back(), Some(2));
        assert_eq!(deque.buffer_count(), 2);
        assert_buffer_layout(&deque);
    }

    #[test]
    fn test_growth_at_both_ends() {
        let mut deque = Deque::with_buffer_size(2);
        for i in 0..100 {
            deque.push_back(i);
            deque.push_front(-i - 1);
            assert_buffer_layout(&deque);
        }

        assert_eq!(deque.len(), 200);
        assert_eq!(deque.front(), Some(&-100));
        assert_eq!(deque.back(), Some(&99));
        let expected: Vec<i32> = (-100..100).collect();
        assert_eq!(contents(&deque), expected);
        for (i, value) in expected.iter().enumerate() {
            assert_eq!(deque[i], *value);
        }
    }

    #[test]
    fn test_one_sided_growth_recenters_map() {
        let mut deque = Deque::with_buffer_size(1);
        for i in 0..40 {
            deque.push_back(i);
        }
        for _ in 0..38 {
            deque.pop_front();
        }
        let map_len = deque.map.len();
        for i in 40..60 {
            deque.push_back(i);
        }
        assert_eq!(deque.map.len(), map_len);
        assert_eq!(contents(&deque), (38..60).collect::<Vec<_>>());
        assert_buffer_layout(&deque);
    }

    #[test]
    fn test_get_and_at() {
        let mut deque = Deque::from([5, 6, 7]);
        assert_eq!(deque.get(0), Some(&5));
        assert_eq!(deque.get(2), Some(&7));
        assert_eq!(deque.get(3), None);
        assert_eq!(deque.at(1), Ok(&6));
        assert_eq!(deque.at(3), Err(Error::OutOfRange { index: 3, len: 3 }));

        if let Ok(value) = deque.at_mut(0) {
            *value = 50;
        }
        if let Some(value) = deque.back_mut() {
            *value = 70;
        }
        deque[1] = 60;
        assert_eq!(contents(&deque), [50, 60, 70]);
        assert_eq!(deque.at_mut(9), Err(Error::OutOfRange { index: 9, len: 3 }));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_index_out_of_bounds_panics() {
        let deque = Deque::from([1, 2]);
        let _ = deque[2];
    }

    #[test]
    fn test_insert_and_remove_in_the_middle() {
        let mut deque = Deque::with_buffer_size(3);
        deque.extend(0..10);

        deque.insert(2, 100);
        deque.insert(8, 200);
        deque.insert(0, 300);
        let len = deque.len();
        deque.insert(len, 400);
        assert_eq!(contents(&deque), [300, 0, 1, 100, 2, 3, 4, 5, 6, 200, 7, 8, 9, 400]);
        assert_buffer_layout(&deque);

        assert_eq!(deque.remove(3), Some(100));
        assert_eq!(deque.remove(8), Some(200));
        assert_eq!(deque.remove(0), Some(300));
        assert_eq!(deque.remove(10), Some(400));
        assert_eq!(deque.remove(10), None);
        assert_eq!(contents(&deque), (0..10).collect::<Vec<_>>());
        assert_buffer_layout(&deque);

        assert_eq!(
            deque.try_insert(11, 0),
            Err(Error::OutOfRange { index: 11, len: 10 })
        );
    }

    #[test]
    fn test_from_elem_and_resize() {
        let mut deque = Deque::from_elem(9, String::from("x"));
        assert_eq!(deque.len(), 9);
        assert!(deque.iter().all(|s| s == "x"));

        deque.resize(3, String::new());
        assert_eq!(deque.len(), 3);
        deque.resize(5, String::from("y"));
        assert_eq!(contents(&deque), ["x", "x", "x", "y", "y"]);
        assert_buffer_layout(&deque);

        let empty = Deque::from_elem(0, 1u8);
        assert!(empty.is_empty());
        assert_eq!(empty.buffer_count(), 0);
    }

    #[test]
    fn test_from_elem_fills_whole_buffers() {
        let deque = Deque::<u64>::try_from_elem(1024, 7).unwrap();
        assert_eq!(deque.buffer_count(), 3);
        assert_eq!(deque.back(), Some(&7));
        assert_buffer_layout(&deque);
    }

    #[test]
    fn test_capacity_errors() {
        let deque = Deque::<u32>::new();
        let max = deque.max_size();
        assert_eq!(
            Deque::try_from_elem(usize::MAX, 0u32).unwrap_err(),
            Error::CapacityExceeded {
                requested: usize::MAX,
                max
            }
        );

        let mut deque = Deque::from([1u32, 2]);
        assert!(deque.try_resize(usize::MAX, 0).is_err());
        assert_eq!(contents(&deque), [1, 2]);
    }

    #[test]
    fn test_with_capacity_degrades_to_empty() {
        let _ = env_logger::builder().is_test(true).try_init();

        let deque = Deque::<u64>::with_capacity(usize::MAX);
        assert!(deque.is_empty());
        assert_eq!(deque.buffer_count(), 0);

        let mut deque = Deque::<u64>::with_capacity(5_000);
        let map_len = deque.map.len();
        assert_eq!(deque.buffer_count(), 1);
        deque.extend(0..5_000);
        assert_eq!(deque.map.len(), map_len);
        assert_eq!(deque.len(), 5_000);
    }

    #[test]
    fn test_clear_and_shrink_to_fit() {
        let mut deque = Deque::with_buffer_size(4);
        deque.extend(0..20);
        deque.clear();
        assert!(deque.is_empty());
        assert_eq!(deque.buffer_count(), 1);
        assert_buffer_layout(&deque);

        deque.push_front(1);
        deque.push_back(2);
        assert_eq!(contents(&deque), [1, 2]);

        deque.extend(3..100);
        for _ in 0..90 {
            deque.pop_front();
        }
        deque.shrink_to_fit();
        assert_eq!(deque.map.len(), deque.buffer_count() + 2);
        assert_eq!(contents(&deque), (91..100).collect::<Vec<_>>());
        assert_buffer_layout(&deque);

        deque.clear();
        deque.shrink_to_fit();
        assert!(deque.map.is_empty());
        deque.push_back(5);
        assert_eq!(contents(&deque), [5]);
    }

    #[test]
    fn test_swap() {
        let mut deque = Deque::with_buffer_size(2);
        deque.extend(0..5);
        deque.swap(0, 4);
        deque.swap(1, 2);
        deque.swap(3, 3);
        assert_eq!(contents(&deque), [4, 2, 1, 3, 0]);
    }

    #[test]
    fn test_clone_and_compare() {
        let mut a = Deque::with_buffer_size(3);
        a.extend([1, 2, 3, 4]);
        let mut b = a.clone();
        assert_eq!(a, b);
        assert_eq!(b.buffer_size(), 3);

        b.push_back(0);
        assert!(a < b);
        b.pop_back();
        b[3] = 5;
        assert!(a < b);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
        assert_eq!(alloc::format!("{a:?}"), "[1, 2, 3, 4]");
    }

    #[test]
    fn test_zero_sized_elements() {
        let mut deque = Deque::new();
        assert_eq!(deque.buffer_size(), 4096);
        for _ in 0..10_000 {
            deque.push_back(());
        }
        assert_eq!(deque.len(), 10_000);
        assert_eq!(deque.iter().count(), 10_000);
        while deque.pop_front().is_some() {}
        assert!(deque.is_empty());
    }

    #[test]
    fn test_large_elements_use_small_buffers() {
        let mut deque = Deque::new();
        assert_eq!(deque.buffer_size(), 16);
        for i in 0..40u8 {
            deque.push_back([i; 300]);
        }
        assert_eq!(deque.buffer_count(), 3);
        assert_eq!(deque[39][0], 39);
    }

    #[test]
    fn test_mixed_operations_match_vec_model() {
        use rand::{Rng, SeedableRng, rngs::StdRng};

        let mut rng = StdRng::seed_from_u64(11);
        let mut deque = Deque::with_buffer_size(5);
        let mut model: Vec<u32> = Vec::new();

        for step in 0..3_000 {
            let value: u32 = rng.r#gen();
            match rng.gen_range(0..6) {
                0 => {
                    deque.push_back(value);
                    model.push(value);
                }
                1 => {
                    deque.push_front(value);
                    model.insert(0, value);
                }
                2 => assert_eq!(deque.pop_back(), model.pop(), "step {step}"),
                3 => {
                    let expected = if model.is_empty() { None } else { Some(model.remove(0)) };
                    assert_eq!(deque.pop_front(), expected, "step {step}");
                }
                4 => {
                    let index = rng.gen_range(0..=model.len());
                    deque.insert(index, value);
                    model.insert(index, value);
                }
                _ => {
                    if !model.is_empty() {
                        let index = rng.gen_range(0..model.len());
                        assert_eq!(deque.remove(index), Some(model.remove(index)), "step {step}");
                    }
                }
            }
            assert_eq!(deque.len(), model.len());
            assert_buffer_layout(&deque);
        }
        assert_eq!(contents(&deque), model);
    }
}
