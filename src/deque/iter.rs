use alloc::boxed::Box;
use core::{
    fmt,
    iter::{FilterMap, FlatMap, FusedIterator},
    slice,
};

use super::Deque;

/// A map slot: a buffer while the slot is live, `None` otherwise.
pub(crate) type Buffer<T> = Option<Box<[Option<T>]>>;

type Slots<'a, T> =
    FlatMap<slice::Iter<'a, Buffer<T>>, slice::Iter<'a, Option<T>>, fn(&'a Buffer<T>) -> slice::Iter<'a, Option<T>>>;

type SlotsMut<'a, T> = FlatMap<
    slice::IterMut<'a, Buffer<T>>,
    slice::IterMut<'a, Option<T>>,
    fn(&'a mut Buffer<T>) -> slice::IterMut<'a, Option<T>>,
>;

type Occupied<'a, T> = FilterMap<Slots<'a, T>, fn(&'a Option<T>) -> Option<&'a T>>;

type OccupiedMut<'a, T> = FilterMap<SlotsMut<'a, T>, fn(&'a mut Option<T>) -> Option<&'a mut T>>;

fn buffer_slots<T>(buffer: &Buffer<T>) -> slice::Iter<'_, Option<T>> {
    buffer.as_deref().unwrap_or_default().iter()
}

fn buffer_slots_mut<T>(buffer: &mut Buffer<T>) -> slice::IterMut<'_, Option<T>> {
    buffer.as_deref_mut().unwrap_or_default().iter_mut()
}

/// Borrowing iterator over the elements of a [`Deque`], front to back.
///
/// Only the slots between the first and last element are occupied, so
/// walking the live buffers and skipping empty slots visits exactly the
/// stored elements in order.
pub struct Iter<'a, T> {
    slots: Occupied<'a, T>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(live: &'a [Buffer<T>], len: usize) -> Self {
        let to_slots: fn(&'a Buffer<T>) -> slice::Iter<'a, Option<T>> = buffer_slots;
        let occupied: fn(&'a Option<T>) -> Option<&'a T> = Option::as_ref;
        Self {
            slots: live.iter().flat_map(to_slots).filter_map(occupied),
            remaining: len,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.next()?;
        self.remaining -= 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.slots.next_back()?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable iterator over the elements of a [`Deque`], front to back.
pub struct IterMut<'a, T> {
    slots: OccupiedMut<'a, T>,
    remaining: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(live: &'a mut [Buffer<T>], len: usize) -> Self {
        let to_slots: fn(&'a mut Buffer<T>) -> slice::IterMut<'a, Option<T>> = buffer_slots_mut;
        let occupied: fn(&'a mut Option<T>) -> Option<&'a mut T> = Option::as_mut;
        Self {
            slots: live.iter_mut().flat_map(to_slots).filter_map(occupied),
            remaining: len,
        }
    }
}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.next()?;
        self.remaining -= 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.slots.next_back()?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator over the elements of a [`Deque`].
///
/// Buffers are released as soon as the iterator moves past them.
#[derive(Debug, Clone)]
pub struct IntoIter<T> {
    deque: Deque<T>,
}

impl<T> IntoIter<T> {
    pub(crate) const fn new(deque: Deque<T>) -> Self {
        Self { deque }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.deque.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.len(), Some(self.deque.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
