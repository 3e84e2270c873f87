use core::fmt;

use crate::{Deque, Error};

/// A first-in-first-out queue backed by a [`Deque`].
///
/// Elements enter at the back and leave from the front.
pub struct Queue<T> {
    items: Deque<T>,
}

impl<T> Queue<T> {
    /// Creates an empty queue
    #[inline]
    pub const fn new() -> Self {
        Self { items: Deque::new() }
    }

    /// Number of queued elements
    #[inline]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the queue holds no elements
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends `value` at the back of the queue
    #[inline]
    pub fn push(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// Fallible [`push`](Self::push); the queue is unchanged on error.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), Error> {
        self.items.try_push_back(value)
    }

    /// Removes and returns the oldest element
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The element at the front, if any
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Returns the oldest element
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    /// Returns the newest element
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for Queue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for Queue<T> {}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue").field("items", &self.items).finish()
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
