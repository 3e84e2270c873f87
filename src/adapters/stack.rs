use core::fmt;

use crate::{Deque, Error};

/// A last-in-first-out stack backed by a [`Deque`].
///
/// Only the back of the deque is touched, so pushes never move existing
/// elements and memory is returned a buffer at a time as the stack shrinks.
pub struct Stack<T> {
    items: Deque<T>,
}

impl<T> Stack<T> {
    /// Creates an empty stack
    #[inline]
    pub const fn new() -> Self {
        Self { items: Deque::new() }
    }

    /// Number of elements on the stack
    #[inline]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the stack holds no elements
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes `value` on top of the stack.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to push
    #[inline]
    pub fn push(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// Fallible [`push`](Self::push); the stack is unchanged on error.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), Error> {
        self.items.try_push_back(value)
    }

    /// Removes and returns the top element
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The most recently pushed element, if any
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_back()
    }

    /// Returns the top element without removing it
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.back()
    }

    /// Returns the top element mutably
    #[inline]
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.items.back_mut()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for Stack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for Stack<T> {}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack").field("items", &self.items).finish()
    }
}

impl<T> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
