use core::iter::FusedIterator;

use super::algorithms::{predecessor, successor};
use super::node::{Arena, HEADER, NodeId};
use crate::Deque;

/// A stable position inside an [`RbTree`](super::RbTree).
///
/// A position is a plain handle: it does not borrow the tree, and it stays
/// valid until the node it names is erased. Erasing other nodes, inserting,
/// and rebalancing never move a value to a different position. The
/// end position is the header sentinel and is never dereferenced.
///
/// Using a position after its node was erased, or with a different tree, is
/// a logic error: lookups return `None` or an unrelated value, and stepping
/// from a slot the tree never allocated panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(pub(crate) NodeId);

impl Position {
    pub(crate) const END: Self = Self(HEADER);

    /// Returns `true` if this is the end (past-the-last) position
    ///
    /// # Returns
    ///
    /// * `bool` - True if the position is the header sentinel
    #[inline]
    pub const fn is_end(self) -> bool {
        self.0.index() == HEADER.index()
    }
}

/// Moves one step forward in key order. Stepping past the maximum yields the
/// end position; stepping from the end stays there.
#[inline]
pub(crate) fn increment<V>(arena: &Arena<V>, pos: Position) -> Position {
    Position(successor(arena, pos.0))
}

/// Moves one step backward in key order. Stepping back from the end yields
/// the maximum; stepping back from the minimum yields the end position.
#[inline]
pub(crate) fn decrement<V>(arena: &Arena<V>, pos: Position) -> Position {
    Position(predecessor(arena, pos.0))
}

/// Borrowing in-order iterator over the values in `[front, back)`.
#[derive(Debug)]
pub struct Iter<'a, V> {
    arena: &'a Arena<V>,
    front: NodeId,
    back: NodeId,
    /// Upper bound on the number of values left
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(arena: &'a Arena<V>, front: Position, back: Position, remaining: usize) -> Self {
        Self {
            arena,
            front: front.0,
            back: back.0,
            remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back || self.remaining == 0 {
            return None;
        }
        let value = self.arena.value(self.front)?;
        self.front = successor(self.arena, self.front);
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.front == self.back {
            (0, Some(0))
        } else {
            (1.min(self.remaining), Some(self.remaining))
        }
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back || self.remaining == 0 {
            return None;
        }
        self.back = predecessor(self.arena, self.back);
        self.remaining -= 1;
        self.arena.value(self.back)
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

/// Owning in-order iterator.
///
/// Values are moved out of the tree in key order up front, so iteration from
/// either end is O(1) per step.
#[derive(Debug)]
pub struct IntoIter<V> {
    pub(crate) inner: crate::deque::IntoIter<V>,
}

impl<V> IntoIter<V> {
    pub(crate) fn new(values: Deque<V>) -> Self {
        Self {
            inner: values.into_iter(),
        }
    }
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    #[inline]
    fn next(&mut self) -> Option<V> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for IntoIter<V> {
    #[inline]
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}
