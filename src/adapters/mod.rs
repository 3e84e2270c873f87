//! Last-in-first-out and first-in-first-out adapters over [`Deque`](crate::Deque).

mod queue;
mod stack;

pub use queue::Queue;
pub use stack::Stack;
