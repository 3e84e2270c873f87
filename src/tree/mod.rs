//! Red-black tree engine shared by the ordered set and map adapters.

mod algorithms;
mod cursor;
mod node;
mod rb_tree;

pub use cursor::{IntoIter, Iter, Position};
pub use rb_tree::RbTree;
