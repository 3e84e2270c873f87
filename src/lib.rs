#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::len_without_is_empty)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod utils;
pub use utils::helper;

mod error;
pub use error::Error;

mod compare;
pub use compare::{Compare, Descending, FloatTotalOrder, Natural};

pub mod tree;
pub use tree::{Position, RbTree};

pub mod deque;
pub use deque::Deque;

mod adapters;
pub use adapters::{Queue, Stack};

pub mod set;
pub use set::{OrderedMultiSet, OrderedSet};

pub mod map;
pub use map::{OrderedMap, OrderedMultiMap};
