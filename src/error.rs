use alloc::collections::TryReserveError;
use core::fmt;

/// Errors reported by the fallible (`try_*` and bounds-checked) container operations.
///
/// A container that returns one of these is left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested element count would exceed the container's `max_size()`
    CapacityExceeded {
        /// Number of elements the operation needed to hold
        requested: usize,
        /// Largest number of elements the container can hold
        max: usize,
    },
    /// A bounds-checked access was made past the current length
    OutOfRange {
        /// The offending index
        index: usize,
        /// Length of the container at the time of access
        len: usize,
    },
    /// The allocator could not provide memory for nodes, buffers or the buffer map
    AllocationFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { requested, max } => {
                write!(f, "requested {requested} elements, at most {max} supported")
            }
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::AllocationFailed => f.write_str("memory allocation failed"),
        }
    }
}

impl core::error::Error for Error {}

impl From<TryReserveError> for Error {
    #[inline]
    fn from(_: TryReserveError) -> Self {
        Self::AllocationFailed
    }
}
