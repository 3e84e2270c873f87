/// Location of an element slot inside the deque's map of buffers.
///
/// `node` indexes the map, `cur` indexes the buffer stored there. A
/// position is meaningful only together with the buffer size of the deque
/// that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SegmentPos {
    /// Map slot of the buffer
    pub(crate) node: usize,

    /// Slot within the buffer, always below the buffer size
    pub(crate) cur: usize,
}

impl SegmentPos {
    pub(crate) const fn new(node: usize, cur: usize) -> Self {
        Self { node, cur }
    }

    /// Moves the position by `n` slots, crossing buffer boundaries.
    ///
    /// Offsets that leave the current buffer skip whole buffers; negative
    /// offsets round toward negative infinity so that `cur` stays in
    /// `0..buf_size`.
    ///
    /// # Arguments
    ///
    /// * `n` - Signed number of slots to move
    /// * `buf_size` - Number of slots per buffer
    ///
    /// # Returns
    ///
    /// * `Self` - The shifted position
    pub(crate) fn offset(self, n: isize, buf_size: usize) -> Self {
        let size = buf_size as isize;
        let offset = n + self.cur as isize;

        if (0..size).contains(&offset) {
            return Self::new(self.node, offset as usize);
        }

        let node_offset = if offset > 0 {
            offset / size
        } else {
            -((-offset - 1) / size) - 1
        };

        Self::new(
            (self.node as isize + node_offset) as usize,
            (offset - node_offset * size) as usize,
        )
    }

    /// Signed number of slots from `other` to `self`.
    pub(crate) fn distance(self, other: Self, buf_size: usize) -> isize {
        (self.node as isize - other.node as isize) * buf_size as isize + self.cur as isize
            - other.cur as isize
    }
}
