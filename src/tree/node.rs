use alloc::vec::Vec;

use crate::Error;

/// Red-Black tree node colors used to maintain tree balance properties.
///
/// Red-Black trees maintain balance by ensuring:
/// - Red nodes have black children
/// - All paths from a node to its descendant leaves have equal black node counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    /// Red node - cannot be adjacent to other red nodes
    Red,
    /// Black node - can have children of any color, contributes to black height
    Black,
}

/// Handle of a node slot in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(u32);

/// The header sentinel always lives in the first arena slot.
pub(crate) const HEADER: NodeId = NodeId(0);

/// Upper bound on arena slots, header included.
pub(crate) const MAX_SLOTS: usize = u32::MAX as usize;

impl NodeId {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a slot in the arena currently holds.
#[derive(Debug, Clone)]
pub(crate) enum Payload<V> {
    /// The header sentinel: `end()` and cache of root, minimum and maximum
    Header,
    /// A data-bearing node
    Value(V),
    /// A released slot, linking to the next released slot
    Vacant(Option<NodeId>),
}

/// A node of the tree together with its structural links.
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    /// Parent node. The real root's parent is the header; the header's
    /// parent is the real root (or the header itself when the tree is empty).
    pub(crate) parent: NodeId,

    /// Left child. For the header: the minimum node.
    pub(crate) left: Option<NodeId>,

    /// Right child. For the header: the maximum node.
    pub(crate) right: Option<NodeId>,

    pub(crate) color: Color,

    pub(crate) payload: Payload<V>,
}

impl<V> Node<V> {
    const fn header() -> Self {
        Self {
            parent: HEADER,
            left: Some(HEADER),
            right: Some(HEADER),
            color: Color::Red,
            payload: Payload::Header,
        }
    }
}

/// Slot storage for tree nodes.
///
/// Slot 0 is the header. Released slots are chained into an intrusive free
/// list so that releasing a node never allocates.
#[derive(Debug, Clone)]
pub(crate) struct Arena<V> {
    nodes: Vec<Node<V>>,

    /// Head of the released slot chain
    free: Option<NodeId>,

    /// Number of slots on the free chain
    vacant: usize,
}

impl<V> Arena<V> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(nodes: usize) -> Self {
        let mut slots = Vec::with_capacity(nodes + 1);
        slots.push(Node::header());
        Self {
            nodes: slots,
            free: None,
            vacant: 0,
        }
    }

    pub(crate) fn try_with_capacity(nodes: usize) -> Result<Self, Error> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(nodes.saturating_add(1))?;
        slots.push(Node::header());
        Ok(Self {
            nodes: slots,
            free: None,
            vacant: 0,
        })
    }

    /// Makes sure `additional` nodes can be allocated without growing storage.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let missing = additional.saturating_sub(self.vacant);
        self.nodes.try_reserve(missing)?;
        Ok(())
    }

    /// Drops every node and returns to the empty state.
    pub(crate) fn reset(&mut self) {
        self.nodes.truncate(1);
        self.nodes[HEADER.index()] = Node::header();
        self.free = None;
        self.vacant = 0;
    }

    /// Stores `value` in a fresh red leaf under `parent`.
    pub(crate) fn allocate(&mut self, value: V, parent: NodeId) -> NodeId {
        let node = Node {
            parent,
            left: None,
            right: None,
            color: Color::Red,
            payload: Payload::Value(value),
        };

        match self.free {
            Some(id) => {
                self.free = match self.nodes[id.index()].payload {
                    Payload::Vacant(next) => next,
                    _ => None,
                };
                self.vacant -= 1;
                self.nodes[id.index()] = node;
                id
            }
            None => {
                debug_assert!(self.nodes.len() < MAX_SLOTS);
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        }
    }

    /// Releases the slot of a node and hands back its value.
    ///
    /// Links are left untouched so an in-order walk can still step past it.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<V> {
        debug_assert!(id != HEADER);
        let slot = &mut self.nodes[id.index()];
        match core::mem::replace(&mut slot.payload, Payload::Vacant(self.free)) {
            Payload::Value(value) => {
                self.free = Some(id);
                self.vacant += 1;
                Some(value)
            }
            other => {
                slot.payload = other;
                None
            }
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).parent
    }

    #[inline]
    pub(crate) fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    #[inline]
    pub(crate) fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(id).parent = parent;
    }

    #[inline]
    pub(crate) fn set_left(&mut self, id: NodeId, left: Option<NodeId>) {
        self.node_mut(id).left = left;
    }

    #[inline]
    pub(crate) fn set_right(&mut self, id: NodeId, right: Option<NodeId>) {
        self.node_mut(id).right = right;
    }

    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        self.node(id).color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    /// Absent children count as black.
    #[inline]
    pub(crate) fn is_red(&self, link: Option<NodeId>) -> bool {
        link.is_some_and(|id| self.color(id) == Color::Red)
    }

    #[inline]
    pub(crate) fn paint_black(&mut self, link: Option<NodeId>) {
        if let Some(id) = link {
            self.set_color(id, Color::Black);
        }
    }

    #[inline]
    pub(crate) fn is_header(&self, id: NodeId) -> bool {
        matches!(self.node(id).payload, Payload::Header)
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> Option<&V> {
        match &self.nodes.get(id.index())?.payload {
            Payload::Value(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        match &mut self.nodes.get_mut(id.index())?.payload {
            Payload::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Mutable access to every stored value, indexed by slot.
    pub(crate) fn value_slots_mut(&mut self) -> Vec<Option<&mut V>> {
        self.nodes
            .iter_mut()
            .map(|node| match &mut node.payload {
                Payload::Value(value) => Some(value),
                _ => None,
            })
            .collect()
    }

    #[inline]
    pub(crate) fn root(&self) -> Option<NodeId> {
        let root = self.parent(HEADER);
        (root != HEADER).then_some(root)
    }

    #[inline]
    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        self.set_parent(HEADER, root.unwrap_or(HEADER));
    }

    #[inline]
    pub(crate) fn leftmost(&self) -> NodeId {
        self.left(HEADER).unwrap_or(HEADER)
    }

    #[inline]
    pub(crate) fn rightmost(&self) -> NodeId {
        self.right(HEADER).unwrap_or(HEADER)
    }

    #[inline]
    pub(crate) fn set_leftmost(&mut self, id: NodeId) {
        self.set_left(HEADER, Some(id));
    }

    #[inline]
    pub(crate) fn set_rightmost(&mut self, id: NodeId) {
        self.set_right(HEADER, Some(id));
    }
}
