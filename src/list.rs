use std::{
    collections::TryReserveError,
    ops::{Index, IndexMut},
};

use crate::node::Node;

/// The array that holds all the underlying node data. It works
/// by holding a freelist for filling tombstone slots, and by maintaining
/// a simple vector.
///
/// The slots always hold the fake root at [NodeIndex::FAKE_ROOT] and the
/// real root at [NodeIndex::ROOT], linked under the edge byte `0x00`. Great
/// care is put into never vacating either of them.
#[derive(Debug, Clone)]
pub(crate) struct Slots<V> {
    /// A list of optional slots containing nodes. These may be
    /// [Option::None] in the case of a tombstone, i.e., a node
    /// that once was but has since been deleted.
    slots: Vec<Option<Node<V>>>,
    /// A freelist of all the available space within the array.
    free_list: Vec<usize>,
}

/// Represents the index of a node within the [Slots]. Handles are only
/// valid for as long as the node they name is alive; vacated slots are
/// recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(u32);

impl NodeIndex {
    /// The synthetic root. It has exactly one child, the real root.
    pub const FAKE_ROOT: NodeIndex = NodeIndex(0);
    /// The real root, the node that holds the empty key.
    pub const ROOT: NodeIndex = NodeIndex(1);

    pub(crate) fn from_position(position: usize) -> Self {
        // Every node needs a distinct handle and a trie cannot hold more
        // nodes than there are addressable slots.
        assert!(position <= u32::MAX as usize, "node arena overflow");
        Self(position as u32)
    }

    /// Gets the internal position of the node as a [usize].
    pub fn position(&self) -> usize {
        self.0 as usize
    }
}

impl<V> Slots<V> {
    /// Creates new [Slots] able to hold `cap` nodes besides the two roots
    /// without reallocating.
    pub fn with_capacity(cap: usize) -> Self {
        let mut new = Self {
            slots: Vec::with_capacity(cap.saturating_add(2)),
            free_list: vec![],
        };
        new.plant_roots();
        new
    }

    /// Installs the fake root and the real root into an empty slot vector.
    fn plant_roots(&mut self) {
        debug_assert!(self.slots.is_empty());
        let mut fake_root = Node::with_label(Vec::new(), 1);
        fake_root.insert_child(0x00, NodeIndex::ROOT);
        self.slots.push(Some(fake_root));
        self.slots.push(Some(Node::with_label(Vec::new(), 0)));
    }

    /// Number of live nodes, the fake root included.
    pub fn live(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Makes sure `additional` nodes can be inserted without the arena
    /// allocating.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let recycled = self.free_list.len().min(additional);
        self.slots.try_reserve(additional - recycled)
    }

    /// Inserts a [Node] into the underlying [Vec], returning
    /// the new [NodeIndex].
    pub fn insert(&mut self, item: Node<V>) -> NodeIndex {
        if let Some(avail) = self.free_list.pop() {
            self.slots[avail] = Some(item);
            NodeIndex::from_position(avail)
        } else {
            self.slots.push(Some(item));
            NodeIndex::from_position(self.slots.len() - 1)
        }
    }

    /// Removes a node from the underlying [Vec], leaving a tombstone that
    /// later insertions recycle. The roots can not be removed.
    pub fn remove(&mut self, index: NodeIndex) -> Option<Node<V>> {
        debug_assert!(index != NodeIndex::FAKE_ROOT && index != NodeIndex::ROOT);
        let pos = self.slots.get_mut(index.position())?;
        let node = pos.take()?;
        self.free_list.push(index.position());
        Some(node)
    }

    /// Clears the underlying vector, reinserting both roots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.plant_roots();
    }

    /// This will remove any empty slots from the end of the memory and will
    /// then reduce the internal vectors to the minimum possible capacity.
    pub fn shrink_to_fit(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        let len = self.slots.len();
        self.free_list.retain(|position| *position < len);
        self.slots.shrink_to_fit();
        self.free_list.shrink_to_fit();
        for node in self.slots.iter_mut().flatten() {
            node.shrink_to_fit();
        }
    }
}

impl<V> Index<NodeIndex> for Slots<V> {
    type Output = Node<V>;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        self.slots[index.position()]
            .as_ref()
            .expect("Could not find node at requested index.")
    }
}

impl<V> IndexMut<NodeIndex> for Slots<V> {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        self.slots[index.position()]
            .as_mut()
            .expect("Could not find node at requested index.")
    }
}
