use std::collections::TryReserveError;

use bitflags::bitflags;

use crate::list::NodeIndex;

/// The largest number of children a single node can hold. Every child
/// is selected by a distinct edge byte, so this is the size of the byte
/// alphabet.
pub(crate) const MAX_CHILDREN: usize = 256;

bitflags! {
    /// Per-node flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct NodeFlags: u8 {
        /// A key ends exactly at this node.
        const WORD = 1 << 0;
        /// The node also matches any key it is the deepest matching word for.
        const WILD = 1 << 1;
    }
}

/// A node of the compressed trie.
///
/// The label is the byte sequence consumed after the edge byte that leads
/// into this node. The children are kept as two parallel arrays: the edge
/// bytes, sorted ascending and pairwise distinct, and the arena handles of
/// the children those bytes select.
///
/// A node carries a value if and only if it is flagged [NodeFlags::WORD].
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    /// The label on the incoming edge, after the edge byte.
    label: Vec<u8>,
    flags: NodeFlags,
    /// First bytes of the children, sorted.
    edges: Vec<u8>,
    /// Handles of the children, parallel to `edges`.
    children: Vec<NodeIndex>,
    /// The value of the node. This is only populated if this node terminates
    /// a key.
    value: Option<V>,
}

impl<V> Node<V> {
    /// Allocates an empty node that can hold `capacity` children without
    /// having to grow.
    pub fn with_label(label: Vec<u8>, capacity: usize) -> Self {
        debug_assert!(capacity <= MAX_CHILDREN);
        Self {
            label,
            flags: NodeFlags::empty(),
            edges: Vec::with_capacity(capacity),
            children: Vec::with_capacity(capacity),
            value: None,
        }
    }

    /// Fallible counterpart of [Node::with_label] which copies `label` and
    /// reports allocation failure instead of aborting.
    pub fn try_with_label(label: &[u8], capacity: usize) -> Result<Self, TryReserveError> {
        debug_assert!(capacity <= MAX_CHILDREN);
        let mut owned = Vec::new();
        owned.try_reserve_exact(label.len())?;
        owned.extend_from_slice(label);

        let mut edges = Vec::new();
        edges.try_reserve_exact(capacity)?;
        let mut children = Vec::new();
        children.try_reserve_exact(capacity)?;

        Ok(Self {
            label: owned,
            flags: NodeFlags::empty(),
            edges,
            children,
            value: None,
        })
    }

    pub fn label(&self) -> &[u8] {
        &self.label
    }

    pub fn set_label(&mut self, label: Vec<u8>) {
        self.label = label;
    }

    /// Moves the label out, leaving the node with an empty one.
    pub fn take_label(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.label)
    }

    /// Drops the first `count` bytes of the label. Used when a split moves
    /// a prefix of this label into a new parent node.
    pub fn strip_label_front(&mut self, count: usize) {
        self.label.drain(..count);
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn is_word(&self) -> bool {
        self.flags.contains(NodeFlags::WORD)
    }

    pub fn is_wild(&self) -> bool {
        self.flags.contains(NodeFlags::WILD)
    }

    /// Flags the node as a word, and as a wildcard if `wildcard` is set.
    /// An existing wildcard flag is never cleared here.
    pub fn mark_word(&mut self, wildcard: bool) {
        self.flags.insert(NodeFlags::WORD);
        if wildcard {
            self.flags.insert(NodeFlags::WILD);
        }
    }

    /// Clears both the word and the wildcard flag and hands back the value.
    pub fn unmark_word(&mut self) -> Option<V> {
        self.flags.remove(NodeFlags::WORD | NodeFlags::WILD);
        self.value.take()
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }

    /// Returns the value, creating it with `init` if the node has none.
    pub fn value_or_insert_with<F: FnOnce() -> V>(&mut self, init: F) -> &mut V {
        self.value.get_or_insert_with(init)
    }

    /// Swaps in a new value, returning the old one.
    pub fn replace_value(&mut self, value: V) -> Option<V> {
        self.value.replace(value)
    }

    pub fn child_len(&self) -> usize {
        self.children.len()
    }

    /// How many children fit before the node has to be resized.
    pub fn child_capacity(&self) -> usize {
        self.children.capacity().min(self.edges.capacity())
    }

    pub fn edge_at(&self, index: usize) -> u8 {
        self.edges[index]
    }

    pub fn child_at(&self, index: usize) -> NodeIndex {
        self.children[index]
    }

    /// Re-points the child slot at `index` to a different node. The edge
    /// byte is unchanged, so the replacement must start with the same byte.
    pub fn replace_child(&mut self, index: usize, child: NodeIndex) {
        self.children[index] = child;
    }

    /// Binary searches the edge bytes for `byte` and returns the insertion
    /// point: the index of `byte` if present, otherwise the index where it
    /// would have to be inserted to keep the edges sorted.
    pub fn find_child_index(&self, byte: u8) -> usize {
        self.edges.partition_point(|edge| *edge < byte)
    }

    /// Looks up the child selected by `byte`, returning its position in the
    /// child array alongside the handle.
    pub fn child(&self, byte: u8) -> Option<(usize, NodeIndex)> {
        let index = self.find_child_index(byte);
        if self.edges.get(index) == Some(&byte) {
            Some((index, self.children[index]))
        } else {
            None
        }
    }

    /// Grows the child arrays to hold `capacity` children. Never shrinks.
    pub fn resize_to(&mut self, capacity: usize) {
        debug_assert!(capacity <= MAX_CHILDREN);
        let len = self.children.len();
        if capacity > len {
            self.edges.reserve_exact(capacity - len);
            self.children.reserve_exact(capacity - len);
        }
    }

    /// The capacity the node grows to once the current one is exhausted.
    fn next_capacity(&self) -> usize {
        (2 * self.child_capacity()).clamp(1, MAX_CHILDREN)
    }

    /// Makes room for one more child ahead of time, reporting allocation
    /// failure instead of aborting.
    pub fn try_reserve_child(&mut self) -> Result<(), TryReserveError> {
        if self.child_len() < self.child_capacity() {
            return Ok(());
        }
        let additional = self.next_capacity() - self.child_len();
        self.edges.try_reserve_exact(additional)?;
        self.children.try_reserve_exact(additional)?;
        Ok(())
    }

    /// Inserts `child` under the edge byte `byte`, growing the node if it is
    /// full. The byte must not already select a child.
    pub fn insert_child(&mut self, byte: u8, child: NodeIndex) -> usize {
        if self.child_len() == self.child_capacity() {
            self.resize_to(self.next_capacity());
        }
        let index = self.find_child_index(byte);
        debug_assert!(self.edges.get(index) != Some(&byte), "duplicate edge byte");
        self.edges.insert(index, byte);
        self.children.insert(index, child);
        index
    }

    /// Removes the child at `index`, returning its handle.
    pub fn remove_child_at(&mut self, index: usize) -> NodeIndex {
        self.edges.remove(index);
        self.children.remove(index)
    }

    /// Iterates over `(edge byte, child)` pairs in ascending byte order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = (u8, NodeIndex)> + '_ {
        self.edges.iter().copied().zip(self.children.iter().copied())
    }

    pub fn shrink_to_fit(&mut self) {
        self.label.shrink_to_fit();
        self.edges.shrink_to_fit();
        self.children.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_CHILDREN, Node, NodeFlags};
    use crate::list::NodeIndex;

    fn handle(i: u32) -> NodeIndex {
        NodeIndex::from_position(i as usize)
    }

    #[test]
    pub fn children_stay_sorted() {
        let mut node = Node::<()>::with_label(vec![], 0);
        for (i, byte) in [b'm', b'a', b'z', b'c', 0u8, 255u8].into_iter().enumerate() {
            node.insert_child(byte, handle(i as u32 + 2));
        }
        let edges: Vec<u8> = node.children().map(|(b, _)| b).collect();
        assert_eq!(edges, vec![0, b'a', b'c', b'm', b'z', 255]);
        assert_eq!(node.child(b'c'), Some((2, handle(5))));
        assert_eq!(node.child(b'b'), None);
    }

    #[test]
    pub fn find_child_index_is_insertion_point() {
        let mut node = Node::<()>::with_label(vec![], 0);
        assert_eq!(node.find_child_index(b'q'), 0);
        node.insert_child(b'b', handle(2));
        node.insert_child(b'd', handle(3));
        assert_eq!(node.find_child_index(b'a'), 0);
        assert_eq!(node.find_child_index(b'b'), 0);
        assert_eq!(node.find_child_index(b'c'), 1);
        assert_eq!(node.find_child_index(b'e'), 2);
    }

    #[test]
    pub fn capacity_grows_geometrically() {
        let mut node = Node::<()>::with_label(vec![], 0);
        assert_eq!(node.child_capacity(), 0);
        node.insert_child(1, handle(2));
        assert!(node.child_capacity() >= 1);
        for byte in 2..=5u8 {
            node.insert_child(byte, handle(byte as u32 + 2));
        }
        assert!(node.child_capacity() >= 5);

        for byte in 6..=255u8 {
            node.insert_child(byte, handle(byte as u32 + 2));
        }
        node.insert_child(0, handle(300));
        assert_eq!(node.child_len(), MAX_CHILDREN);
    }

    #[test]
    pub fn remove_child_keeps_arrays_parallel() {
        let mut node = Node::<()>::with_label(vec![], 4);
        node.insert_child(b'a', handle(2));
        node.insert_child(b'b', handle(3));
        node.insert_child(b'c', handle(4));
        assert_eq!(node.remove_child_at(1), handle(3));
        assert_eq!(node.child(b'c'), Some((1, handle(4))));
        assert_eq!(node.child_len(), 2);
    }

    #[test]
    pub fn unmark_clears_wildcard() {
        let mut node = Node::<u32>::with_label(b"abc".to_vec(), 0);
        node.mark_word(true);
        node.value_or_insert_with(|| 7);
        assert_eq!(node.flags(), NodeFlags::WORD | NodeFlags::WILD);

        node.mark_word(false);
        assert!(node.is_wild());

        assert_eq!(node.unmark_word(), Some(7));
        assert_eq!(node.flags(), NodeFlags::empty());
    }

    #[test]
    pub fn strip_label_front() {
        let mut node = Node::<()>::with_label(b"carton".to_vec(), 0);
        node.strip_label_front(4);
        assert_eq!(node.label(), b"on");
    }

    #[test]
    pub fn try_with_label_copies() {
        let node = Node::<()>::try_with_label(b"xyz", 2).unwrap();
        assert_eq!(node.label(), b"xyz");
        assert!(node.child_capacity() >= 2);
    }
}
