//! Structural edits: splitting a label on insert, and cutting a redundant
//! node into its only child on remove.
//!
//! Every node an edit needs is built before the first pointer is changed,
//! so a failed allocation leaves the trie as it was.

use std::collections::TryReserveError;

use log::trace;

use crate::{
    Trie,
    dump::Escaped,
    list::NodeIndex,
    node::Node,
    search::{Edge, InsertPoint, Trail},
};

/// The nodes an insertion adds, allocated ahead of the splice.
pub(crate) struct Prepared<V> {
    /// New branching node holding the common prefix of a split label.
    split: Option<Node<V>>,
    /// New leaf holding the key bytes past the last existing node.
    leaf: Option<Node<V>>,
}

impl<V> Trie<V> {
    /// Builds the nodes needed to add `key` at `point`.
    pub(crate) fn prepare(&self, point: &InsertPoint, key: &[u8]) -> Prepared<V> {
        let label = self.node[point.node].label();
        let extends = point.extends(key.len());
        Prepared {
            split: point
                .splits(label.len())
                .then(|| Node::with_label(label[..point.matched].to_vec(), 1 + extends as usize)),
            leaf: extends.then(|| Node::with_label(key[point.consumed + 1..].to_vec(), 0)),
        }
    }

    /// Fallible counterpart of [Trie::prepare]. Besides the new nodes it
    /// reserves their arena slots and, when the leaf hangs off an existing
    /// node, room for one more child there.
    pub(crate) fn try_prepare(
        &mut self,
        point: &InsertPoint,
        key: &[u8],
    ) -> Result<Prepared<V>, TryReserveError> {
        let label = self.node[point.node].label();
        let splits = point.splits(label.len());
        let extends = point.extends(key.len());

        let split = if splits {
            Some(Node::try_with_label(&label[..point.matched], 1 + extends as usize)?)
        } else {
            None
        };
        let leaf = if extends {
            Some(Node::try_with_label(&key[point.consumed + 1..], 0)?)
        } else {
            None
        };

        self.node
            .try_reserve(split.is_some() as usize + leaf.is_some() as usize)?;
        if extends && !splits {
            self.node[point.node].try_reserve_child()?;
        }

        Ok(Prepared { split, leaf })
    }

    /// Links prepared nodes into the trie and returns the node `key` ends at.
    pub(crate) fn splice(&mut self, point: InsertPoint, key: &[u8], prepared: Prepared<V>) -> NodeIndex {
        let mut target = point.node;

        if let Some(mut split) = prepared.split {
            // The old node keeps the part of its label past the split byte
            // and moves under the new node.
            let node = &mut self.node[point.node];
            let byte = node.label()[point.matched];
            node.strip_label_front(point.matched + 1);
            split.insert_child(byte, point.node);

            trace!(
                "split label '{}' off node {:?}",
                Escaped(split.label()),
                point.node
            );

            let split = self.node.insert(split);
            self.node[point.parent.node].replace_child(point.parent.index, split);
            target = split;
        }

        if let Some(leaf) = prepared.leaf {
            let byte = key[point.consumed];
            trace!(
                "attach leaf [{}]'{}' below {:?}",
                Escaped([byte]),
                Escaped(leaf.label()),
                target
            );
            let leaf = self.node.insert(leaf);
            self.node[target].insert_child(byte, leaf);
            target = leaf;
        }

        target
    }

    /// Restores path compression after the word at `trail.target` was
    /// unmarked. The real root is never cut or detached.
    pub(crate) fn prune(&mut self, trail: Trail) {
        if trail.target == NodeIndex::ROOT {
            return;
        }
        match self.node[trail.target].child_len() {
            0 => {
                self.detach_leaf(trail.target, trail.parent);

                // The parent had at least two children or was a word, so at
                // most it has now become a single-child non-word node.
                let parent = trail.parent.node;
                let node = &self.node[parent];
                if parent != NodeIndex::ROOT && node.child_len() == 1 && !node.is_word() {
                    if let Some(grandparent) = trail.grandparent {
                        self.cut(parent, grandparent);
                    }
                }
            }
            1 => self.cut(trail.target, trail.parent),
            _ => {}
        }
    }

    /// Unlinks the leaf `node` from its parent and frees it.
    fn detach_leaf(&mut self, node: NodeIndex, link: Edge) {
        debug_assert_eq!(self.node[node].child_len(), 0);
        debug_assert_eq!(self.node[link.node].child_at(link.index), node);
        trace!("detach leaf {:?} from {:?}", node, link.node);

        self.node[link.node].remove_child_at(link.index);
        self.node.remove(node);
    }

    /// Merges `node`, a non-word node with a single child, into that child:
    /// the child's label becomes `node` label + edge byte + child label and
    /// the child takes the place of `node` under its parent.
    fn cut(&mut self, node: NodeIndex, link: Edge) {
        debug_assert_eq!(self.node[link.node].child_at(link.index), node);
        let Some(mut removed) = self.node.remove(node) else {
            return;
        };
        debug_assert!(!removed.is_word());
        debug_assert_eq!(removed.child_len(), 1);

        let byte = removed.edge_at(0);
        let child = removed.child_at(0);

        let mut label = removed.take_label();
        label.push(byte);
        label.extend_from_slice(self.node[child].label());
        trace!("cut {:?} into {:?} as '{}'", node, child, Escaped(&label));

        self.node[child].set_label(label);
        self.node[link.node].replace_child(link.index, child);
    }
}
