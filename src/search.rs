//! Descent from the root along the unique path a key selects.
//!
//! Nodes keep no parent handles, so every search that feeds a structural
//! edit hands back the ancestors the edit needs. No edit ever reaches more
//! than two levels above the node it starts from.

use crate::{Trie, list::NodeIndex};

/// A link from a parent to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Edge {
    /// The parent node.
    pub node: NodeIndex,
    /// The position of the child in the parent's child array.
    pub index: usize,
}

/// A node found by [Trie::locate] together with the two links above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Trail {
    pub target: NodeIndex,
    /// Parent of `target`. For the real root this is the fake root.
    pub parent: Edge,
    /// Parent of the parent, absent when the parent is the fake root.
    pub grandparent: Option<Edge>,
}

impl Trail {
    const ROOT: Trail = Trail {
        target: NodeIndex::ROOT,
        parent: Edge {
            node: NodeIndex::FAKE_ROOT,
            index: 0,
        },
        grandparent: None,
    };

    /// Steps from `target` into its child at `index`.
    fn descend(self, index: usize, child: NodeIndex) -> Trail {
        Trail {
            target: child,
            parent: Edge {
                node: self.target,
                index,
            },
            grandparent: Some(self.parent),
        }
    }
}

/// Whether a search may settle for a wildcard ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fallback {
    /// Only a node the key ends at exactly qualifies.
    Exact,
    /// The deepest wildcard passed on the way down answers when there is
    /// no exact match.
    Wildcard,
}

/// Where the longest existing path that agrees with a key ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InsertPoint {
    /// The last node reached.
    pub node: NodeIndex,
    /// The link from the parent of `node` to `node`.
    pub parent: Edge,
    /// How many bytes of the label of `node` agree with the key.
    pub matched: usize,
    /// Offset of the first key byte not yet consumed.
    pub consumed: usize,
}

impl InsertPoint {
    /// The key diverged from (or ended inside) the label of `node`, so
    /// the label has to be split.
    pub fn splits(&self, label_len: usize) -> bool {
        self.matched < label_len
    }

    /// Key bytes remain that need a new leaf.
    pub fn extends(&self, key_len: usize) -> bool {
        self.consumed < key_len
    }
}

impl<V> Trie<V> {
    /// Finds the node for `key` and its two immediate ancestors.
    ///
    /// If the key does not end exactly at a word node and `fallback` allows
    /// it, the deepest wildcard node whose label was fully consumed with key
    /// bytes left over is returned instead. An exact match always wins over
    /// a wildcard.
    pub(crate) fn locate(&self, key: &[u8], fallback: Fallback) -> Option<Trail> {
        let mut trail = Trail::ROOT;
        let mut wild = None;
        let mut rest = key;
        loop {
            let node = &self.node[trail.target];

            // Label mismatch, or the key ended inside the label.
            let Some(after) = rest.strip_prefix(node.label()) else {
                break;
            };

            let Some((&byte, tail)) = after.split_first() else {
                if node.is_word() {
                    return Some(trail);
                }
                break;
            };

            if fallback == Fallback::Wildcard && node.is_wild() {
                wild = Some(trail);
            }

            let Some((index, child)) = node.child(byte) else {
                break;
            };
            trail = trail.descend(index, child);
            rest = tail;
        }
        wild
    }

    /// Walks down as long as the path agrees with `key` and reports where it
    /// stopped: inside a label (mismatch or key exhausted), or at the end of
    /// a label with no child for the next byte, or with the key used up.
    pub(crate) fn insert_point(&self, key: &[u8]) -> InsertPoint {
        let mut point = InsertPoint {
            node: NodeIndex::ROOT,
            parent: Trail::ROOT.parent,
            matched: 0,
            consumed: 0,
        };
        loop {
            let node = &self.node[point.node];
            let rest = &key[point.consumed..];
            let label = node.label();

            point.matched = common_prefix_len(label, rest);
            point.consumed += point.matched;

            if point.matched < label.len() || point.consumed == key.len() {
                return point;
            }

            let Some((index, child)) = node.child(key[point.consumed]) else {
                return point;
            };

            point.consumed += 1;
            point.parent = Edge {
                node: point.node,
                index,
            };
            point.node = child;
        }
    }
}

/// Length of the longest common prefix of two byte strings.
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::{Edge, Fallback, common_prefix_len};
    use crate::{Trie, list::NodeIndex};

    #[test]
    pub fn common_prefix() {
        assert_eq!(common_prefix_len(b"cart", b"care"), 3);
        assert_eq!(common_prefix_len(b"", b"care"), 0);
        assert_eq!(common_prefix_len(b"car", b"car"), 3);
        assert_eq!(common_prefix_len(b"x", b"y"), 0);
    }

    #[test]
    pub fn locate_root_for_empty_key() {
        let mut trie = Trie::<u32>::new();
        assert!(trie.locate(b"", Fallback::Exact).is_none());

        trie.insert(b"", false);
        let trail = trie.locate(b"", Fallback::Exact).unwrap();
        assert_eq!(trail.target, NodeIndex::ROOT);
        assert_eq!(
            trail.parent,
            Edge {
                node: NodeIndex::FAKE_ROOT,
                index: 0
            }
        );
        assert!(trail.grandparent.is_none());
    }

    #[test]
    pub fn locate_tracks_ancestors() {
        let mut trie = Trie::<u32>::new();
        trie.insert(b"car", false);
        trie.insert(b"cart", false);
        trie.insert(b"care", false);

        // root -> "car" -> {"e", "t"}
        let trail = trie.locate(b"cart", Fallback::Exact).unwrap();
        let car = trie.node[NodeIndex::ROOT].child(b'c').unwrap().1;
        assert_eq!(trail.parent.node, car);
        assert_eq!(trail.parent.index, 1);
        assert_eq!(
            trail.grandparent,
            Some(Edge {
                node: NodeIndex::ROOT,
                index: 0
            })
        );
        assert_eq!(trie.node[trail.parent.node].child_at(trail.parent.index), trail.target);
    }

    #[test]
    pub fn locate_misses() {
        let mut trie = Trie::<u32>::new();
        trie.insert(b"car", false);
        trie.insert(b"cart", false);

        assert!(trie.locate(b"ca", Fallback::Wildcard).is_none());
        assert!(trie.locate(b"cab", Fallback::Wildcard).is_none());
        assert!(trie.locate(b"carts", Fallback::Wildcard).is_none());
        assert!(trie.locate(b"carting", Fallback::Wildcard).is_none());
    }

    #[test]
    pub fn locate_prefers_deepest_wildcard() {
        let mut trie = Trie::<u32>::new();
        *trie.insert(b"com.", true) = 1;
        *trie.insert(b"com.example.", true) = 2;
        *trie.insert(b"com.example.www", false) = 3;

        let deep = trie.locate(b"com.example.api", Fallback::Wildcard).unwrap();
        assert_eq!(trie.node[deep.target].value(), Some(&2));

        let shallow = trie.locate(b"com.other", Fallback::Wildcard).unwrap();
        assert_eq!(trie.node[shallow.target].value(), Some(&1));

        let exact = trie.locate(b"com.example.www", Fallback::Wildcard).unwrap();
        assert_eq!(trie.node[exact.target].value(), Some(&3));

        // Running past an exact word falls back to the wildcard above it.
        let past = trie.locate(b"com.example.wwwx", Fallback::Wildcard).unwrap();
        assert_eq!(trie.node[past.target].value(), Some(&2));

        assert!(trie.locate(b"com.example.api", Fallback::Exact).is_none());
        // A wildcard needs key bytes beyond it to act as a fallback.
        assert!(trie.locate(b"com", Fallback::Wildcard).is_none());
    }

    #[test]
    pub fn insert_point_positions() {
        let mut trie = Trie::<u32>::new();
        trie.insert(b"cart", false);

        // root -[c]-> "art"; diverges inside "art".
        let point = trie.insert_point(b"care");
        assert_eq!(point.matched, 2);
        assert_eq!(point.consumed, 3);
        assert!(point.splits(3));
        assert!(point.extends(4));

        // Key ends inside the label.
        let point = trie.insert_point(b"ca");
        assert_eq!(point.matched, 1);
        assert_eq!(point.consumed, 2);
        assert!(point.splits(3) && !point.extends(2));

        // Label consumed, no child for the next byte.
        let point = trie.insert_point(b"cartoon");
        assert_eq!(point.matched, 3);
        assert_eq!(point.consumed, 4);
        assert!(!point.splits(3) && point.extends(7));

        // Exact hit.
        let point = trie.insert_point(b"cart");
        assert_eq!(point.consumed, 4);
        assert!(!point.splits(3) && !point.extends(4));
    }
}
