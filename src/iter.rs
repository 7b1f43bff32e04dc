use std::iter::FusedIterator;

use crate::{
    list::{NodeIndex, Slots},
    node::Node,
};

/// One entry of the traversal stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// The node whose children are being visited.
    node: NodeIndex,
    /// The next child of `node` to descend into.
    next: usize,
    /// Length of the key up to and including the label of `node`.
    key_len: usize,
}

/// A word reached by a [Cursor].
#[derive(Debug)]
pub struct Word<'a, V> {
    value: &'a V,
    wildcard: bool,
}

// Manual impls: `V` itself does not need to be `Clone`/`Copy`.
impl<V> Clone for Word<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Word<'_, V> {}

impl<'a, V> Word<'a, V> {
    fn of(node: &'a Node<V>) -> Option<Self> {
        node.value().map(|value| Word {
            value,
            wildcard: node.is_wild(),
        })
    }

    /// The value stored for the word.
    pub fn value(&self) -> &'a V {
        self.value
    }

    /// Whether the word was inserted as a prefix wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }
}

/// The raw, pre-order walk over the words of a [Trie](crate::Trie).
///
/// Rather than handing out owned keys, [Cursor::advance] writes the key of
/// each word into a buffer owned by the caller. The buffer only ever grows,
/// so a single allocation is usually enough for a whole traversal.
///
/// The walk uses an explicit stack, the depth of the trie never touches
/// the call stack. Words come out in ascending lexicographic order.
///
/// ```
/// use ctrie::Trie;
///
/// let trie = Trie::from([("tea", 1), ("ten", 2), ("to", 3)]);
///
/// let mut cursor = trie.cursor();
/// let mut key = Vec::new();
/// let mut seen = vec![];
/// while let Some(word) = cursor.advance(&mut key) {
///     seen.push((String::from_utf8(key.clone()).unwrap(), *word.value()));
/// }
/// assert_eq!(seen, [("tea".into(), 1), ("ten".into(), 2), ("to".into(), 3)]);
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<'a, V> {
    nodes: &'a Slots<V>,
    stack: Vec<Frame>,
    /// The root is a word candidate of its own that no frame visits.
    root_pending: bool,
}

impl<'a, V> Cursor<'a, V> {
    pub(crate) fn new(nodes: &'a Slots<V>) -> Self {
        Self {
            nodes,
            stack: vec![Frame {
                node: NodeIndex::ROOT,
                next: 0,
                key_len: 0,
            }],
            root_pending: true,
        }
    }

    /// Moves to the next word and leaves its key in `key`.
    ///
    /// `key` must be the same buffer, unmodified, across all calls on one
    /// cursor: each step only rewrites the part of the key below the
    /// deepest shared ancestor. Returns [None] once every word was visited;
    /// the cursor is then spent and a new one has to be created to walk the
    /// trie again.
    pub fn advance(&mut self, key: &mut Vec<u8>) -> Option<Word<'a, V>> {
        let nodes = self.nodes;

        if std::mem::take(&mut self.root_pending) {
            if let Some(word) = Word::of(&nodes[NodeIndex::ROOT]) {
                key.clear();
                return Some(word);
            }
        }

        while let Some(frame) = self.stack.last_mut() {
            let parent = &nodes[frame.node];
            if frame.next >= parent.child_len() {
                self.stack.pop();
                continue;
            }

            let byte = parent.edge_at(frame.next);
            let index = parent.child_at(frame.next);
            frame.next += 1;

            let child = &nodes[index];
            key.truncate(frame.key_len);
            key.push(byte);
            key.extend_from_slice(child.label());

            if child.child_len() > 0 {
                self.stack.push(Frame {
                    node: index,
                    next: 0,
                    key_len: key.len(),
                });
            }
            if let Some(word) = Word::of(child) {
                return Some(word);
            }
        }
        None
    }
}

/// An iterator over the entries of a [Trie](crate::Trie) in ascending key
/// order.
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    cursor: Cursor<'a, V>,
    key: Vec<u8>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(nodes: &'a Slots<V>) -> Self {
        Self {
            cursor: Cursor::new(nodes),
            key: Vec::new(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let word = self.cursor.advance(&mut self.key)?;
        Some((self.key.clone(), word.value()))
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

/// An iterator over the keys of a [Trie](crate::Trie) in ascending order.
#[derive(Debug, Clone)]
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Keys<'a, V> {
    pub(crate) fn new(nodes: &'a Slots<V>) -> Self {
        Self {
            inner: Iter::new(nodes),
        }
    }
}

impl<V> Iterator for Keys<'_, V> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

impl<V> FusedIterator for Keys<'_, V> {}

/// An iterator over the values of a [Trie](crate::Trie), ordered by key.
#[derive(Debug, Clone)]
pub struct Values<'a, V> {
    cursor: Cursor<'a, V>,
    /// Scratch space the cursor needs; the keys are never handed out.
    key: Vec<u8>,
}

impl<'a, V> Values<'a, V> {
    pub(crate) fn new(nodes: &'a Slots<V>) -> Self {
        Self {
            cursor: Cursor::new(nodes),
            key: Vec::new(),
        }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance(&mut self.key).map(|word| word.value())
    }
}

impl<V> FusedIterator for Values<'_, V> {}

#[cfg(test)]
mod tests {
    use crate::Trie;

    #[test]
    pub fn empty_trie_yields_nothing() {
        let trie = Trie::<u8>::new();
        let mut cursor = trie.cursor();
        let mut key = Vec::new();
        assert!(cursor.advance(&mut key).is_none());
        assert!(cursor.advance(&mut key).is_none());
    }

    #[test]
    pub fn root_comes_first() {
        let trie = Trie::from([("b", 2), ("", 0), ("a", 1)]);
        let keys: Vec<Vec<u8>> = trie.keys().collect();
        assert_eq!(keys, vec![b"".to_vec(), b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    pub fn prefix_before_extensions() {
        let trie = Trie::from([("car", 1), ("cart", 2), ("care", 3), ("ca", 4), ("d", 5)]);
        let entries: Vec<(Vec<u8>, i32)> = trie.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(
            entries,
            vec![
                (b"ca".to_vec(), 4),
                (b"car".to_vec(), 1),
                (b"care".to_vec(), 3),
                (b"cart".to_vec(), 2),
                (b"d".to_vec(), 5),
            ]
        );
    }

    #[test]
    pub fn buffer_only_grows() {
        let trie = Trie::from([("a-very-long-key-indeed", 1), ("b", 2)]);
        let mut cursor = trie.cursor();
        let mut key = Vec::new();

        cursor.advance(&mut key).unwrap();
        let capacity = key.capacity();
        assert!(capacity >= 22);

        cursor.advance(&mut key).unwrap();
        assert_eq!(key, b"b");
        assert_eq!(key.capacity(), capacity);
    }

    #[test]
    pub fn reports_wildcards() {
        let mut trie = Trie::<u8>::new();
        trie.insert("com.example.", true);
        trie.insert("com.example.www", false);

        let mut cursor = trie.cursor();
        let mut key = Vec::new();
        assert!(cursor.advance(&mut key).unwrap().is_wildcard());
        assert!(!cursor.advance(&mut key).unwrap().is_wildcard());
        assert!(cursor.advance(&mut key).is_none());
    }

    #[test]
    pub fn independent_cursors_interleave() {
        let trie = Trie::from([("x", 1), ("y", 2), ("z", 3)]);
        let mut a = trie.values();
        let mut b = trie.values();
        assert_eq!(a.next(), Some(&1));
        assert_eq!(b.next(), Some(&1));
        assert_eq!(b.next(), Some(&2));
        assert_eq!(a.next(), Some(&2));
        assert_eq!(a.next(), Some(&3));
        assert_eq!(a.next(), None);
        assert_eq!(b.next(), Some(&3));
    }
}
