//! A compressed (radix) trie keyed by byte strings.
//!
//! Edges carry whole byte sequences instead of single bytes, so chains of
//! single-child nodes collapse into one node. Keys are opaque,
//! length-delimited byte strings; `0x00` is an ordinary key byte and the
//! empty key is an ordinary key.
//!
//! Besides exact lookups the trie supports *prefix wildcards*: a key
//! inserted as a wildcard also answers lookups for every longer key that
//! runs past it without a more specific match.
//!
//! ```
//! use ctrie::Trie;
//!
//! let mut trie = Trie::<u32>::new();
//! *trie.insert("com.example.", true) = 1;
//! *trie.insert("com.example.www", false) = 2;
//!
//! assert_eq!(trie.find("com.example.www"), Some(&2));
//! assert_eq!(trie.find("com.example.api"), Some(&1));
//! assert_eq!(trie.find("com.other."), None);
//! ```
//!
//! The trie is a plain single-threaded structure. It offers no internal
//! locking; sharing it across threads follows the usual `&`/`&mut` rules.

use std::{
    fmt::Debug,
    ops::{Index, IndexMut},
};

use list::{NodeIndex, Slots};
use log::debug;
use search::Fallback;

mod dump;
mod edit;
mod error;
mod iter;
mod list;
mod node;
mod search;

pub use crate::dump::Dump;
pub use crate::error::TrieError;
pub use crate::iter::{Cursor, Iter, Keys, Values, Word};

/// A compressed trie mapping byte-string keys to values of type `V`.
///
/// Each node of the trie colocates at most one `V` with its label. Use
/// `Trie<()>` for a plain set of keys.
#[derive(Clone)]
pub struct Trie<V> {
    /// The node pool, this is where the internal nodes are actually stored.
    /// It always holds the fake root and the real root.
    node: Slots<V>,
    /// The amount of words in the [Trie].
    size: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    /// Creates a new [Trie] with no keys. This will create a [Trie] with a
    /// capacity of zero using the [Trie::with_capacity] method.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let tree = Trie::<u32>::new();
    /// assert_eq!(tree.len(), 0);
    /// assert!(!tree.contains(""));
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new [Trie] whose node pool can hold `nodes` nodes before
    /// it has to grow.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let tree = Trie::<usize>::with_capacity(20);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            node: Slots::with_capacity(nodes),
            size: 0,
        }
    }

    /// Returns the amount of keys within the [Trie].
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<&str>::new();
    /// tree.replace("hello", "world");
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the [Trie] holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes currently making up the trie, the root included.
    ///
    /// Re-inserting a key that is already present never changes it.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<u8>::new();
    /// assert_eq!(tree.node_count(), 1);
    ///
    /// tree.insert("cart", false);
    /// tree.insert("care", false);
    /// // root, "car", "t", "e"
    /// assert_eq!(tree.node_count(), 4);
    /// ```
    pub fn node_count(&self) -> usize {
        // The fake root is an implementation detail.
        self.node.live() - 1
    }

    /// Looks up `key`. If the key itself is not present, the value of the
    /// deepest wildcard the key runs past is returned instead.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<u32>::new();
    /// *tree.insert("car", false) = 1;
    /// *tree.insert("cat", true) = 2;
    ///
    /// assert_eq!(tree.find("car"), Some(&1));
    /// assert_eq!(tree.find("cars"), None);
    /// assert_eq!(tree.find("catalog"), Some(&2));
    /// ```
    pub fn find<K: AsRef<[u8]>>(&self, key: K) -> Option<&V> {
        let trail = self.locate(key.as_ref(), Fallback::Wildcard)?;
        self.node[trail.target].value()
    }

    /// Mutable counterpart of [Trie::find], wildcard fallback included.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<u32>::new();
    /// tree.insert("hello", false);
    /// *tree.find_mut("hello").unwrap() += 5;
    /// assert_eq!(tree.find("hello"), Some(&5));
    /// ```
    pub fn find_mut<K: AsRef<[u8]>>(&mut self, key: K) -> Option<&mut V> {
        let trail = self.locate(key.as_ref(), Fallback::Wildcard)?;
        self.node[trail.target].value_mut()
    }

    /// Looks up `key` without falling back to a wildcard.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<u32>::new();
    /// *tree.insert("cat", true) = 2;
    ///
    /// assert_eq!(tree.find_exact("cat"), Some(&2));
    /// assert_eq!(tree.find_exact("catalog"), None);
    /// ```
    pub fn find_exact<K: AsRef<[u8]>>(&self, key: K) -> Option<&V> {
        let trail = self.locate(key.as_ref(), Fallback::Exact)?;
        self.node[trail.target].value()
    }

    /// Checks if [Trie::find] would produce a value for `key`.
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.locate(key.as_ref(), Fallback::Wildcard).is_some()
    }

    /// Checks if `key` is present and was inserted as a wildcard.
    pub fn is_wildcard<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.locate(key.as_ref(), Fallback::Exact)
            .is_some_and(|trail| self.node[trail.target].is_wild())
    }

    /// Inserts `key` and returns its value, starting out as
    /// [Default::default] if the key is new.
    ///
    /// With `wildcard` set the key becomes a prefix wildcard: it also
    /// matches every longer key that has no more specific match. Inserting a
    /// key that already exists creates no nodes and hands back the value
    /// already stored; it can turn the key into a wildcard but never back.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<u32>::new();
    /// *tree.insert("car", false) = 1;
    /// *tree.insert("cart", false) = 2;
    /// *tree.insert("care", false) = 3;
    ///
    /// assert_eq!(*tree.insert("cart", false), 2);
    /// assert_eq!(tree.len(), 3);
    /// ```
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K, wildcard: bool) -> &mut V
    where
        V: Default,
    {
        self.insert_with(key, wildcard, V::default)
    }

    /// Like [Trie::insert], with the value of a new key produced by `init`.
    /// `init` is not called if the key is already present.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<String>::new();
    /// tree.insert_with("greeting", false, || "hello".to_string());
    /// tree.insert_with("greeting", false, || unreachable!());
    /// assert_eq!(tree.find("greeting").map(String::as_str), Some("hello"));
    /// ```
    pub fn insert_with<K, F>(&mut self, key: K, wildcard: bool, init: F) -> &mut V
    where
        K: AsRef<[u8]>,
        F: FnOnce() -> V,
    {
        let key = key.as_ref();
        let point = self.insert_point(key);
        let prepared = self.prepare(&point, key);
        let target = self.splice(point, key, prepared);
        self.mark_word(target, wildcard).value_or_insert_with(init)
    }

    /// Fallible counterpart of [Trie::insert_with]. Every allocation the
    /// insertion needs happens before the trie is modified, so on error the
    /// trie is left exactly as it was.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<u64>::new();
    /// let value = tree.try_insert_with("key", false, || 9).unwrap();
    /// assert_eq!(*value, 9);
    /// ```
    pub fn try_insert_with<K, F>(&mut self, key: K, wildcard: bool, init: F) -> Result<&mut V, TrieError>
    where
        K: AsRef<[u8]>,
        F: FnOnce() -> V,
    {
        let key = key.as_ref();
        let point = self.insert_point(key);
        let prepared = self.try_prepare(&point, key)?;
        let target = self.splice(point, key, prepared);
        Ok(self.mark_word(target, wildcard).value_or_insert_with(init))
    }

    /// Puts a new record in the [Trie], returning the old value
    /// if there previously was a value present.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<usize>::new();
    /// tree.replace("hello", 1);
    ///
    /// // Verify the key is in the tree.
    /// assert_eq!(*tree.find("hello").unwrap(), 1);
    ///
    /// // Verify the key replacement.
    /// assert_eq!(tree.replace("hello", 2).unwrap(), 1);
    /// ```
    pub fn replace<K: AsRef<[u8]>>(&mut self, key: K, value: V) -> Option<V> {
        let key = key.as_ref();
        let point = self.insert_point(key);
        let prepared = self.prepare(&point, key);
        let target = self.splice(point, key, prepared);
        self.mark_word(target, false).replace_value(value)
    }

    /// Flags `target` as a word, keeping count of new words.
    fn mark_word(&mut self, target: NodeIndex, wildcard: bool) -> &mut node::Node<V> {
        let node = &mut self.node[target];
        if !node.is_word() {
            self.size += 1;
        }
        node.mark_word(wildcard);
        node
    }

    /// Deletes a record from the [Trie] according to the
    /// key. It will return the old value if it is present within the
    /// data structure. Only an exact match is removed, a wildcard that
    /// merely covers `key` stays.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<usize>::new();
    /// tree.replace("hello", 12);
    ///
    /// assert_eq!(tree.remove("hello").unwrap(), 12);
    /// assert_eq!(tree.remove("hello"), None);
    /// ```
    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) -> Option<V> {
        let trail = self.locate(key.as_ref(), Fallback::Exact)?;
        let value = self.node[trail.target].unmark_word();
        self.size -= 1;
        self.prune(trail);
        value
    }

    /// Will clear the [Trie] data structure.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::<usize>::new();
    /// tree.replace("hello", 0);
    /// assert!(!tree.is_empty());
    ///
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.node_count(), 1);
    /// ```
    pub fn clear(&mut self) {
        debug!("clearing trie with {} words", self.size);
        self.node.clear();
        self.size = 0;
    }

    /// Releases memory held by vacated node slots at the end of the pool
    /// and by unused child capacity.
    pub fn shrink_to_fit(&mut self) {
        debug!("shrinking trie with {} nodes", self.node_count());
        self.node.shrink_to_fit();
    }

    /// Returns an iterator over the entries of the [Trie] in ascending
    /// key order.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let tree = Trie::from([("hello", 4), ("bye", 3)]);
    ///
    /// let mut entries = tree.iter();
    /// assert_eq!(entries.next(), Some((b"bye".to_vec(), &3)));
    /// assert_eq!(entries.next(), Some((b"hello".to_vec(), &4)));
    /// assert!(entries.next().is_none());
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.node)
    }

    /// Returns an iterator over the keys of the [Trie] in ascending order.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let tree = Trie::from([("hello", 4), ("bye", 3)]);
    ///
    /// let keys: Vec<Vec<u8>> = tree.keys().collect();
    /// assert_eq!(keys, [b"bye".to_vec(), b"hello".to_vec()]);
    /// ```
    pub fn keys(&self) -> Keys<'_, V> {
        Keys::new(&self.node)
    }

    /// Returns an iterator over the values of the [Trie], ordered by key.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let tree = Trie::from([("hello", 1), ("bye", 2)]);
    ///
    /// let mut values = tree.values();
    /// assert_eq!(values.next(), Some(&2));
    /// assert_eq!(values.next(), Some(&1));
    /// assert_eq!(values.next(), None);
    /// ```
    pub fn values(&self) -> Values<'_, V> {
        Values::new(&self.node)
    }

    /// Returns the raw traversal which writes keys into a caller-owned
    /// buffer, see [Cursor].
    pub fn cursor(&self) -> Cursor<'_, V> {
        Cursor::new(&self.node)
    }

    /// Returns a printable view of the node structure, for debugging.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let tree = Trie::from([("to", ()), ("tea", ())]);
    /// println!("{}", tree.dump());
    /// ```
    pub fn dump(&self) -> Dump<'_, V> {
        Dump::new(&self.node)
    }
}

impl<V: Debug> Debug for Trie<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (dump::Escaped(key), value)))
            .finish()
    }
}

impl<V: PartialEq> PartialEq for Trie<V> {
    /// Two tries are equal if they hold the same keys with equal values and
    /// the same wildcard flags. The node layout does not matter.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        let (mut left, mut right) = (self.cursor(), other.cursor());
        let (mut left_key, mut right_key) = (Vec::new(), Vec::new());
        loop {
            match (left.advance(&mut left_key), right.advance(&mut right_key)) {
                (None, None) => return true,
                (Some(a), Some(b)) => {
                    if left_key != right_key
                        || a.is_wildcard() != b.is_wildcard()
                        || a.value() != b.value()
                    {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl<V: Eq> Eq for Trie<V> {}

impl<V, K: AsRef<[u8]>> Index<K> for Trie<V> {
    type Output = V;

    /// Indexes into the [Trie] with [Trie::find] semantics.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let tree = Trie::from([("apple", 4)]);
    ///
    /// assert_eq!(tree["apple"], 4);
    /// ```
    fn index(&self, index: K) -> &Self::Output {
        self.find(index).expect("Invalid trie index")
    }
}

impl<V, K: AsRef<[u8]>> IndexMut<K> for Trie<V> {
    /// Indexes mutably into the [Trie].
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree = Trie::from([("apple", 4)]);
    ///
    /// tree["apple"] = 5;
    ///
    /// assert_eq!(tree["apple"], 5);
    /// ```
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        self.find_mut(index).expect("Invalid trie index")
    }
}

impl<'a, V> IntoIterator for &'a Trie<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Extend<(K, V)> for Trie<V>
where
    K: AsRef<[u8]>,
{
    /// Extends a [Trie] from an iterator of tuples, overwriting the values
    /// of keys that are already present.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let mut tree: Trie<&str> = Trie::new();
    /// tree.extend([("hello", "world")]);
    ///
    /// assert_eq!(*tree.find("hello").unwrap(), "world");
    /// ```
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.replace(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Trie<V>
where
    K: AsRef<[u8]>,
{
    /// Creates a [Trie] from an iterator of tuples.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let tree: Trie<usize> = Trie::from_iter([("hello", 4)]);
    ///
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(*tree.find("hello").unwrap(), 4);
    /// ```
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Trie::new();
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Trie<V>
where
    K: AsRef<[u8]>,
{
    /// Creates a [Trie] from an array of tuples.
    ///
    /// ```
    /// use ctrie::Trie;
    ///
    /// let trie: Trie<i32> = Trie::from([("hello", 4)]);
    ///
    /// assert_eq!(trie.len(), 1);
    /// assert_eq!(*trie.find("hello").unwrap(), 4);
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, V: arbitrary::Arbitrary<'a>> arbitrary::Arbitrary<'a> for Trie<V> {
    /// Builds a trie from arbitrary `(key, wildcard, value)` triples.
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut trie = Trie::new();
        for entry in u.arbitrary_iter::<(Vec<u8>, bool, V)>()? {
            let (key, wildcard, value) = entry?;
            trie.replace(&key, value);
            if wildcard {
                trie.insert_with(&key, true, || unreachable!("key was just inserted"));
            }
        }
        Ok(trie)
    }
}

#[cfg(test)]
impl<V> Trie<V> {
    /// Walks the whole trie and checks the structural invariants: sorted
    /// distinct edges, values exactly on words, wildcards only on words, no
    /// redundant single-child nodes below the root, the fake root linking
    /// the root, and the word count.
    pub(crate) fn validate(&self) {
        let fake = &self.node[NodeIndex::FAKE_ROOT];
        assert_eq!(fake.child_len(), 1, "fake root must have one child");
        assert_eq!(fake.child(0x00), Some((0, NodeIndex::ROOT)));
        assert!(self.node[NodeIndex::ROOT].label().is_empty(), "root label must stay empty");

        let mut words = 0;
        let mut reachable = 1;
        let mut stack = vec![NodeIndex::ROOT];
        while let Some(index) = stack.pop() {
            let node = &self.node[index];
            assert_eq!(node.is_word(), node.value().is_some(), "value must sit on words");
            assert!(!node.is_wild() || node.is_word(), "wildcard must be a word");
            if node.is_word() {
                words += 1;
            }
            if index != NodeIndex::ROOT {
                assert!(
                    node.child_len() != 1 || node.is_word(),
                    "redundant single-child node {index:?}"
                );
            }

            let edges: Vec<u8> = node.children().map(|(byte, _)| byte).collect();
            assert!(edges.windows(2).all(|w| w[0] < w[1]), "edges must be strictly sorted");

            for (_, child) in node.children() {
                reachable += 1;
                stack.push(child);
            }
        }
        assert_eq!(words, self.size, "word count");
        assert_eq!(reachable, self.node_count(), "leaked or dangling nodes");
    }
}
