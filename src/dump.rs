use std::fmt;

use crate::{
    list::{NodeIndex, Slots},
    node::{Node, NodeFlags},
};

/// Prints bytes with everything outside printable ASCII escaped.
pub(crate) struct Escaped<B>(pub B);

impl<B: AsRef<[u8]>> fmt::Display for Escaped<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.as_ref() {
            write!(f, "{}", std::ascii::escape_default(b))?;
        }
        Ok(())
    }
}

impl<B: AsRef<[u8]>> fmt::Debug for Escaped<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

/// A human readable rendering of the node structure of a
/// [Trie](crate::Trie), produced by [Trie::dump](crate::Trie::dump).
///
/// Each node is one line, indented by its depth:
///
/// ```text
/// root children=1 cap=1 <>:
///     [c]->'ar' children=2 cap=2 <W>:
///         [e]->'' children=0 cap=0 <W>:
///         [t]->'' children=0 cap=0 <W*>:
/// ```
///
/// `W` marks a word, `*` a wildcard. The output is meant for debugging and
/// its exact shape is not stable.
pub struct Dump<'a, V> {
    nodes: &'a Slots<V>,
}

impl<'a, V> Dump<'a, V> {
    pub(crate) fn new(nodes: &'a Slots<V>) -> Self {
        Self { nodes }
    }
}

fn write_tail<V>(f: &mut fmt::Formatter<'_>, node: &Node<V>) -> fmt::Result {
    write!(
        f,
        " children={} cap={} <",
        node.child_len(),
        node.child_capacity()
    )?;
    if node.flags().contains(NodeFlags::WORD) {
        f.write_str("W")?;
    }
    if node.flags().contains(NodeFlags::WILD) {
        f.write_str("*")?;
    }
    f.write_str(">:\n")
}

impl<V> fmt::Display for Dump<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = &self.nodes[NodeIndex::ROOT];
        f.write_str("root")?;
        write_tail(f, root)?;

        let mut stack: Vec<(u8, NodeIndex, usize)> = root
            .children()
            .rev()
            .map(|(byte, child)| (byte, child, 1))
            .collect();

        while let Some((byte, index, level)) = stack.pop() {
            let node = &self.nodes[index];
            write!(
                f,
                "{:indent$}[{}]->'{}'",
                "",
                Escaped([byte]),
                Escaped(node.label()),
                indent = 4 * level
            )?;
            write_tail(f, node)?;
            stack.extend(
                node.children()
                    .rev()
                    .map(|(byte, child)| (byte, child, level + 1)),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Escaped;
    use crate::Trie;

    #[test]
    pub fn escapes_bytes() {
        assert_eq!(Escaped(b"ab\x00\xff\n").to_string(), "ab\\x00\\xff\\n");
        assert_eq!(format!("{:?}", Escaped("q")), "\"q\"");
    }

    #[test]
    pub fn dump_layout() {
        let mut trie = Trie::<u8>::new();
        trie.insert("car", false);
        trie.insert("care", false);
        trie.insert("cart", true);

        let dump = trie.dump().to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("root children=1"));
        assert!(lines[1].starts_with("    [c]->'ar' children=2"));
        assert!(lines[1].ends_with("<W>:"));
        assert!(lines[2].starts_with("        [e]->'' children=0"));
        assert!(lines[3].starts_with("        [t]->''"));
        assert!(lines[3].ends_with("<W*>:"));
    }
}
