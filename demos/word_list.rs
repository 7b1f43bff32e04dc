//! Loads a newline separated word list into a trie, then checks that
//! every word can be found again and that iteration yields them in order.
//!
//! ```text
//! cargo run --example word_list -- /usr/share/dict/words
//! ```

use std::{
    collections::BTreeSet,
    fs,
    time::Instant,
};

use ctrie::Trie;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: word_list <file>")?;
    let text = fs::read(&path)?;

    let words: Vec<&[u8]> = text
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect();

    let start = Instant::now();
    let mut trie = Trie::<u32>::with_capacity(words.len());
    for (line, word) in words.iter().enumerate() {
        *trie.insert(word, false) = line as u32;
    }
    println!(
        "Inserted {} words ({} distinct) into {} nodes in {:?}.",
        words.len(),
        trie.len(),
        trie.node_count(),
        start.elapsed()
    );

    let start = Instant::now();
    for word in &words {
        assert!(trie.contains(word), "lost {}", String::from_utf8_lossy(word));
    }
    println!("Found every word again in {:?}.", start.elapsed());

    let sorted: BTreeSet<&[u8]> = words.iter().copied().collect();
    assert!(trie.keys().eq(sorted.iter().map(|w| w.to_vec())));
    println!("Iteration order matches.");

    Ok(())
}
