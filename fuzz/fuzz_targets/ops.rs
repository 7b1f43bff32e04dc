#![no_main]

use arbitrary::Arbitrary;
use ctrie::Trie;
use libfuzzer_sys::fuzz_target;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Arbitrary, Debug)]
pub enum Ops {
    Insert(Vec<u8>, bool),
    Replace(Vec<u8>, u8),
    Delete(Vec<u8>),
    Get(Vec<u8>),
    Find(Vec<u8>),
    Defragment,
    Clear,
}

/// The answer a lookup should give: the key itself, or else the longest
/// wildcard prefix strictly shorter than the key.
fn expected<'a>(
    twin: &'a BTreeMap<Vec<u8>, u8>,
    wild: &BTreeSet<Vec<u8>>,
    key: &[u8],
) -> Option<&'a u8> {
    twin.get(key).or_else(|| {
        (0..key.len())
            .rev()
            .find(|&len| wild.contains(&key[..len]))
            .and_then(|len| twin.get(&key[..len]))
    })
}

fuzz_target!(|data: Vec<Ops>| {
    let mut trie = Trie::<u8>::new();

    let mut twin = BTreeMap::<Vec<u8>, u8>::new();
    let mut wild = BTreeSet::<Vec<u8>>::new();

    for datum in data {
        match datum {
            Ops::Insert(key, wildcard) => {
                let value = *trie.insert(&key, wildcard);
                assert_eq!(value, *twin.entry(key.clone()).or_default());
                if wildcard {
                    wild.insert(key);
                }
            }
            Ops::Replace(key, value) => {
                assert_eq!(trie.replace(&key, value), twin.insert(key, value));
            }
            Ops::Delete(key) => {
                wild.remove(&key);
                assert_eq!(trie.remove(&key), twin.remove(&key));
            }
            Ops::Get(key) => {
                assert_eq!(trie.find_exact(&key), twin.get(&key));
                assert_eq!(trie.is_wildcard(&key), wild.contains(&key));
            }
            Ops::Find(key) => {
                assert_eq!(trie.find(&key), expected(&twin, &wild, &key));
            }
            Ops::Defragment => {
                trie.shrink_to_fit();
            }
            Ops::Clear => {
                trie.clear();
                twin.clear();
                wild.clear();
            }
        }

        assert_eq!(trie.len(), twin.len());
    }

    let keys: Vec<Vec<u8>> = trie.keys().collect();
    assert!(keys.iter().eq(twin.keys()));
});
