#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use ctrie::Trie;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let Ok(mut trie) = Trie::<u64>::arbitrary(&mut unstructured) else {
        return;
    };
    let before = trie.len();

    let Ok(key) = Vec::<u8>::arbitrary(&mut unstructured) else {
        return;
    };
    let Ok(value) = u64::arbitrary(&mut unstructured) else {
        return;
    };

    let old = trie.replace(&key, value);
    assert_eq!(trie.len(), before + old.is_none() as usize);
    assert_eq!(trie.find_exact(&key), Some(&value));

    let copy = trie.clone();
    assert_eq!(copy, trie);
    assert_eq!(trie.remove(&key), Some(value));
    assert!(trie.find_exact(&key).is_none());
});
