//! Insertion and lookup benchmarks over generated word sets.
//!
//! The lookup grid follows the layout of the `radix_trie` and `trie-hard`
//! suites: every word set is probed with sample streams in which a given
//! percentage of the probes are hits.

use std::collections::HashSet;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ctrie::Trie;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Generates `count` distinct lowercase words of length `1..=max_len`.
fn generate_words(seed: u64, count: usize, max_len: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut words = HashSet::with_capacity(count);
    while words.len() < count {
        let len = rng.random_range(1..=max_len);
        let word: String = (0..len)
            .map(|_| rng.random_range(b'a'..=b'z') as char)
            .collect();
        words.insert(word);
    }
    words.into_iter().collect()
}

fn get_big_text() -> Vec<String> {
    generate_words(1984, 10_000, 12)
}

fn get_small_text() -> Vec<String> {
    generate_words(1633, 200, 8)
}

fn get_random_text() -> Vec<String> {
    generate_words(7, 5_000, 16)
}

fn make_trie(words: &[String]) -> Trie<()> {
    words.iter().map(|w| (w, ())).collect()
}

fn trie_insert_big(b: &mut Criterion) {
    let words = get_big_text();
    b.bench_function("ctrie insert - big", |b| {
        b.iter(|| make_trie(black_box(&words)))
    });
}

fn trie_insert_small(b: &mut Criterion) {
    let words = get_small_text();
    b.bench_function("ctrie insert - small", |b| {
        b.iter(|| make_trie(black_box(&words)))
    });
}

fn trie_wildcard_lookup(b: &mut Criterion) {
    let words = get_big_text();
    let mut trie = Trie::<()>::new();
    for word in words.iter().filter(|w| w.len() <= 3) {
        trie.insert(word, true);
    }
    let samples = get_random_text();
    b.bench_function("ctrie wildcard get - big", |b| {
        b.iter(|| {
            samples
                .iter()
                .filter_map(|w| trie.find(black_box(w)))
                .count()
        })
    });
}

fn trie_iterate_big(b: &mut Criterion) {
    let trie = make_trie(&get_big_text());
    b.bench_function("ctrie iterate - big", |b| {
        b.iter(|| {
            let mut cursor = trie.cursor();
            let mut key = Vec::new();
            let mut total = 0;
            while cursor.advance(&mut key).is_some() {
                total += key.len();
            }
            black_box(total)
        })
    });
}

fn generate_samples(hits: &[String], hit_percent: i32) -> Vec<String> {
    let roulette_inc = hit_percent as f64 / 100.;
    let mut roulette = 0.;

    let mut result = get_random_text();
    let mut hit_iter = hits.iter().cycle();

    for w in result.iter_mut() {
        roulette += roulette_inc;
        if roulette >= 1. {
            roulette -= 1.;
            if let Some(hit) = hit_iter.next() {
                w.clone_from(hit);
            }
        }
    }

    result
}

macro_rules! bench_percents_impl {
    ( [ $( ($size:expr, $percent:expr ), )+ ] ) => {$(
        paste::paste! {
            fn [< trie_get_ $size _ $percent >] (b: &mut Criterion) {
                let words = [< get_ $size _text >]();
                let trie = make_trie(&words);
                let samples = generate_samples(&words, $percent);
                b.bench_function(
                    concat!(
                        "ctrie get - ",
                        stringify!($size),
                        " - ",
                        stringify!($percent),
                        "%"
                    ), |b| {
                    b.iter(|| {
                        samples.iter()
                            .filter_map(|w| trie.find(black_box(w)))
                            .count()
                    })
                });
            }
        }
    )+};

    (  _groups [ $( ($size:expr, $percent:expr ), )+ ] ) => {
        paste::paste! {
            criterion_group!(
                get_benches,
                $(
                    [< trie_get_ $size _ $percent >],
                )+
            );
        }
    };
}

macro_rules! cartesian_impl {
    ($out:tt [] $b:tt $init_b:tt) => {
        bench_percents_impl!($out);
        bench_percents_impl!(_groups $out);
    };
    ($out:tt [$a:expr, $($at:tt)*] [] $init_b:tt) => {
        cartesian_impl!($out [$($at)*] $init_b $init_b);
    };
    ([$($out:tt)*] [$a:expr, $($at:tt)*] [$b:expr, $($bt:tt)*] $init_b:tt) => {
        cartesian_impl!([$($out)* ($a, $b),] [$a, $($at)*] [$($bt)*] $init_b);
    };
}

macro_rules! bench_get_percents {
    ([$($size:tt)*], [$($percent:tt)*]) => {
        cartesian_impl!([] [$($size)*,] [$($percent)*,] [$($percent)*,]);
    };
}

bench_get_percents!([big, small], [100, 75, 50, 25, 10, 5, 2, 1]);

criterion_group!(insert_benches, trie_insert_big, trie_insert_small);
criterion_group!(walk_benches, trie_wildcard_lookup, trie_iterate_big);

criterion_main!(get_benches, insert_benches, walk_benches);
