//! A toy routing table keyed by reversed host names.
//!
//! `api.example.com` is stored as `com.example.api`, so a wildcard entry for
//! `com.example.` catches every host under `example.com` that has no more
//! specific route.

use std::{
    hint::black_box,
    time::{Duration, Instant},
};

use ctrie::Trie;
use rand::{Rng, SeedableRng, distr::Distribution, rngs::StdRng};
use rand_distr::Zipf;

/// How many routing table entries we should
/// be generating to compose our test.
pub const ROUTING_TABLE_SIZE: usize = 100_000;

/// How many requests we should run through our
/// routing table.
pub const SIMULATED_SERVED_REQUESTS: usize = 100_000;

const LABELS: &[&str] = &[
    "www", "api", "mail", "cdn", "static", "dev", "app", "auth", "img", "ftp", "docs", "shop",
];

const TLDS: &[&str] = &["com", "net", "org", "io", "dev"];

/// The routing action to implement.
#[derive(PartialEq, Eq, Debug, Default, Clone, Copy)]
pub enum RoutingAction {
    Forward(usize),
    Restrict,
    Modification,
    #[default]
    Dropping,
}

/// Turns `a.b.c` into the key `c.b.a`.
fn reversed(host: &str) -> Vec<u8> {
    host.rsplit('.').collect::<Vec<_>>().join(".").into_bytes()
}

/// The key of a wildcard route covering every host below `domain`.
fn below(domain: &str) -> Vec<u8> {
    let mut key = reversed(domain);
    key.push(b'.');
    key
}

/// Draws a host name; popular labels come up far more often.
fn sample_host<R: Rng>(zipf: &Zipf<f64>, rng: &mut R, depth: usize) -> String {
    let mut parts = Vec::with_capacity(depth + 1);
    for _ in 0..depth {
        let rank = zipf.sample(rng) as usize - 1;
        match LABELS.get(rank) {
            Some(label) => parts.push(label.to_string()),
            None => parts.push(format!("site{rank}")),
        }
    }
    parts.push(TLDS[rng.random_range(0..TLDS.len())].to_string());
    parts.join(".")
}

fn sample_action<R: Rng>(rng: &mut R) -> RoutingAction {
    match rng.random_range(0..4) {
        0 => RoutingAction::Forward(rng.random_range(0..16)),
        1 => RoutingAction::Dropping,
        2 => RoutingAction::Restrict,
        _ => RoutingAction::Modification,
    }
}

/// Resolves a host, falling back to the most specific wildcard domain.
pub fn route<'a>(trie: &'a Trie<RoutingAction>, host: &str) -> Option<&'a RoutingAction> {
    trie.find(reversed(host))
}

pub fn main() {
    // let us run a quick test to verify the trie is working as expected.
    let mut trie = Trie::<RoutingAction>::new();
    *trie.insert(below("example.com"), true) = RoutingAction::Forward(1);
    *trie.insert(reversed("www.example.com"), false) = RoutingAction::Forward(4);
    *trie.insert(reversed("ads.example.com"), false) = RoutingAction::Dropping;
    *trie.insert(below("internal.example.com"), true) = RoutingAction::Restrict;

    assert_eq!(route(&trie, "www.example.com"), Some(&RoutingAction::Forward(4)));
    assert_eq!(route(&trie, "ads.example.com"), Some(&RoutingAction::Dropping));
    assert_eq!(route(&trie, "api.example.com"), Some(&RoutingAction::Forward(1)));
    assert_eq!(
        route(&trie, "db.internal.example.com"),
        Some(&RoutingAction::Restrict)
    );
    assert_eq!(route(&trie, "example.org"), None);
    println!("Sanity checks passed:\n{}", trie.dump());

    // We will now build the routing table.
    let zipf = Zipf::new(LABELS.len() as f64 * 4.0, 1.1).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    let mut trie = Trie::<RoutingAction>::new();
    println!(
        "Building a randomized routing table of size {} from Zipfian distribution.",
        ROUTING_TABLE_SIZE
    );
    for _ in 0..ROUTING_TABLE_SIZE {
        let depth = rng.random_range(1..4);
        let wildcard = rng.random_bool(0.2);
        let host = sample_host(&zipf, &mut rng, depth);
        let key = if wildcard { below(&host) } else { reversed(&host) };
        *trie.insert(key, wildcard) = sample_action(&mut rng);
    }
    println!(
        "Built the routing table! {} routes in {} nodes.",
        trie.len(),
        trie.node_count()
    );

    // Serve a bunch of requests.
    println!("Serving {} requests...", SIMULATED_SERVED_REQUESTS);
    let mut service_time = Vec::with_capacity(SIMULATED_SERVED_REQUESTS);
    let mut routed = 0;
    for _ in 0..SIMULATED_SERVED_REQUESTS {
        let depth = rng.random_range(2..5);
        let candidate = reversed(&sample_host(&zipf, &mut rng, depth));

        let start = Instant::now();
        let action = black_box(trie.find(&candidate));
        service_time.push(start.elapsed());
        routed += action.is_some() as usize;
    }
    println!("Served requests, {routed} had a route.");

    let sum =
        (service_time.iter().sum::<Duration>().as_micros() as f64) / (service_time.len() as f64);
    println!("Average Request Service Time: {sum} us");
}
