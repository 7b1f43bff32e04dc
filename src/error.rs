use std::collections::TryReserveError;

/// Errors reported by the fallible [Trie](crate::Trie) operations.
///
/// Running out of memory is terminal for the infallible operations, which
/// abort like the rest of `std`. Only the `try_` variants surface it, and
/// they do so before touching the trie, so the structure stays intact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TrieError {
    /// Memory for a node, a label or a child slot could not be reserved.
    #[error("failed to reserve memory for the trie: {0}")]
    Alloc(#[from] TryReserveError),
}
