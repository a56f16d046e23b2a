// src/core/types.rs

/// Index of a node inside the trie's node arena. The root is always `0`.
pub type NodeId = usize;

/// Milliseconds since the UNIX epoch, strictly increasing within one trie.
pub type Timestamp = u64;

/// A single ranked suggestion produced by a query.
///
/// Candidates are snapshots: frequency and recency are copied out of the
/// owning terminal node when the query runs, so later inserts do not change
/// a list that has already been handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The sentence as it was last inserted, original casing and punctuation kept.
    pub text: String,
    /// Number of insert and select events recorded for this sentence.
    pub frequency: u64,
    pub last_used_at: Timestamp,
    /// Edit distance between the query and the probe that found this entry.
    /// Always `0` for plain prefix lookups.
    pub distance: usize,
}
