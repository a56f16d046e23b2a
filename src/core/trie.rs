// --- File: src/core/trie.rs
use crate::core::types::{Candidate, NodeId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

const ROOT: NodeId = 0;

/// Terminal metadata. Present only on nodes where an inserted sentence ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    text: String,
    frequency: u64,
    last_used_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrieNode {
    children: HashMap<char, NodeId>,
    entry: Option<Entry>,
}

impl TrieNode {
    fn new() -> Self {
        Self { children: HashMap::new(), entry: None }
    }
}

/// Lowercases a sentence into its trie key. Spaces are kept as key characters.
pub fn normalize(sentence: &str) -> String {
    sentence.to_lowercase()
}

/// A mutable, in-memory sentence trie with per-entry usage statistics.
///
/// Nodes live in a flat arena and refer to their children by index, so every
/// node is owned by exactly one parent and traversal never recurses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixTrie {
    nodes: Vec<TrieNode>,
    total_insertions: u64,
    entry_count: usize,
    last_tick: Timestamp,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new()], total_insertions: 0, entry_count: 0, last_tick: 0 }
    }

    /// Number of distinct stored sentences.
    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Number of successful `insert` calls, duplicates included.
    pub fn total_insertions(&self) -> u64 {
        self.total_insertions
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Inserts a sentence, or bumps its statistics if its key is already stored.
    ///
    /// Returns `false` without touching the trie when the sentence is blank.
    /// O(k) where k is the key length.
    pub fn insert(&mut self, sentence: &str) -> bool {
        let text = sentence.trim();
        if text.is_empty() {
            return false;
        }

        let mut node_idx = ROOT;
        for ch in normalize(text).chars() {
            let next_idx = if let Some(&id) = self.nodes[node_idx].children.get(&ch) {
                id
            } else {
                let new_node_id = self.nodes.len();
                self.nodes.push(TrieNode::new());
                self.nodes[node_idx].children.insert(ch, new_node_id);
                new_node_id
            };
            node_idx = next_idx;
        }

        let now = self.tick();
        let node = &mut self.nodes[node_idx];
        if let Some(entry) = node.entry.as_mut() {
            entry.text = text.to_string();
            entry.frequency += 1;
            entry.last_used_at = now;
        } else {
            node.entry = Some(Entry { text: text.to_string(), frequency: 1, last_used_at: now });
            self.entry_count += 1;
        }
        self.total_insertions += 1;
        log::debug!("inserted {:?} (node {}, {} nodes total)", text, node_idx, self.nodes.len());
        true
    }

    /// Records that the user picked `sentence` from a suggestion list.
    ///
    /// Only the entry whose stored text matches exactly is updated; a missing
    /// path or a different sentence sharing the same key is left alone.
    pub fn record_selection(&mut self, sentence: &str) -> bool {
        let Some(node_idx) = self.locate(sentence) else {
            return false;
        };
        let owned = matches!(&self.nodes[node_idx].entry, Some(entry) if entry.text == sentence);
        if !owned {
            return false;
        }
        let now = self.tick();
        if let Some(entry) = self.nodes[node_idx].entry.as_mut() {
            entry.frequency += 1;
            entry.last_used_at = now;
        }
        true
    }

    /// Walks the normalized prefix from the root. `None` as soon as a character is missing.
    pub fn locate(&self, prefix: &str) -> Option<NodeId> {
        let mut node_idx = ROOT;
        for ch in normalize(prefix).chars() {
            node_idx = *self.nodes[node_idx].children.get(&ch)?;
        }
        Some(node_idx)
    }

    /// Every stored sentence under `node_idx`, the node itself included.
    /// Order is unspecified; callers rank the result themselves.
    pub fn collect(&self, node_idx: NodeId) -> Vec<Candidate> {
        let mut found = Vec::new();
        if node_idx >= self.nodes.len() {
            return found;
        }
        let mut stack = vec![node_idx];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if let Some(entry) = &node.entry {
                found.push(to_candidate(entry));
            }
            stack.extend(node.children.values().copied());
        }
        found
    }

    /// All stored sentences whose key starts with the normalized prefix.
    pub fn lookup_by_prefix(&self, prefix: &str) -> Vec<Candidate> {
        match self.locate(prefix) {
            Some(node_idx) => self.collect(node_idx),
            None => Vec::new(),
        }
    }

    /// Exact lookup of the entry owning the normalized key of `sentence`.
    pub fn get(&self, sentence: &str) -> Option<Candidate> {
        let node_idx = self.locate(sentence.trim())?;
        self.nodes[node_idx].entry.as_ref().map(to_candidate)
    }

    pub fn entries(&self) -> Vec<Candidate> {
        self.collect(ROOT)
    }

    /// Structural check for tries that did not come from `new` + `insert`,
    /// i.e. anything deserialized. Every other method assumes this holds.
    ///
    /// The root exists and owns no entry, every child index is in bounds and
    /// has exactly one parent, every node is reachable from the root, each
    /// entry has `frequency >= 1` and a timestamp no later than the clock, and
    /// `entry_count` matches.
    pub fn validate(&self) -> Result<(), String> {
        let Some(root) = self.nodes.first() else {
            return Err("node arena is empty".to_string());
        };
        if root.entry.is_some() {
            return Err("root node holds an entry".to_string());
        }

        let mut parents = vec![0usize; self.nodes.len()];
        let mut entries = 0;
        for (idx, node) in self.nodes.iter().enumerate() {
            for &child in node.children.values() {
                if child == ROOT || child >= self.nodes.len() {
                    return Err(format!("node {idx} has invalid child {child}"));
                }
                parents[child] += 1;
                if parents[child] > 1 {
                    return Err(format!("node {child} has more than one parent"));
                }
            }
            if let Some(entry) = &node.entry {
                if entry.frequency == 0 {
                    return Err(format!("entry at node {idx} has zero frequency"));
                }
                if entry.last_used_at > self.last_tick {
                    return Err(format!("entry at node {idx} is newer than the clock"));
                }
                entries += 1;
            }
        }
        if entries != self.entry_count {
            return Err(format!("entry_count is {} but {} entries exist", self.entry_count, entries));
        }

        // One parent each still allows a detached cycle; it would be unreachable.
        let mut reached = 0;
        let mut stack = vec![ROOT];
        while let Some(idx) = stack.pop() {
            reached += 1;
            stack.extend(self.nodes[idx].children.values().copied());
        }
        if reached != self.nodes.len() {
            return Err(format!("{} nodes are unreachable from the root", self.nodes.len() - reached));
        }
        Ok(())
    }

    fn tick(&mut self) -> Timestamp {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Timestamp)
            .unwrap_or(0);
        self.last_tick = now.max(self.last_tick + 1);
        self.last_tick
    }
}

fn to_candidate(entry: &Entry) -> Candidate {
    Candidate {
        text: entry.text.clone(),
        frequency: entry.frequency,
        last_used_at: entry.last_used_at,
        distance: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(mut candidates: Vec<Candidate>) -> Vec<String> {
        candidates.sort_by(|a, b| a.text.cmp(&b.text));
        candidates.into_iter().map(|c| c.text).collect()
    }

    #[test]
    fn insert_then_lookup_keeps_original_text() {
        let mut trie = PrefixTrie::new();
        assert!(trie.insert("The quick brown fox."));

        let hits = trie.lookup_by_prefix("the quick");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "The quick brown fox.");
        assert_eq!(hits[0].frequency, 1);
        assert_eq!(hits[0].distance, 0);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut trie = PrefixTrie::new();
        trie.insert("The quick brown fox.");
        trie.insert("The quiet night.");

        assert_eq!(texts(trie.lookup_by_prefix("THE QUI")), texts(trie.lookup_by_prefix("the qui")));
        assert_eq!(trie.locate("THE QUI"), trie.locate("the qui"));
    }

    #[test]
    fn spaces_are_part_of_the_key() {
        let mut trie = PrefixTrie::new();
        trie.insert("to be");
        trie.insert("tobe");

        assert_eq!(texts(trie.lookup_by_prefix("to ")), vec!["to be"]);
        assert_eq!(texts(trie.lookup_by_prefix("tob")), vec!["tobe"]);
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn repeated_insert_accumulates_frequency_without_new_nodes() {
        let mut trie = PrefixTrie::new();
        trie.insert("hello world");
        let nodes = trie.node_count();
        trie.insert("  hello world ");

        assert_eq!(trie.node_count(), nodes);
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.total_insertions(), 2);
        assert_eq!(trie.get("hello world").map(|c| c.frequency), Some(2));
    }

    #[test]
    fn reinsert_with_new_casing_replaces_display_text() {
        let mut trie = PrefixTrie::new();
        trie.insert("hello world");
        trie.insert("Hello World");

        let entry = trie.get("hello world").unwrap();
        assert_eq!(entry.text, "Hello World");
        assert_eq!(entry.frequency, 2);
    }

    #[test]
    fn blank_insert_is_rejected() {
        let mut trie = PrefixTrie::new();
        assert!(!trie.insert(""));
        assert!(!trie.insert("   \t"));
        assert_eq!(trie.total_insertions(), 0);
        assert_eq!(trie.node_count(), 1);
        assert!(trie.entries().is_empty());
    }

    #[test]
    fn selection_bumps_frequency_and_recency() {
        let mut trie = PrefixTrie::new();
        trie.insert("Good morning!");
        let before = trie.get("Good morning!").unwrap();
        let nodes = trie.node_count();

        assert!(trie.record_selection("Good morning!"));
        let after = trie.get("Good morning!").unwrap();
        assert_eq!(after.frequency, 2);
        assert!(after.last_used_at > before.last_used_at);
        assert_eq!(trie.node_count(), nodes);
        assert_eq!(trie.total_insertions(), 1);
    }

    #[test]
    fn selection_with_colliding_key_is_ignored() {
        let mut trie = PrefixTrie::new();
        trie.insert("Good morning!");

        assert!(!trie.record_selection("good morning!"));
        assert!(!trie.record_selection("Good morning"));
        assert!(!trie.record_selection("never stored"));
        assert_eq!(trie.get("Good morning!").unwrap().frequency, 1);
    }

    #[test]
    fn missing_prefix_returns_empty() {
        let mut trie = PrefixTrie::new();
        trie.insert("alpha");
        assert!(trie.lookup_by_prefix("zzz").is_empty());
        assert!(trie.locate("zzz").is_none());
    }

    #[test]
    fn empty_prefix_collects_everything() {
        let mut trie = PrefixTrie::new();
        trie.insert("a");
        trie.insert("ab");
        trie.insert("b");
        assert_eq!(texts(trie.lookup_by_prefix("")), vec!["a", "ab", "b"]);
    }

    #[test]
    fn timestamps_strictly_increase() {
        let mut trie = PrefixTrie::new();
        trie.insert("one");
        trie.insert("two");
        let one = trie.get("one").unwrap();
        let two = trie.get("two").unwrap();
        assert!(two.last_used_at > one.last_used_at);
    }

    #[test]
    fn deep_keys_do_not_overflow_the_stack() {
        let mut trie = PrefixTrie::new();
        let long = "a".repeat(50_000);
        trie.insert(&long);
        assert_eq!(trie.lookup_by_prefix("a").len(), 1);
    }

    #[test]
    fn built_tries_validate() {
        let mut trie = PrefixTrie::new();
        assert!(trie.validate().is_ok());
        trie.insert("one two");
        trie.insert("one three");
        trie.record_selection("one two");
        assert!(trie.validate().is_ok());
    }
}
