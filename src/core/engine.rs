use crate::config::AutocompleteConfig;
use crate::core::trie::{normalize, PrefixTrie};
use crate::core::types::{Candidate, NodeId};
use crate::error::{Error, Result};
use crate::fuzzy::{distance::distance, variations::variations};
use crate::persistence::{load_from_disk, quarantine, save_to_disk};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Typo-tolerant sentence completion on top of a [`PrefixTrie`].
///
/// Holds no global state; hosts that share one instance across threads must
/// wrap it in a lock, since `insert` restructures the trie.
pub struct FuzzyAutocomplete {
    trie: PrefixTrie,
    max_edit_distance: usize,
    default_limit: usize,
    dictionary_path: Option<PathBuf>,
}

impl Default for FuzzyAutocomplete {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyAutocomplete {
    pub fn new() -> Self {
        Self::with_config(&AutocompleteConfig::default())
    }

    pub fn with_config(config: &AutocompleteConfig) -> Self {
        Self::from_trie(PrefixTrie::new(), config)
    }

    pub fn from_trie(trie: PrefixTrie, config: &AutocompleteConfig) -> Self {
        let config = config.clone().clamped();
        Self {
            trie,
            max_edit_distance: config.max_edit_distance,
            default_limit: config.default_limit,
            dictionary_path: None,
        }
    }

    /// Opens the dictionary at `path`, starting empty if it is missing or unreadable.
    /// `save_dictionary` writes back to the same path.
    ///
    /// An unreadable file is moved aside first. If that fails the engine runs
    /// without a save path rather than overwrite it.
    pub fn from_file_or_new(path: &Path, config: &AutocompleteConfig) -> Self {
        let (trie, dictionary_path) = match load_from_disk(path) {
            Ok(trie) => (trie, Some(path.to_path_buf())),
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                log::info!("no dictionary at {}, starting empty", path.display());
                (PrefixTrie::new(), Some(path.to_path_buf()))
            }
            Err(e) => {
                log::warn!("starting with an empty dictionary, could not load {}: {}", path.display(), e);
                match quarantine(path) {
                    Ok(_) => (PrefixTrie::new(), Some(path.to_path_buf())),
                    Err(e) => {
                        log::warn!("could not move {} aside, saving disabled: {}", path.display(), e);
                        (PrefixTrie::new(), None)
                    }
                }
            }
        };
        let mut engine = Self::from_trie(trie, config);
        engine.dictionary_path = dictionary_path;
        engine
    }

    pub fn save_dictionary(&self) -> Result<()> {
        if let Some(path) = &self.dictionary_path {
            save_to_disk(&self.trie, path)
        } else {
            Ok(()) // Don't error if no path is set
        }
    }

    pub fn trie(&self) -> &PrefixTrie {
        &self.trie
    }

    /// Swaps in another dictionary, e.g. one just deserialized. Returns the old one.
    pub fn replace_trie(&mut self, trie: PrefixTrie) -> PrefixTrie {
        std::mem::replace(&mut self.trie, trie)
    }

    pub fn max_edit_distance(&self) -> usize {
        self.max_edit_distance
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Returns whether the sentence was non-blank and therefore stored.
    pub fn insert(&mut self, sentence: &str) -> bool {
        self.trie.insert(sentence)
    }

    pub fn record_selection(&mut self, sentence: &str) -> bool {
        self.trie.record_selection(sentence)
    }

    pub fn autocomplete_default(&self, query: &str) -> Vec<Candidate> {
        self.autocomplete(query, self.default_limit)
    }

    /// Ranked completions for a possibly misspelled prefix.
    ///
    /// Every variation of the query within the configured edit distance is
    /// used as a trie probe. A hit's `distance` is the cost of the probe that
    /// found it, not its distance to the stored text. Results are ordered by
    /// frequency (desc), distance (asc), recency (desc), then text.
    ///
    /// Cost is dominated by variation generation; see
    /// [`variations`](crate::fuzzy::variations::variations).
    pub fn autocomplete(&self, query: &str, limit: usize) -> Vec<Candidate> {
        if query.is_empty() || limit == 0 {
            return vec![];
        }
        let query = normalize(query);

        // 1. Probe the trie with every variation, keeping the cheapest probe per node.
        let probes = variations(&query, self.max_edit_distance);
        let mut reached: HashMap<NodeId, usize> = HashMap::new();
        for probe in &probes {
            if let Some(node_idx) = self.trie.locate(probe) {
                let cost = distance(&query, probe);
                reached
                    .entry(node_idx)
                    .and_modify(|best| *best = (*best).min(cost))
                    .or_insert(cost);
            }
        }
        log::debug!("{:?}: {} probes, {} trie nodes reached", query, probes.len(), reached.len());

        // 2. MERGE hits by text; overlapping subtrees report the same entry more than once.
        let mut merged: HashMap<String, Candidate> = HashMap::new();
        for (node_idx, cost) in reached {
            for mut candidate in self.trie.collect(node_idx) {
                candidate.distance = cost;
                match merged.get_mut(&candidate.text) {
                    Some(existing) => {
                        if prefer(&candidate, existing) {
                            *existing = candidate;
                        }
                    }
                    None => {
                        merged.insert(candidate.text.clone(), candidate);
                    }
                }
            }
        }

        // 3. Rank and return the top `limit`.
        let mut ranked: Vec<Candidate> = merged.into_values().collect();
        ranked.sort_by(rank);
        ranked.truncate(limit);
        ranked
    }
}

/// Whether `new` should replace `old` for the same text: higher frequency
/// wins, then the cheaper probe.
fn prefer(new: &Candidate, old: &Candidate) -> bool {
    new.frequency > old.frequency || (new.frequency == old.frequency && new.distance < old.distance)
}

fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.frequency
        .cmp(&a.frequency)
        .then(a.distance.cmp(&b.distance))
        .then(b.last_used_at.cmp(&a.last_used_at))
        .then_with(|| a.text.cmp(&b.text))
}
