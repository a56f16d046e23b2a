// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod fuzzy;
pub mod ingest;
pub mod persistence;

pub use crate::config::AutocompleteConfig;
pub use crate::core::engine::FuzzyAutocomplete;
pub use crate::core::trie::PrefixTrie;
pub use crate::core::types::Candidate;
pub use crate::error::Error;
