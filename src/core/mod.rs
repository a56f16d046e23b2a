pub mod engine;
pub mod trie;
pub mod types;
