// File: src/ingest.rs
use crate::core::engine::FuzzyAutocomplete;
use crate::error::Result;
use std::fs;
use std::path::Path;

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Splits raw text into trimmed, non-blank sentences ending at `.`, `!` or `?`.
/// The terminator stays with its sentence; trailing text without one is kept too.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split_inclusive(TERMINATORS)
        .map(str::trim)
        .filter(|s| !s.trim_matches(TERMINATORS).trim().is_empty())
        .collect()
}

/// Inserts every sentence of `text`. Returns how many were stored.
pub fn ingest_text(engine: &mut FuzzyAutocomplete, text: &str) -> usize {
    let inserted = split_sentences(text).into_iter().filter(|s| engine.insert(s)).count();
    log::debug!("ingested {} sentences", inserted);
    inserted
}

pub fn ingest_file(engine: &mut FuzzyAutocomplete, path: &Path) -> Result<usize> {
    let text = fs::read_to_string(path)?;
    Ok(ingest_text(engine, &text))
}
