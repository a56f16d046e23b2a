// File: src/fuzzy/variations.rs
use std::collections::HashSet;

/// Characters used for substitutions and insertions.
pub const ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    ' ',
];

/// Generates every string reachable from `word` by up to `max_distance`
/// single-character edits (deletion, adjacent transposition, substitution,
/// insertion). The word itself is always included.
///
/// The result grows roughly as `(75 * len)^max_distance`. Callers must keep
/// `max_distance` small (1 or 2 in practice) and bound the query length;
/// nothing here guards against the blow-up.
pub fn variations(word: &str, max_distance: usize) -> HashSet<String> {
    let mut edits = HashSet::new();
    edits.insert(word.to_string()); // Distance 0

    // Only strings first seen in the previous round need expanding; anything
    // older has already contributed its one-edit neighbours.
    let mut current_edits: Vec<String> = vec![word.to_string()];

    for _ in 0..max_distance {
        let mut next_edits = Vec::new();
        for edit in &current_edits {
            for variant in single_edits(edit) {
                if edits.insert(variant.clone()) {
                    next_edits.push(variant);
                }
            }
        }
        if next_edits.is_empty() {
            break;
        }
        current_edits = next_edits;
    }

    edits
}

/// All strings exactly one primitive edit away from `word`.
fn single_edits(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut out = Vec::with_capacity(n * 2 + (2 * n + 1) * ALPHABET.len());

    for i in 0..n {
        let mut deleted = chars.clone();
        deleted.remove(i);
        out.push(deleted.into_iter().collect());
    }

    for i in 0..n.saturating_sub(1) {
        let mut swapped = chars.clone();
        swapped.swap(i, i + 1);
        out.push(swapped.into_iter().collect());
    }

    for i in 0..n {
        for &c in ALPHABET {
            if chars[i] != c {
                let mut replaced = chars.clone();
                replaced[i] = c;
                out.push(replaced.into_iter().collect());
            }
        }
    }

    for i in 0..=n {
        for &c in ALPHABET {
            let mut inserted = chars.clone();
            inserted.insert(i, c);
            out.push(inserted.into_iter().collect());
        }
    }

    out
}
