// File: src/fuzzy/distance.rs

/// Levenshtein distance with unit costs for insertion, deletion and substitution.
///
/// Works on `char`s, not bytes, and keeps two rows of the
/// `(len(a)+1) x (len(b)+1)` table instead of the whole matrix.
/// O(len(a) * len(b)) time.
pub fn distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1) // deletion
                .min(curr_row[j] + 1) // insertion
                .min(prev_row[j] + cost); // substitution
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_chars.len()]
}

/// Case-insensitive distance scaled by the longer input length.
///
/// Despite the name this is a dissimilarity: `0.0` means identical and lower
/// sorts first. Two empty strings score `0.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    // Measured after lowercasing; a few characters change length when folded.
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    distance(&a, &b) as f64 / longest as f64
}

/// `true` when `a` and `b` are at most `max` edits apart.
pub fn within(a: &str, b: &str, max: usize) -> bool {
    let (la, lb) = (a.chars().count(), b.chars().count());
    if la.abs_diff(lb) > max {
        return false;
    }
    distance(a, b) <= max
}
