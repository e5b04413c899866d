//! Tokenization and Jaccard overlap

use std::collections::HashSet;

/// Lowercase, replace anything outside `[a-z0-9\s]` with a space, split on
/// whitespace and collapse to a set.
pub fn tokenize(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned.split_whitespace().map(String::from).collect()
}

/// `|A ∩ B| / |A ∪ B|`, or 0 when either set is empty
pub fn jaccard_sets(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|t| large.contains(*t)).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}

/// Jaccard overlap of two raw texts
pub fn jaccard(a: &str, b: &str) -> f64 {
    jaccard_sets(&tokenize(a), &tokenize(b))
}
