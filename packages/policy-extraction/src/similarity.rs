//! Text similarity for the append gate.

use std::collections::HashMap;

/// Similarity ratio between two strings in `[0.0, 1.0]`.
///
/// Sørensen–Dice coefficient over character bigrams: cheap,
/// deterministic, and order-insensitive enough to catch the repeated
/// cookie-banner/boilerplate case without an alignment pass.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_bigrams = bigram_counts(a);
    let b_bigrams = bigram_counts(b);

    let a_total: usize = a_bigrams.values().sum();
    let b_total: usize = b_bigrams.values().sum();
    if a_total + b_total == 0 {
        // Both single-character inputs
        return if a == b { 1.0 } else { 0.0 };
    }

    let overlap: usize = a_bigrams
        .iter()
        .filter_map(|(bigram, count)| b_bigrams.get(bigram).map(|other| count.min(other)))
        .sum();

    (2.0 * overlap as f64) / (a_total + b_total) as f64
}

fn bigram_counts(s: &str) -> HashMap<(char, char), usize> {
    let chars: Vec<char> = s.chars().collect();
    let mut counts = HashMap::new();
    for window in chars.windows(2) {
        *counts.entry((window[0], window[1])).or_insert(0) += 1;
    }
    counts
}
