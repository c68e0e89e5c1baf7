use std::collections::HashSet;

/// Lower-cased whitespace-separated words of `name` and `summary`.
/// No stemming, no stopwords.
pub fn word_set(name: &str, summary: &str) -> HashSet<String> {
    let name = name.to_lowercase();
    let summary = summary.to_lowercase();
    name.split_whitespace()
        .chain(summary.split_whitespace())
        .map(str::to_string)
        .collect()
}

/// `|A ∩ B| / max(|A|, |B|)`.
///
/// The denominator is the larger set, not the union, so this is stricter
/// than a Jaccard index for sets of very different size. Two empty sets
/// score 0.
pub fn overlap_ratio(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let shared = a.intersection(b).count();
    let denom = a.len().max(b.len()).max(1);
    shared as f64 / denom as f64
}

/// Near-duplicate rule: same name, same summary (both case-insensitive), or
/// word overlap strictly above `threshold`.
pub fn is_near_duplicate(
    (a_name, a_summary): (&str, &str),
    (b_name, b_summary): (&str, &str),
    threshold: f64,
) -> bool {
    if a_name.to_lowercase() == b_name.to_lowercase() {
        return true;
    }
    if a_summary.to_lowercase() == b_summary.to_lowercase() {
        return true;
    }
    let ratio = overlap_ratio(&word_set(a_name, a_summary), &word_set(b_name, b_summary));
    ratio > threshold
}
