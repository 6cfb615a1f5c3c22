//! Name similarity for picking the best search result.

/// Similarity in `[0.0, 1.0]` between two names, case-insensitive.
///
/// Dice coefficient over character bigrams. Short strings (under two
/// characters) only match exactly.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }

    let a_bigrams = bigrams(&a);
    let b_bigrams = bigrams(&b);
    if a_bigrams.is_empty() || b_bigrams.is_empty() {
        return 0.0;
    }

    let mut remaining = b_bigrams.clone();
    let mut overlap = 0usize;
    for bigram in &a_bigrams {
        if let Some(pos) = remaining.iter().position(|other| other == bigram) {
            remaining.swap_remove(pos);
            overlap += 1;
        }
    }

    (2.0 * overlap as f64) / (a_bigrams.len() + b_bigrams.len()) as f64
}

fn bigrams(s: &str) -> Vec<[char; 2]> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).map(|w| [w[0], w[1]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_names() {
        assert_eq!(similarity("Halo", "Halo"), 1.0);
        assert_eq!(similarity("Halo", "HALO"), 1.0);
    }

    #[test]
    fn test_disjoint_names() {
        assert_eq!(similarity("Halo", "Zuma"), 0.0);
    }

    #[test]
    fn test_close_names_pass_threshold() {
        assert!(similarity("God of War", "God of War\u{2122}") >= 0.7);
        assert!(similarity("Rocket League", "Rocket League\u{ae}") >= 0.7);
    }

    #[test]
    fn test_distant_names_fail_threshold() {
        assert!(similarity("Doom", "Doom Eternal") < 0.7);
        assert!(similarity("Portal", "Mortal Kombat") < 0.7);
    }

    #[test]
    fn test_short_strings() {
        assert_eq!(similarity("a", "a"), 1.0);
        assert_eq!(similarity("a", "b"), 0.0);
    }
}
