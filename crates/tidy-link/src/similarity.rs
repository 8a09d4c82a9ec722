//! String similarity measures.
//!
//! Every measure returns a score in `[0, 1]`. Two empty inputs are
//! identical (1.0); one empty input against a non-empty one scores 0.0.

use std::collections::{BTreeSet, HashMap};

use rapidfuzz::distance::{indel, jaro_winkler, levenshtein};
use tidy_common::{normalize, tokenize_sort};

/// Name blend weights: Jaro-Winkler, Levenshtein ratio, token-sort ratio,
/// cosine, phonetic.
const BLEND_WEIGHTS: [f64; 5] = [0.30, 0.25, 0.20, 0.15, 0.10];

fn trivial(a: &str, b: &str) -> Option<f64> {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Some(1.0),
        (false, false) => None,
        _ => Some(0.0),
    }
}

pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    if let Some(score) = trivial(a, b) {
        return score;
    }
    jaro_winkler::similarity(a.chars(), b.chars())
}

/// `1 - distance / longer length`.
pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    if let Some(score) = trivial(a, b) {
        return score;
    }
    let longest = a.chars().count().max(b.chars().count());
    let distance = levenshtein::distance(a.chars(), b.chars());
    1.0 - distance as f64 / longest as f64
}

/// Indel similarity of the token-sorted forms, so word order is ignored.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = (tokenize_sort(a), tokenize_sort(b));
    if let Some(score) = trivial(&a, &b) {
        return score;
    }
    indel::normalized_similarity(a.chars(), b.chars())
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for token in normalize(text).split(' ').filter(|t| !t.is_empty()) {
        *counts.entry(token.to_string()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity of token frequency vectors.
pub fn cosine(a: &str, b: &str) -> f64 {
    let (left, right) = (term_frequencies(a), term_frequencies(b));
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return 1.0,
        (false, false) => {}
        _ => return 0.0,
    }
    let dot: f64 = left
        .iter()
        .filter_map(|(token, x)| right.get(token).map(|y| x * y))
        .sum();
    let norm = |counts: &HashMap<String, f64>| counts.values().map(|v| v * v).sum::<f64>().sqrt();
    (dot / (norm(&left) * norm(&right))).min(1.0)
}

fn token_set(text: &str) -> BTreeSet<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn set_overlap(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return 1.0,
        (false, false) => {}
        _ => return 0.0,
    }
    let shared = left.intersection(right).count();
    let union = left.union(right).count();
    shared as f64 / union as f64
}

/// Shared tokens over all distinct tokens.
pub fn jaccard(a: &str, b: &str) -> f64 {
    set_overlap(&token_set(a), &token_set(b))
}

fn soundex_digit(c: char) -> Option<char> {
    match c {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        _ => None,
    }
}

/// American Soundex code of a word: first letter plus three digits
/// (`"Robert"` -> `"R163"`). Non-ASCII letters are ignored; a word
/// without letters has no code.
pub fn soundex(word: &str) -> String {
    let mut letters = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase());
    let Some(first) = letters.next() else {
        return String::new();
    };
    let mut code = String::with_capacity(4);
    code.push(first.to_ascii_uppercase());
    let mut previous = soundex_digit(first);
    for c in letters {
        if code.len() == 4 {
            break;
        }
        let digit = soundex_digit(c);
        if let Some(d) = digit
            && digit != previous
        {
            code.push(d);
        }
        // h and w do not separate letters with the same code
        if !matches!(c, 'h' | 'w') {
            previous = digit;
        }
    }
    while code.len() < 4 {
        code.push('0');
    }
    code
}

/// Overlap of the Soundex codes of both token sets.
pub fn phonetic(a: &str, b: &str) -> f64 {
    let codes = |text: &str| -> BTreeSet<String> {
        token_set(text)
            .iter()
            .map(|token| soundex(token))
            .filter(|code| !code.is_empty())
            .collect()
    };
    let (left, right) = (codes(a), codes(b));
    if left.is_empty() && right.is_empty() {
        return if normalize(a) == normalize(b) { 1.0 } else { 0.0 };
    }
    set_overlap(&left, &right)
}

/// Weighted blend of all measures over the token-sorted forms.
pub fn name_blend(a: &str, b: &str) -> f64 {
    let (a, b) = (tokenize_sort(a), tokenize_sort(b));
    if let Some(score) = trivial(&a, &b) {
        return score;
    }
    let scores = [
        jaro_winkler(&a, &b),
        levenshtein_ratio(&a, &b),
        token_sort_ratio(&a, &b),
        cosine(&a, &b),
        phonetic(&a, &b),
    ];
    scores
        .iter()
        .zip(BLEND_WEIGHTS)
        .map(|(score, weight)| score * weight)
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn soundex_follows_the_american_rules() {
        assert_eq!(soundex("Robert"), "R163");
        assert_eq!(soundex("Rupert"), "R163");
        assert_eq!(soundex("Ashcraft"), "A261");
        assert_eq!(soundex("Tymczak"), "T522");
        assert_eq!(soundex("Pfister"), "P236");
        assert_eq!(soundex("Lee"), "L000");
        assert_eq!(soundex("42"), "");
    }

    #[test]
    fn levenshtein_ratio_scales_by_longer_input() {
        assert!(close(levenshtein_ratio("kitten", "sitting"), 1.0 - 3.0 / 7.0));
        assert!(close(levenshtein_ratio("same", "same"), 1.0));
        assert!(close(levenshtein_ratio("", "x"), 0.0));
        assert!(close(levenshtein_ratio("", ""), 1.0));
    }

    #[test]
    fn token_measures_ignore_order() {
        assert!(close(token_sort_ratio("John Smith", "smith, john"), 1.0));
        assert!(close(cosine("a b a", "a a b"), 1.0));
        assert!(close(jaccard("a b c", "b c d"), 0.5));
        assert!(close(jaccard("a b", "c d"), 0.0));
    }

    #[test]
    fn phonetic_matches_sound_alikes() {
        assert!(close(phonetic("Robert Smith", "Rupert Smyth"), 1.0));
        assert!(close(phonetic("Robert", "Alice"), 0.0));
        assert!(close(phonetic("123", "123"), 1.0));
    }

    #[test]
    fn name_blend_is_order_insensitive_and_spelling_tolerant() {
        assert!(close(name_blend("John Smith", "Smith John"), 1.0));
        let misspelt = name_blend("Jonathan Smith", "Jonathon Smith");
        assert!(misspelt > 0.8, "{misspelt}");
        let different = name_blend("Jonathan Smith", "Maria Garcia");
        assert!(different < 0.5, "{different}");
        assert!(close(name_blend("", "Maria"), 0.0));
    }
}
