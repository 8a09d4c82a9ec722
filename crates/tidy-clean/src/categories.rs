//! Case and label canonicalization for categorical text columns.
//!
//! Only text cells are rewritten, so numeric and boolean cells keep their
//! type.

use std::collections::HashMap;

use rapidfuzz::distance::levenshtein;
use tidy_model::{CaseMethod, CellValue, Dataset};
use tidy_quality::is_typo_pair;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::standardize::map_present;

const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("male", "Male"),
    ("m", "Male"),
    ("man", "Male"),
    ("female", "Female"),
    ("f", "Female"),
    ("woman", "Female"),
    ("yes", "Yes"),
    ("y", "Yes"),
    ("no", "No"),
    ("n", "No"),
    ("unknown", "Unknown"),
    ("na", "Unknown"),
    ("n/a", "Unknown"),
];

const COUNTRIES: &[&str] = &[
    "India",
    "United States",
    "United Kingdom",
    "Canada",
    "Australia",
    "Germany",
    "France",
    "Spain",
    "Italy",
];

const GENDERS: &[&str] = &["Male", "Female", "Other", "Unknown"];

/// Known label set selected by column-name keywords.
struct ReferenceList {
    keywords: &'static [&'static str],
    /// Alphanumeric keys mapped straight to a label.
    aliases: &'static [(&'static str, &'static str)],
    labels: &'static [&'static str],
}

const REFERENCE_LISTS: &[ReferenceList] = &[
    ReferenceList {
        keywords: &["gender", "sex"],
        aliases: &[("m", "Male"), ("male", "Male"), ("f", "Female"), ("female", "Female")],
        labels: GENDERS,
    },
    ReferenceList {
        keywords: &["country", "nation", "location"],
        aliases: &[
            ("us", "United States"),
            ("usa", "United States"),
            ("unitedstates", "United States"),
            ("uk", "United Kingdom"),
            ("india", "India"),
            ("bharat", "India"),
            ("ind", "India"),
        ],
        labels: COUNTRIES,
    },
];

/// Rewrites text cells in lower, upper or title case.
pub fn normalize_case(dataset: &mut Dataset, column: &str, method: CaseMethod) {
    map_text(dataset, column, |text| match method {
        CaseMethod::Lower => text.to_lowercase(),
        CaseMethod::Upper => text.to_uppercase(),
        CaseMethod::Title => title_case(text),
    });
}

/// Maps common aliases (`m`, `y`, `n/a`, ...) to one label and capitalizes
/// everything else.
pub fn normalize_categories(dataset: &mut Dataset, column: &str) {
    map_text(dataset, column, |text| {
        let key = text.trim().to_lowercase();
        CATEGORY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map_or_else(|| capitalize(text.trim()), |(_, label)| (*label).to_string())
    });
}

/// Trims and title-cases every text cell.
pub fn fix_capitalization_inconsistency(dataset: &mut Dataset, column: &str) {
    map_text(dataset, column, |text| title_case(text.trim()));
}

/// Snaps misspelt labels to a known or dominant spelling.
///
/// Resolution order: keyword-scoped aliases and reference lists (genders
/// for `gender` columns, countries for `country` columns), the combined
/// reference lists, then the most frequent label of the column itself
/// within typo distance. Anything left is capitalized.
pub fn fix_typos_and_mislabels(dataset: &mut Dataset, column: &str) {
    let lowered = column.to_lowercase();
    let scoped: Vec<&ReferenceList> = REFERENCE_LISTS
        .iter()
        .filter(|list| list.keywords.iter().any(|kw| lowered.contains(kw)))
        .collect();
    let combined: Vec<&str> = COUNTRIES.iter().chain(GENDERS).copied().collect();
    let frequent = LabelFrequencies::from_column(dataset, column);

    map_text(dataset, column, |text| {
        let trimmed = text.trim();
        let key = keyify(trimmed);
        for list in &scoped {
            if let Some((_, label)) = list.aliases.iter().find(|(alias, _)| *alias == key) {
                return (*label).to_string();
            }
            if let Some(label) = closest(&key, list.labels) {
                return label.to_string();
            }
        }
        if let Some(label) = closest(&key, &combined) {
            return label.to_string();
        }
        let snapped = frequent.snap(trimmed).unwrap_or(trimmed);
        capitalize(snapped)
    });
}

fn map_text(dataset: &mut Dataset, column: &str, f: impl Fn(&str) -> String) {
    map_present(dataset, column, |cell| match cell {
        CellValue::Text(text) => Some(CellValue::Text(f(text))),
        _ => None,
    });
}

/// Upper-cases the first letter of every word and lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = c != '\'';
        }
    }
    out
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Accent-free lower-case alphanumeric key: `"Côte d'Ivoire"` gives
/// `"cotedivoire"`.
fn keyify(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Nearest label whose key is within half the longer key's length.
fn closest<'a>(key: &str, labels: &[&'a str]) -> Option<&'a str> {
    if key.is_empty() {
        return None;
    }
    let (label, distance, label_len) = labels
        .iter()
        .map(|label| {
            let label_key = keyify(label);
            let distance = levenshtein::distance(key.chars(), label_key.chars());
            (*label, distance, label_key.len())
        })
        .min_by_key(|(_, distance, _)| *distance)?;
    let longer = key.len().max(label_len).max(1);
    (distance <= longer.div_ceil(2)).then_some(label)
}

/// Case-folded label counts of one column, remembering the first spelling
/// seen for each label.
struct LabelFrequencies {
    /// `(folded, first spelling, count)` in first-seen order.
    labels: Vec<(String, String, usize)>,
}

impl LabelFrequencies {
    fn from_column(dataset: &Dataset, column: &str) -> Self {
        let mut labels: Vec<(String, String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for text in dataset.column_values(column).filter_map(CellValue::as_str) {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            let folded = trimmed.to_lowercase();
            match index.get(&folded) {
                Some(&i) => labels[i].2 += 1,
                None => {
                    index.insert(folded.clone(), labels.len());
                    labels.push((folded, trimmed.to_string(), 1));
                }
            }
        }
        Self { labels }
    }

    /// Spelling of the most frequent label within typo distance of `text`,
    /// when that label is strictly more frequent than `text` itself.
    ///
    /// The edit distance must also be at most half the longer label, so
    /// short codes like `SF` are never rewritten to `NY`.
    fn snap(&self, text: &str) -> Option<&str> {
        let folded = text.to_lowercase();
        let own = self
            .labels
            .iter()
            .find(|(label, _, _)| *label == folded)
            .map_or(0, |(_, _, count)| *count);
        let mut best: Option<(&str, usize)> = None;
        for (label, spelling, count) in &self.labels {
            if *count <= own || !is_typo_pair(&folded, label) || !within_half(&folded, label) {
                continue;
            }
            if best.is_none_or(|(_, best_count)| *count > best_count) {
                best = Some((spelling.as_str(), *count));
            }
        }
        best.map(|(spelling, _)| spelling)
    }
}

fn within_half(a: &str, b: &str) -> bool {
    let distance = levenshtein::distance(a.chars(), b.chars());
    let longer = a.chars().count().max(b.chars().count());
    distance * 2 <= longer
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_model::Row;

    fn column(name: &str, values: &[&str]) -> Dataset {
        Dataset::from_rows(values.iter().map(|v| Row::new().with(name, *v)).collect())
    }

    fn texts(dataset: &Dataset, name: &str) -> Vec<String> {
        dataset
            .column_values(name)
            .map(|v| v.as_text().into_owned())
            .collect()
    }

    #[test]
    fn case_methods() {
        let mut data = column("x", &["hello WORLD", "o'neil smith"]);
        normalize_case(&mut data, "x", CaseMethod::Title);
        assert_eq!(texts(&data, "x"), ["Hello World", "O'neil Smith"]);
        normalize_case(&mut data, "x", CaseMethod::Upper);
        assert_eq!(texts(&data, "x"), ["HELLO WORLD", "O'NEIL SMITH"]);
    }

    #[test]
    fn case_leaves_numbers_alone() {
        let mut data = Dataset::from_rows(vec![Row::new().with("x", 3.0)]);
        normalize_case(&mut data, "x", CaseMethod::Lower);
        assert_eq!(data.rows[0].get("x"), &CellValue::Number(3.0));
    }

    #[test]
    fn category_aliases() {
        let mut data = column("answer", &["y", "N", " n/a ", "maybe SO", "Woman"]);
        normalize_categories(&mut data, "answer");
        assert_eq!(texts(&data, "answer"), ["Yes", "No", "Unknown", "Maybe so", "Female"]);
    }

    #[test]
    fn capitalization_is_unified() {
        let mut data = column("city", &[" new york", "NEW YORK", "New york "]);
        fix_capitalization_inconsistency(&mut data, "city");
        assert_eq!(texts(&data, "city"), ["New York"; 3]);
    }

    #[test]
    fn countries_snap_to_reference() {
        let mut data = column("country", &["Indai", "usa", "Germny", "Frnace", "Brasil"]);
        fix_typos_and_mislabels(&mut data, "country");
        assert_eq!(
            texts(&data, "country"),
            ["India", "United States", "Germany", "France", "Brasil"]
        );
    }

    #[test]
    fn genders_use_aliases() {
        let mut data = column("gender", &["m", "F", "femal", "Othr"]);
        fix_typos_and_mislabels(&mut data, "gender");
        assert_eq!(texts(&data, "gender"), ["Male", "Female", "Female", "Other"]);
    }

    #[test]
    fn short_codes_keep_their_spelling() {
        let mut data = column("city", &["NY", "LA", "NY", "LA", "SF"]);
        fix_typos_and_mislabels(&mut data, "city");
        assert_eq!(texts(&data, "city"), ["Ny", "La", "Ny", "La", "Sf"]);
    }

    #[test]
    fn rare_spellings_snap_to_dominant_label() {
        let mut data = column("team", &["Platform", "Platform", "Platfrom", "Data", "Design"]);
        fix_typos_and_mislabels(&mut data, "team");
        assert_eq!(
            texts(&data, "team"),
            ["Platform", "Platform", "Platform", "Data", "Design"]
        );
    }

    #[test]
    fn keys_drop_accents_and_punctuation() {
        assert_eq!(keyify("Côte d'Ivoire"), "cotedivoire");
        assert_eq!(closest("germny", COUNTRIES), Some("Germany"));
        assert_eq!(closest("zz", COUNTRIES), None);
    }
}
