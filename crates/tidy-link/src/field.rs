//! Field similarity scoring.
//!
//! The comparison used for a mapped column pair is picked from the column
//! names through an ordered keyword rule table: the first rule matching
//! the A-side name wins, then the B-side name is tried, then the pair
//! falls back to [`FieldKind::Other`].

use tidy_common::{column_tokens, extract_domain, normalize};
use tidy_model::{FieldPair, MatchMode};

use crate::similarity::{cosine, jaccard, levenshtein_ratio, name_blend, token_sort_ratio};

/// Comparison family of a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Email,
    Phone,
    Identifier,
    Name,
    Address,
    Geo,
    Other,
}

struct FieldRule {
    kind: FieldKind,
    /// Whole column-name words.
    keywords: &'static [&'static str],
    /// Substrings of the joined name, for run-together names like `fullname`.
    fragments: &'static [&'static str],
}

const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        kind: FieldKind::Email,
        keywords: &["email", "mail"],
        fragments: &["email"],
    },
    FieldRule {
        kind: FieldKind::Phone,
        keywords: &["phone", "mobile", "tel", "telephone", "cell", "fax"],
        fragments: &["phone", "mobile"],
    },
    FieldRule {
        kind: FieldKind::Identifier,
        keywords: &[
            "id", "uuid", "guid", "ssn", "code", "no", "num", "number", "account", "acct", "ref",
        ],
        fragments: &["uuid", "number"],
    },
    FieldRule {
        kind: FieldKind::Name,
        keywords: &[
            "name", "first", "last", "surname", "given", "middle", "fname", "lname",
        ],
        fragments: &["name"],
    },
    FieldRule {
        kind: FieldKind::Address,
        keywords: &["address", "addr", "street", "road", "line"],
        fragments: &["address", "street"],
    },
    FieldRule {
        kind: FieldKind::Geo,
        keywords: &[
            "city", "state", "country", "zip", "postcode", "postal", "region", "province", "county",
        ],
        fragments: &["country", "postcode", "city"],
    },
];

impl FieldRule {
    fn matches(&self, tokens: &[String], joined: &str) -> bool {
        tokens
            .iter()
            .any(|token| self.keywords.contains(&token.as_str()))
            || self.fragments.iter().any(|fragment| joined.contains(fragment))
    }
}

impl FieldKind {
    /// Kind suggested by a single column name.
    pub fn from_column(name: &str) -> Self {
        let tokens = column_tokens(name);
        let joined = tokens.concat();
        FIELD_RULES
            .iter()
            .find(|rule| rule.matches(&tokens, &joined))
            .map_or(Self::Other, |rule| rule.kind)
    }

    /// Kind of a mapped pair: the A-side name first, then the B-side name.
    pub fn for_pair(left: &str, right: &str) -> Self {
        match Self::from_column(left) {
            Self::Other => Self::from_column(right),
            kind => kind,
        }
    }

    /// Importance of the field in the row score.
    pub fn weight(self) -> f64 {
        match self {
            Self::Email => 5.0,
            Self::Identifier => 4.0,
            Self::Phone => 3.0,
            Self::Name => 2.0,
            Self::Address => 1.5,
            Self::Geo | Self::Other => 1.0,
        }
    }

    /// Whether the blocking indexer buckets on this field.
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Name | Self::Email)
    }

    /// Similarity of two non-empty raw values.
    pub fn score(self, a: &str, b: &str, mode: MatchMode) -> f64 {
        match self {
            Self::Email => email_score(a, b),
            Self::Phone | Self::Identifier => identifier_score(a, b),
            Self::Name => name_blend(a, b),
            Self::Address | Self::Geo => cosine(a, b)
                .max(token_sort_ratio(a, b))
                .max(name_blend(a, b)),
            Self::Other => match mode {
                MatchMode::Strict => levenshtein_ratio(&normalize(a), &normalize(b)),
                MatchMode::Advanced => name_blend(a, b),
                MatchMode::Basic => jaccard(a, b),
            },
        }
    }
}

fn email_score(a: &str, b: &str) -> f64 {
    let (left, right) = (normalize(a), normalize(b));
    if left == right {
        return 1.0;
    }
    let domain = extract_domain(a);
    if !domain.is_empty() && domain == extract_domain(b) {
        return 0.9;
    }
    name_blend(&left, &right)
}

/// Digit strings are compared when both sides carry digits; otherwise the
/// normalized values are.
fn identifier_score(a: &str, b: &str) -> f64 {
    let digits = |value: &str| -> String { value.chars().filter(char::is_ascii_digit).collect() };
    let (mut left, mut right) = (digits(a), digits(b));
    if left.is_empty() || right.is_empty() {
        left = normalize(a);
        right = normalize(b);
    }
    if left == right {
        1.0
    } else {
        levenshtein_ratio(&left, &right)
    }
}

/// A mapping entry resolved against both datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedField {
    pub left: String,
    pub right: String,
    pub kind: FieldKind,
    pub weight: f64,
}

impl MappedField {
    pub fn new(pair: &FieldPair) -> Self {
        let kind = FieldKind::for_pair(&pair.left, &pair.right);
        Self {
            left: pair.left.clone(),
            right: pair.right.clone(),
            kind,
            weight: kind.weight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_pick_the_first_matching_rule() {
        assert_eq!(FieldKind::from_column("Email Address"), FieldKind::Email);
        assert_eq!(FieldKind::from_column("E-mail"), FieldKind::Email);
        assert_eq!(FieldKind::from_column("phone_number"), FieldKind::Phone);
        assert_eq!(FieldKind::from_column("customerId"), FieldKind::Identifier);
        assert_eq!(FieldKind::from_column("FullName"), FieldKind::Name);
        assert_eq!(FieldKind::from_column("fullname"), FieldKind::Name);
        assert_eq!(FieldKind::from_column("Street Address"), FieldKind::Address);
        assert_eq!(FieldKind::from_column("Country"), FieldKind::Geo);
        assert_eq!(FieldKind::from_column("valid"), FieldKind::Other);
        assert_eq!(FieldKind::from_column("notes"), FieldKind::Other);
    }

    #[test]
    fn pair_kind_falls_back_to_the_right_name() {
        assert_eq!(FieldKind::for_pair("col1", "contact_email"), FieldKind::Email);
        assert_eq!(FieldKind::for_pair("name", "col2"), FieldKind::Name);
    }

    #[test]
    fn weights_rank_identifying_fields_higher() {
        assert!(FieldKind::Email.weight() > FieldKind::Name.weight());
        assert!(FieldKind::Identifier.weight() > FieldKind::Phone.weight());
        assert!(FieldKind::Address.weight() > FieldKind::Other.weight());
    }

    #[test]
    fn emails_score_exact_then_domain() {
        let email = FieldKind::Email;
        assert_eq!(email.score("JS@x.com", "js@x.com ", MatchMode::Advanced), 1.0);
        assert_eq!(email.score("js@x.com", "john@x.com", MatchMode::Advanced), 0.9);
        assert!(email.score("js@x.com", "zz@y.org", MatchMode::Advanced) < 0.9);
    }

    #[test]
    fn phones_compare_digits_only() {
        let phone = FieldKind::Phone;
        assert_eq!(
            phone.score("(555) 123-4567", "555.123.4567", MatchMode::Strict),
            1.0
        );
        let near = phone.score("5551234567", "5551234568", MatchMode::Strict);
        assert!((near - 0.9).abs() < 1e-9);
        assert_eq!(FieldKind::Identifier.score("ABC", "abc", MatchMode::Basic), 1.0);
    }

    #[test]
    fn other_fields_follow_the_mode() {
        let other = FieldKind::Other;
        assert_eq!(other.score("red blue", "blue red", MatchMode::Basic), 1.0);
        assert!(other.score("red blue", "blue red", MatchMode::Strict) < 1.0);
        assert!(other.score("red blue", "blue red", MatchMode::Advanced) > 0.99);
    }

    #[test]
    fn addresses_take_the_best_measure() {
        let score = FieldKind::Address.score(
            "12 Baker Street London",
            "London, 12 Baker Street",
            MatchMode::Advanced,
        );
        assert!(score > 0.99);
    }
}
