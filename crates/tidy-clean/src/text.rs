//! Whitespace and encoding repair for text cells.

use encoding_rs::WINDOWS_1252;
use tidy_common::{has_mojibake, is_invisible};
use tidy_model::{CellValue, Dataset};
use tracing::trace;
use unicode_normalization::UnicodeNormalization;

use crate::standardize::map_present;

/// Known double-encoded sequences and the characters they stood for.
const MOJIBAKE_REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{e2}\u{20ac}\u{2122}", "\u{2019}"),
    ("\u{e2}\u{20ac}\u{2dc}", "\u{2018}"),
    ("\u{e2}\u{20ac}\u{153}", "\""),
    ("\u{e2}\u{20ac}\u{9d}", "\""),
    ("\u{e2}\u{20ac}\u{201c}", "\u{2013}"),
    ("\u{e2}\u{20ac}\u{201d}", "\u{2014}"),
    ("\u{e2}\u{20ac}\u{a2}", "\u{2022}"),
    ("\u{e2}\u{20ac}\u{a6}", "\u{2026}"),
    ("\u{c3}\u{a9}", "\u{e9}"),
    ("\u{c3}\u{a8}", "\u{e8}"),
    ("\u{c3}\u{a2}", "\u{e2}"),
    ("\u{c3}\u{aa}", "\u{ea}"),
    ("\u{c3}\u{bc}", "\u{fc}"),
    ("\u{c3}\u{b1}", "\u{f1}"),
    ("\u{c3}\u{a3}", "\u{e3}"),
    ("\u{c3}\u{b6}", "\u{f6}"),
    ("\u{c3}\u{a4}", "\u{e4}"),
    ("\u{fffd}", ""),
];

/// Drops zero-width characters, turns every run of whitespace (unicode
/// spaces included) into a single space and trims.
pub fn remove_invisible_whitespace(dataset: &mut Dataset, column: &str) {
    map_text(dataset, column, |text| {
        text.chars()
            .filter(|c| !is_invisible(*c))
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    });
}

/// Repairs UTF-8 text that was decoded as Windows-1252, then strips
/// control characters and trims.
pub fn fix_corrupted_encoding(dataset: &mut Dataset, column: &str) {
    map_text(dataset, column, |text| {
        let repaired = if has_mojibake(text) {
            reencode(text).unwrap_or_else(|| replace_known(text))
        } else {
            text.to_string()
        };
        repaired
            .nfc()
            .filter(|c| !c.is_control())
            .collect::<String>()
            .trim()
            .to_string()
    });
}

/// Re-encodes as Windows-1252 and reads the bytes back as UTF-8.
fn reencode(text: &str) -> Option<String> {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(text);
    if unmappable {
        return None;
    }
    let decoded = String::from_utf8(bytes.into_owned()).ok()?;
    if has_mojibake(&decoded) {
        trace!(text, "round trip left artifacts");
        return None;
    }
    Some(decoded)
}

fn replace_known(text: &str) -> String {
    MOJIBAKE_REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

fn map_text(dataset: &mut Dataset, column: &str, f: impl Fn(&str) -> String) {
    map_present(dataset, column, |cell| {
        cell.as_str().map(|text| CellValue::Text(f(text)))
    });
}
