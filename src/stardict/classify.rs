//! Heuristic script and gender classification for extracted words.

use super::models::{Gender, Script};

/// Latin-Extended diacritics used by the International Alphabet of
/// Sanskrit Transliteration (macron vowels, retroflex dots, nasals).
const IAST_DIACRITICS: &[char] = &[
    'ā', 'ī', 'ū', 'ṛ', 'ṝ', 'ḷ', 'ḹ', 'ē', 'ō', 'ṃ', 'ḥ', 'ṅ', 'ñ', 'ṭ', 'ḍ', 'ṇ', 'ś', 'ṣ',
];

// Suffix tables for the gender heuristic, checked in this order against
// the lowercased word.
const MASCULINE_SUFFIXES: &[&str] = &["ा", "a"];
const FEMININE_SUFFIXES: &[&str] = &["ी", "ī", "i"];
const NEUTER_SUFFIXES: &[&str] = &["म्", "am", "um"];

/// Classify a word's writing system and guess its grammatical gender.
///
/// Pure: the same word always yields the same result. Script rules,
/// checked in order:
/// 1. Any code point in the Devanagari block (U+0900–U+097F) ⇒ Devanagari
/// 2. Any IAST diacritic ⇒ Iast
/// 3. Otherwise ⇒ Romanized
pub fn classify(word: &str) -> (Script, Option<Gender>) {
    let script = if word.chars().any(is_devanagari) {
        Script::Devanagari
    } else if word.chars().any(|c| IAST_DIACRITICS.contains(&c)) {
        Script::Iast
    } else {
        Script::Romanized
    };
    (script, gender_hint(word))
}

fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Suffix-table gender guess. Approximate: a miss is a valid result,
/// never an error.
fn gender_hint(word: &str) -> Option<Gender> {
    let word = word.to_lowercase();
    if ends_with_any(&word, MASCULINE_SUFFIXES) {
        Some(Gender::Masculine)
    } else if ends_with_any(&word, FEMININE_SUFFIXES) {
        Some(Gender::Feminine)
    } else if ends_with_any(&word, NEUTER_SUFFIXES) {
        Some(Gender::Neuter)
    } else {
        None
    }
}

fn ends_with_any(word: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|suffix| word.ends_with(suffix))
}
