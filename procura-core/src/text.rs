//! Text folding helpers

use unicode_normalization::UnicodeNormalization;

/// Remove combining marks after canonical decomposition ("Código" -> "Codigo")
pub fn strip_diacritics(s: &str) -> String {
    s.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// Trimmed, diacritic-free, lower-cased form used for keyword comparisons
pub fn fold(s: &str) -> String {
    strip_diacritics(s.trim()).to_lowercase()
}

/// Whether a cell holds nothing but a number ("150", "-2,5", "1.000,00")
pub fn is_bare_number(s: &str) -> bool {
    let s = s.trim();
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}
