//! Column key normalization

use std::collections::HashSet;

use crate::text::strip_diacritics;

/// Key taken by the record id in serialized records
pub const RESERVED_KEY: &str = "id";

/// Normalize a header label into a code-safe key.
///
/// `" Descripción  del item "` becomes `"descripcion_del_item"`. Labels with no
/// usable characters normalize to the empty string.
pub fn normalize_header(label: &str) -> String {
    let stripped = strip_diacritics(label.trim());
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_lowercase()
}

/// Build the keys for every cell of a header row.
///
/// Blank labels get the positional placeholder `columna_<index>`. Labels that
/// collide after normalization keep the bare key on their first occurrence and
/// receive `_2`, `_3`, ... afterwards, so the result never holds duplicates.
/// A column titled "ID" is suffixed as well since `id` belongs to the record.
pub fn build_column_keys<S: AsRef<str>>(header_row: &[S]) -> Vec<String> {
    let candidates: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let key = normalize_header(label.as_ref());
            if key.is_empty() {
                format!("columna_{}", index)
            } else {
                key
            }
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len() + 1);
    seen.insert(RESERVED_KEY.to_string());
    let mut keys = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let mut key = candidate.clone();
        let mut suffix = 2;
        while seen.contains(&key) {
            key = format!("{}_{}", candidate, suffix);
            suffix += 1;
        }
        seen.insert(key.clone());
        keys.push(key);
    }
    keys
}

/// Original non-blank labels, trimmed, for display
pub fn header_labels<S: AsRef<str>>(header_row: &[S]) -> Vec<String> {
    header_row
        .iter()
        .map(|label| label.as_ref().trim())
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}
