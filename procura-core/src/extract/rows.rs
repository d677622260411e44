//! Data row validation

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

use crate::config::ExtractorConfig;
use crate::reader::RawRow;
use crate::text::{fold, is_bare_number, strip_diacritics};

/// Classification of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Blank,
    /// Starts with a total marker such as "TOTAL" or "RESUMEN"
    Summary,
    /// Starts with a header or template token
    Excluded,
    /// Only a number, e.g. a quantity or a total amount
    Number,
    Text,
}

/// Decides whether a raw row is real data rather than noise
#[derive(Debug, Clone)]
pub struct RowValidator {
    exclusion: Option<Regex>,
    summary: Option<Regex>,
}

impl RowValidator {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Self::with_patterns(&config.exclusion_patterns)?
            .with_summary_markers(&config.summary_markers)
    }

    /// Build a validator from prefix patterns; all are anchored at the cell start
    pub fn with_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        Ok(Self {
            exclusion: compile_prefixes(patterns)?,
            summary: None,
        })
    }

    /// Set the prefixes of total lines, replacing any previous ones
    pub fn with_summary_markers<S: AsRef<str>>(mut self, markers: &[S]) -> Result<Self> {
        self.summary = compile_prefixes(markers)?;
        Ok(self)
    }

    pub fn classify(&self, cell: &str) -> CellKind {
        let folded = fold(cell);
        let matches = |re: &Option<Regex>| re.as_ref().is_some_and(|re| re.is_match(&folded));

        if folded.is_empty() {
            CellKind::Blank
        } else if matches(&self.summary) {
            CellKind::Summary
        } else if matches(&self.exclusion) {
            CellKind::Excluded
        } else if is_bare_number(&folded) {
            CellKind::Number
        } else {
            CellKind::Text
        }
    }

    /// A row is data when any one of its cells is clean on its own.
    ///
    /// Clean means non-blank and not excluded. In a row that carries a total
    /// marker ("TOTAL", "RESUMEN", ...) bare numbers are the marker's figures
    /// and do not count, so `["TOTAL", "", "150"]` is rejected while
    /// `["1", "Proyector multimedia", "2"]` is kept.
    pub fn is_valid_data_row(&self, row: &RawRow) -> bool {
        let kinds: Vec<CellKind> = row.iter().map(|c| self.classify(c)).collect();
        let has_summary = kinds.contains(&CellKind::Summary);

        kinds.iter().any(|kind| match kind {
            CellKind::Text => true,
            CellKind::Number => !has_summary,
            CellKind::Blank | CellKind::Summary | CellKind::Excluded => false,
        })
    }
}

fn compile_prefixes<S: AsRef<str>>(patterns: &[S]) -> Result<Option<Regex>> {
    let alternatives: Vec<String> = patterns
        .iter()
        .map(|p| strip_diacritics(p.as_ref().trim()))
        .filter(|p| !p.is_empty())
        .map(|p| format!("(?:{})", p))
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    let source = format!("^(?:{})", alternatives.join("|"));
    let regex = RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("Invalid exclusion patterns: {}", source))?;
    Ok(Some(regex))
}

impl Default for RowValidator {
    fn default() -> Self {
        // The built-in patterns are plain words; `test_default_patterns_compile` guards this
        Self::new(&ExtractorConfig::default()).unwrap_or(Self {
            exclusion: None,
            summary: None,
        })
    }
}

/// Validate a row with the default exclusion patterns
pub fn is_valid_data_row(row: &RawRow) -> bool {
    RowValidator::default().is_valid_data_row(row)
}
