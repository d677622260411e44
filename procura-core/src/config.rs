//! Configuration system for the extractor

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Keywords that identify a header row
pub const DEFAULT_HEADER_KEYWORDS: &[&str] = &[
    "Item",
    "Código",
    "NO DE ITEM",
    "DESCRIPCION",
    "Descripción",
    "UNIDAD",
    "Cant",
    "REQUISICIÓN",
    "Observaciones",
    "PRIORIDAD",
];

/// Prefixes of cells that are never data: repeated headers, totals and template artifacts
pub const DEFAULT_EXCLUSION_PATTERNS: &[&str] = &[
    // Repeated header tokens
    "ITEM",
    "CODIGO",
    "DESCRIPCION",
    "UNIDAD",
    "CANT",
    "OBSERV",
    // Summary rows
    "TOTAL",
    "RESUMEN",
    "SUMMARY",
    "PROYECTO",
    "REQUISICION",
    "PRIORIDAD",
    // Export and template artifacts
    "UNNAMED:",
    "FO-PROC",
    "ASOCIACION",
];

/// Prefixes of total lines whose figures never count as data on their own
pub const DEFAULT_SUMMARY_MARKERS: &[&str] = &["TOTAL", "RESUMEN", "SUMMARY"];

pub const DEFAULT_HEADER_SCAN_ROWS: usize = 20;
pub const DEFAULT_HEADER_MIN_MATCHES: usize = 2;

/// Main extractor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// How many leading rows are candidates for the header row
    pub header_scan_rows: usize,
    /// Minimum number of distinct keywords a header row must contain
    pub header_min_matches: usize,
    pub header_keywords: Vec<String>,
    /// Regular expressions matched at the start of the folded cell text
    pub exclusion_patterns: Vec<String>,
    /// Patterns like `exclusion_patterns`; a row holding one of them keeps
    /// only its text cells as evidence of data
    pub summary_markers: Vec<String>,
    pub sheets: HashMap<String, SheetConfig>,
    pub submission: SubmissionConfig,
}

impl ExtractorConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ExtractorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can drive an extraction
    pub fn validate(&self) -> Result<()> {
        if self.header_scan_rows == 0 {
            anyhow::bail!("Configuration error: header_scan_rows must be at least 1");
        }
        if self.header_min_matches == 0 {
            anyhow::bail!("Configuration error: header_min_matches must be at least 1");
        }
        if self.header_keywords.iter().all(|k| k.trim().is_empty()) {
            anyhow::bail!("Configuration error: header_keywords cannot be empty");
        }
        for pattern in self.exclusion_patterns.iter().chain(&self.summary_markers) {
            regex::Regex::new(pattern).with_context(|| {
                format!(
                    "Configuration error: invalid exclusion pattern '{}'",
                    pattern
                )
            })?;
        }
        Ok(())
    }

    /// Get the per-sheet override, if any
    pub fn sheet(&self, sheet_name: &str) -> Option<&SheetConfig> {
        self.sheets.get(sheet_name)
    }

    /// Check if a sheet should be ignored entirely
    pub fn is_sheet_skipped(&self, sheet_name: &str) -> bool {
        self.sheet(sheet_name).is_some_and(|s| s.skip)
    }

    /// Explicit header row for a sheet, bypassing detection
    pub fn pinned_header_row(&self, sheet_name: &str) -> Option<usize> {
        self.sheet(sheet_name).and_then(|s| s.header_row)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
            header_min_matches: DEFAULT_HEADER_MIN_MATCHES,
            header_keywords: DEFAULT_HEADER_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclusion_patterns: DEFAULT_EXCLUSION_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            summary_markers: DEFAULT_SUMMARY_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sheets: HashMap::new(),
            submission: SubmissionConfig::default(),
        }
    }
}

/// Sheet-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Ignore this sheet
    #[serde(default)]
    pub skip: bool,
    /// 0-based header row index
    #[serde(default)]
    pub header_row: Option<usize>,
}

/// Backend submission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Endpoint receiving one request per sheet
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 30,
        }
    }
}
