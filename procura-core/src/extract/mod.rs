//! Per-sheet extraction pipeline
//!
//! For every sheet: locate the header row, derive column keys from it, keep
//! the rows below it that look like data and assemble them into records.

use anyhow::Result;
use serde::Serialize;

use crate::config::ExtractorConfig;
use crate::error::ProcessingError;
use crate::reader::{self, RawRow, RawSheet, RawWorkbook};

pub mod columns;
pub mod header;
pub mod records;
pub mod rows;

pub use columns::{build_column_keys, header_labels, normalize_header};
pub use header::{HeaderLocator, locate_header_row};
pub use records::{Fields, Record, build_records};
pub use rows::{CellKind, RowValidator, is_valid_data_row};

/// Extraction output for one sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetResult {
    pub name: String,
    /// 0-based index of the row used as header
    pub header_row: usize,
    /// Original non-blank header labels, for display
    pub headers: Vec<String>,
    /// One key per header cell, in column order
    pub keys: Vec<String>,
    pub records: Vec<Record>,
}

impl SheetResult {
    pub fn record(&self, id: u32) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn record_mut(&mut self, id: u32) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Records without their ids, in order
    pub fn payload(&self) -> Vec<records::Fields> {
        self.records.iter().map(Record::to_payload).collect()
    }
}

/// Sheets that produced records, in workbook order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Extraction {
    sheets: Vec<SheetResult>,
}

impl Extraction {
    pub fn new(sheets: Vec<SheetResult>) -> Self {
        Self { sheets }
    }

    pub fn get(&self, name: &str) -> Option<&SheetResult> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SheetResult> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn first(&self) -> Option<&SheetResult> {
        self.sheets.first()
    }

    pub fn sheets(&self) -> &[SheetResult] {
        &self.sheets
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.sheets.iter().map(|s| s.records.len()).sum()
    }

    /// Turn an extraction without any sheet into [`ProcessingError::EmptyWorkbook`]
    pub fn ensure_not_empty(&self) -> Result<&Self, ProcessingError> {
        if self.is_empty() {
            Err(ProcessingError::EmptyWorkbook)
        } else {
            Ok(self)
        }
    }
}

/// Configured extraction pipeline
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    locator: HeaderLocator,
    validator: RowValidator,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let locator = HeaderLocator::new(&config);
        let validator = RowValidator::new(&config)?;
        Ok(Self {
            config,
            locator,
            validator,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Decode workbook bytes and extract every sheet
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Extraction, ProcessingError> {
        let workbook = reader::decode_workbook(bytes)?;
        Ok(self.extract_workbook(&workbook))
    }

    /// Extract every sheet of an already decoded workbook
    pub fn extract_workbook(&self, workbook: &RawWorkbook) -> Extraction {
        let sheets: Vec<SheetResult> = workbook
            .sheets
            .iter()
            .filter_map(|sheet| self.extract_sheet(sheet))
            .collect();

        tracing::info!(
            sheets = sheets.len(),
            skipped = workbook.sheets.len() - sheets.len(),
            records = sheets.iter().map(|s| s.records.len()).sum::<usize>(),
            "extracted workbook"
        );
        Extraction::new(sheets)
    }

    /// Run the pipeline on one sheet. `None` means the sheet has nothing to offer.
    pub fn extract_sheet(&self, sheet: &RawSheet) -> Option<SheetResult> {
        if sheet.is_empty() {
            tracing::debug!(sheet = %sheet.name, "skipping empty sheet");
            return None;
        }
        if self.config.is_sheet_skipped(&sheet.name) {
            tracing::debug!(sheet = %sheet.name, "skipping sheet disabled in configuration");
            return None;
        }

        let header_row = match self.config.pinned_header_row(&sheet.name) {
            Some(index) if index < sheet.rows.len() => index,
            Some(index) => {
                tracing::warn!(
                    sheet = %sheet.name,
                    index,
                    rows = sheet.rows.len(),
                    "configured header row is past the end of the sheet"
                );
                return None;
            }
            None => self.locator.locate(&sheet.rows),
        };

        // Unlabelled columns still hold data, so the header spans every row below it
        let header: RawRow = (0..sheet.width_from(header_row))
            .map(|col| sheet.cell(header_row, col).to_string())
            .collect();
        let keys = build_column_keys(&header);
        let data_rows: Vec<RawRow> = sheet.rows[header_row + 1..]
            .iter()
            .filter(|row| self.validator.is_valid_data_row(row))
            .cloned()
            .collect();
        let records = build_records(&data_rows, &keys);

        tracing::debug!(
            sheet = %sheet.name,
            header_row,
            columns = keys.len(),
            candidates = sheet.rows.len() - header_row - 1,
            records = records.len(),
            "processed sheet"
        );

        if records.is_empty() {
            return None;
        }

        Some(SheetResult {
            name: sheet.name.clone(),
            header_row,
            headers: header_labels(&header),
            keys,
            records,
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            config: ExtractorConfig::default(),
            locator: HeaderLocator::default(),
            validator: RowValidator::default(),
        }
    }
}

/// Decode and extract a workbook in one pure call
pub fn extract_workbook(bytes: &[u8], extractor: &Extractor) -> Result<Extraction, ProcessingError> {
    extractor.extract_bytes(bytes)
}
