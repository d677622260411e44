//! Raw workbook data structures

/// A single row of cell strings. Blank cells are empty strings.
pub type RawRow = Vec<String>;

/// Represents a decoded workbook
#[derive(Debug, Clone, Default)]
pub struct RawWorkbook {
    /// Sheets in source order
    pub sheets: Vec<RawSheet>,
}

impl RawWorkbook {
    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Represents a worksheet as an ordered grid of strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    /// Rows in source order; trailing blank cells are trimmed, so rows may be ragged
    pub rows: Vec<RawRow>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Build a sheet from string slices (handy for tests and callers with pre-decoded data)
    pub fn from_rows<S: AsRef<str>>(name: impl Into<String>, rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.as_ref().to_string()).collect())
            .collect();
        Self::new(name, rows)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the widest row from `first_row` down
    pub fn width_from(&self, first_row: usize) -> usize {
        self.rows
            .iter()
            .skip(first_row)
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    /// Get a cell, treating cells past the end of a ragged row as blank
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}
