//! Header row detection

use crate::config::ExtractorConfig;
use crate::reader::RawRow;
use crate::text::fold;

/// Finds the row that most likely holds the column titles
#[derive(Debug, Clone)]
pub struct HeaderLocator {
    /// Folded, deduplicated keywords
    keywords: Vec<String>,
    scan_rows: usize,
    min_matches: usize,
}

impl HeaderLocator {
    pub fn new(config: &ExtractorConfig) -> Self {
        let mut keywords: Vec<String> = Vec::new();
        for keyword in &config.header_keywords {
            let folded = fold(keyword);
            // "DESCRIPCION" and "Descripción" are one keyword once folded
            if !folded.is_empty() && !keywords.contains(&folded) {
                keywords.push(folded);
            }
        }

        Self {
            keywords,
            scan_rows: config.header_scan_rows,
            min_matches: config.header_min_matches,
        }
    }

    /// Index of the first row among the scanned ones that contains enough
    /// keywords. Falls back to 0 when none qualifies or the sheet is empty.
    pub fn locate(&self, rows: &[RawRow]) -> usize {
        rows.iter()
            .take(self.scan_rows)
            .position(|row| self.keyword_matches(row) >= self.min_matches)
            .unwrap_or(0)
    }

    /// Number of distinct keywords contained in at least one cell of the row
    pub fn keyword_matches(&self, row: &RawRow) -> usize {
        let cells: Vec<String> = row
            .iter()
            .map(|c| fold(c))
            .filter(|c| !c.is_empty())
            .collect();

        self.keywords
            .iter()
            .filter(|keyword| cells.iter().any(|cell| cell.contains(keyword.as_str())))
            .count()
    }
}

impl Default for HeaderLocator {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

/// Locate the header row with the default keyword set
pub fn locate_header_row(rows: &[RawRow]) -> usize {
    HeaderLocator::default().locate(rows)
}
