//! Excel/ODS decoding using calamine
//!
//! The decoder turns a workbook container (XLSX, XLSM, XLSB, XLS or ODS) into
//! per-sheet grids of strings. It carries no semantics: header detection and
//! row filtering happen in [`crate::extract`].

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use std::path::Path;

use crate::error::ProcessingError;

pub mod workbook;

pub use workbook::{RawRow, RawSheet, RawWorkbook};

/// Decode a workbook held in memory.
///
/// The format is sniffed from the content. Any sheet that cannot be read makes
/// the whole call fail: callers never observe a partially decoded workbook.
pub fn decode_workbook(bytes: &[u8]) -> Result<RawWorkbook, ProcessingError> {
    if bytes.is_empty() {
        return Err(ProcessingError::Decode("input is empty".to_string()));
    }

    let mut excel = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ProcessingError::Decode(e.to_string()))?;

    let mut sheets = Vec::new();
    for sheet_name in excel.sheet_names() {
        let range = excel.worksheet_range(&sheet_name).map_err(|e| {
            ProcessingError::Decode(format!("sheet '{}' is unreadable: {}", sheet_name, e))
        })?;
        sheets.push(parse_sheet(&sheet_name, &range));
    }

    tracing::debug!(sheets = sheets.len(), "decoded workbook");
    Ok(RawWorkbook { sheets })
}

/// Read and decode a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<RawWorkbook, ProcessingError> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_workbook(&bytes)
}

fn parse_sheet(name: &str, range: &Range<Data>) -> RawSheet {
    let rows = range
        .rows()
        .map(|row| {
            let mut cells: RawRow = row.iter().map(cell_to_string).collect();
            // Trailing blanks carry no information and would widen the header
            while cells.last().is_some_and(|c| c.trim().is_empty()) {
                cells.pop();
            }
            cells
        })
        .collect();

    RawSheet::new(name, rows)
}

/// Render a calamine cell the way it reads in the spreadsheet UI
pub(crate) fn cell_to_string(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_to_string(*f),
        Data::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            None => float_to_string(dt.as_f64()),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

fn float_to_string(f: f64) -> String {
    // Integral values inside the exact f64 integer range print without ".0"
    if f.fract() == 0.0 && f.abs() <= 9_007_199_254_740_992.0 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}
