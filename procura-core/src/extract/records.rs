//! Record assembly

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::reader::RawRow;

/// Field map of a record, keyed by column key
pub type Fields = BTreeMap<String, String>;

/// One extracted data row.
///
/// `id` is local to the sheet and the processing pass that produced it: it is
/// dense and 1-based at creation, never renumbered after deletions, and
/// reassigned from 1 when the workbook is processed again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u32,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Whether any field holds a non-blank value
    pub fn has_content(&self) -> bool {
        self.fields.values().any(|v| !v.trim().is_empty())
    }

    /// Field map without the session-local id, as sent to the backend
    pub fn to_payload(&self) -> Fields {
        self.fields.clone()
    }
}

/// Turn validated rows into keyed records.
///
/// Key `i` takes the trimmed `row[i]`; short rows yield empty strings and cells
/// past the last key are ignored. Rows whose fields are all blank are dropped
/// without consuming an id.
pub fn build_records<S: AsRef<str>>(data_rows: &[RawRow], column_keys: &[S]) -> Vec<Record> {
    let mut records = Vec::with_capacity(data_rows.len());
    let mut next_id = 1u32;

    for row in data_rows {
        let fields: Fields = column_keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                let value = row.get(index).map(|c| c.trim()).unwrap_or("");
                (key.as_ref().to_string(), value.to_string())
            })
            .collect();

        let record = Record {
            id: next_id,
            fields,
        };
        if !record.has_content() {
            tracing::trace!(row = ?row, "dropping record without content");
            continue;
        }

        records.push(record);
        next_id += 1;
    }

    records
}
