//! Error types

use thiserror::Error;

/// Failure of a `process_file` call
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The bytes are not a supported workbook, or a sheet could not be read
    #[error("failed to decode workbook: {0}")]
    Decode(String),

    /// Decoding succeeded but no sheet yielded a record
    #[error("no sheet in the workbook contains data rows")]
    EmptyWorkbook,

    /// A newer processing call started before this one completed
    #[error("processing result discarded: superseded by a newer call")]
    Superseded,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure of a session mutation or selection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no workbook has been processed")]
    NotReady,

    #[error("sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("record {id} not found in sheet '{sheet}'")]
    RecordNotFound { sheet: String, id: u32 },

    #[error("column '{key}' does not exist in sheet '{sheet}'")]
    FieldNotFound { sheet: String, key: String },
}
