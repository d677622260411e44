//! procura-core: spreadsheet ingestion for procurement requests
//!
//! Material request workbooks are authored by hand: the header row sits
//! anywhere near the top, column titles vary in spelling and accents, and
//! title, total and template rows are mixed with the data. This library
//! recovers a clean table of keyed records per sheet and keeps it in a
//! [`Session`] while the user reviews it before submission.

pub mod config;
pub mod error;
pub mod extract;
pub mod reader;
pub mod session;
pub mod submission;
pub mod text;

pub use config::ExtractorConfig;
pub use error::{ProcessingError, SessionError};
pub use extract::{Extraction, Extractor, Record, SheetResult, extract_workbook};
pub use session::{Session, SessionState, Ticket};
pub use submission::{Solicitud, SubmissionPlan, SubmissionRequest};
