//! Processing session: owns the extraction between upload and submission

use crate::error::{ProcessingError, SessionError};
use crate::extract::{Extraction, Extractor, Record, SheetResult};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Processing,
    Ready,
}

/// Handle for one processing call. Only the most recent ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket(u64);

/// Holds the result of the latest processed workbook and applies edits to it.
///
/// The session is the only owner of the extracted records; callers read them
/// through accessors and change them through [`Session::update_cell`] and
/// [`Session::delete_record`].
#[derive(Debug, Default)]
pub struct Session {
    extractor: Extractor,
    generation: u64,
    pending: Option<u64>,
    extraction: Option<Extraction>,
    active_sheet: Option<String>,
}

impl Session {
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        if self.pending.is_some() {
            SessionState::Processing
        } else if self.extraction.is_some() {
            SessionState::Ready
        } else {
            SessionState::Empty
        }
    }

    /// Decode and extract a workbook, replacing any previous result.
    ///
    /// On decode failure the session ends up empty and no sheet is kept.
    pub fn process_file(&mut self, bytes: &[u8]) -> Result<&Extraction, ProcessingError> {
        let ticket = self.begin();
        let result = self.extractor.extract_bytes(bytes);
        self.complete(ticket, result)
    }

    /// Start a processing call, superseding any call still in flight.
    ///
    /// The previous extraction stays readable until the call completes.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        if self.pending.is_some() {
            tracing::debug!(generation = self.generation, "superseding pending processing call");
        }
        self.pending = Some(self.generation);
        Ticket(self.generation)
    }

    /// Apply the outcome of the call identified by `ticket`.
    ///
    /// Results of superseded calls are discarded with [`ProcessingError::Superseded`]
    /// and leave the session untouched.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<Extraction, ProcessingError>,
    ) -> Result<&Extraction, ProcessingError> {
        if self.pending != Some(ticket.0) {
            tracing::warn!(
                ticket = ticket.0,
                current = self.generation,
                "discarding result of superseded processing call"
            );
            return Err(ProcessingError::Superseded);
        }
        self.pending = None;

        match result {
            Ok(extraction) => {
                self.active_sheet = extraction.first().map(|s| s.name.clone());
                let extraction: &Extraction = self.extraction.insert(extraction);
                Ok(extraction)
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Drop every decoded sheet and any pending call
    pub fn reset(&mut self) {
        self.pending = None;
        self.clear();
    }

    fn clear(&mut self) {
        self.extraction = None;
        self.active_sheet = None;
    }

    pub fn extraction(&self) -> Option<&Extraction> {
        self.extraction.as_ref()
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetResult> {
        self.extraction.as_ref()?.get(name)
    }

    pub fn record(&self, sheet: &str, id: u32) -> Option<&Record> {
        self.sheet(sheet)?.record(id)
    }

    pub fn active_sheet(&self) -> Option<&SheetResult> {
        self.sheet(self.active_sheet.as_deref()?)
    }

    pub fn active_sheet_name(&self) -> Option<&str> {
        self.active_sheet.as_deref()
    }

    /// Select the sheet shown to the user
    pub fn set_active_sheet(&mut self, name: &str) -> Result<(), SessionError> {
        let extraction = self.extraction.as_ref().ok_or(SessionError::NotReady)?;
        if !extraction.contains(name) {
            return Err(SessionError::SheetNotFound(name.to_string()));
        }
        self.active_sheet = Some(name.to_string());
        Ok(())
    }

    /// Replace one field of one record
    pub fn update_cell(
        &mut self,
        sheet: &str,
        id: u32,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        let sheet_result = self.sheet_mut(sheet)?;
        if !sheet_result.has_key(key) {
            return Err(SessionError::FieldNotFound {
                sheet: sheet.to_string(),
                key: key.to_string(),
            });
        }
        let record = sheet_result
            .record_mut(id)
            .ok_or_else(|| SessionError::RecordNotFound {
                sheet: sheet.to_string(),
                id,
            })?;

        record.fields.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Remove a record. Remaining ids are kept as they are.
    pub fn delete_record(&mut self, sheet: &str, id: u32) -> Result<Record, SessionError> {
        let sheet_result = self.sheet_mut(sheet)?;
        let position = sheet_result
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| SessionError::RecordNotFound {
                sheet: sheet.to_string(),
                id,
            })?;

        Ok(sheet_result.records.remove(position))
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut SheetResult, SessionError> {
        self.extraction
            .as_mut()
            .ok_or(SessionError::NotReady)?
            .get_mut(name)
            .ok_or_else(|| SessionError::SheetNotFound(name.to_string()))
    }
}
