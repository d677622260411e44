//! Backend submission payloads
//!
//! Each sheet becomes one request. The first request travels as multipart form
//! data together with the original file and gets back an `archivoId`; later
//! requests are JSON bodies that reference that id.

use serde::{Deserialize, Serialize};

use crate::extract::{Extraction, Fields};

#[cfg(feature = "submission")]
mod client;

#[cfg(feature = "submission")]
pub use client::{SubmissionClient, SubmissionError, SubmissionReceipt};

/// Request metadata entered by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solicitud {
    pub nombre: String,
    pub descripcion: String,
}

/// Body of one submission call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub user_id: i64,
    pub solicitud: Solicitud,
    /// Records of one sheet without their ids
    pub data: Vec<Fields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archivo_id: Option<i64>,
    pub total_hojas: usize,
}

/// Sheet payloads ready to be sent, in workbook order
#[derive(Debug, Clone)]
pub struct SubmissionPlan {
    user_id: i64,
    solicitud: Solicitud,
    sheets: Vec<(String, Vec<Fields>)>,
}

impl SubmissionPlan {
    pub fn new(user_id: i64, solicitud: Solicitud, extraction: &Extraction) -> Self {
        let sheets = extraction
            .sheets()
            .iter()
            .map(|sheet| (sheet.name.clone(), sheet.payload()))
            .collect();

        Self {
            user_id,
            solicitud,
            sheets,
        }
    }

    pub fn total_sheets(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Request for the sheet at `index`. The first sheet never carries an
    /// `archivoId`; the rest carry the one returned for the first.
    pub fn request(&self, index: usize, archivo_id: Option<i64>) -> Option<SubmissionRequest> {
        let (_, data) = self.sheets.get(index)?;
        Some(SubmissionRequest {
            user_id: self.user_id,
            solicitud: self.solicitud.clone(),
            data: data.clone(),
            archivo_id: if index == 0 { None } else { archivo_id },
            total_hojas: self.sheets.len(),
        })
    }
}
