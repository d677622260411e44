//! Blocking HTTP client for backend submission

use reqwest::blocking::{Client, Response, multipart};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::{SubmissionPlan, SubmissionRequest};
use crate::config::SubmissionConfig;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("no submission endpoint configured")]
    NoEndpoint,

    #[error("there are no sheets to submit")]
    NothingToSubmit,

    #[error("backend rejected sheet '{sheet}' with status {status}: {body}")]
    Status {
        sheet: String,
        status: u16,
        body: String,
    },

    #[error("backend response for the first sheet has no archivoId")]
    MissingArchivoId,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Outcome of a full submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub archivo_id: i64,
    pub sheets_submitted: usize,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "archivoId")]
    archivo_id: Option<i64>,
}

pub struct SubmissionClient {
    http: Client,
    endpoint: String,
}

impl SubmissionClient {
    pub fn new(config: &SubmissionConfig) -> Result<Self, SubmissionError> {
        let endpoint = config
            .endpoint
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or(SubmissionError::NoEndpoint)?;
        Self::with_endpoint(endpoint, Duration::from_secs(config.timeout_secs))
    }

    pub fn with_endpoint(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SubmissionError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Send every sheet of the plan. The original file goes with the first one.
    pub fn submit(
        &self,
        plan: &SubmissionPlan,
        file_name: &str,
        file: Vec<u8>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let names = plan.sheet_names();
        let first = plan.request(0, None).ok_or(SubmissionError::NothingToSubmit)?;

        let response = self.send_multipart(&first, file_name, file)?;
        let response = check_status(names[0], response)?;
        let archivo_id = response
            .json::<UploadResponse>()?
            .archivo_id
            .ok_or(SubmissionError::MissingArchivoId)?;
        tracing::info!(sheet = names[0], archivo_id, "submitted first sheet");

        for (index, name) in names.iter().enumerate().skip(1) {
            let Some(request) = plan.request(index, Some(archivo_id)) else {
                break;
            };
            let response = self.http.post(&self.endpoint).json(&request).send()?;
            check_status(name, response)?;
            tracing::info!(sheet = *name, archivo_id, "submitted sheet");
        }

        Ok(SubmissionReceipt {
            archivo_id,
            sheets_submitted: names.len(),
        })
    }

    fn send_multipart(
        &self,
        request: &SubmissionRequest,
        file_name: &str,
        file: Vec<u8>,
    ) -> Result<Response, SubmissionError> {
        let form = multipart::Form::new()
            .text("userId", request.user_id.to_string())
            .text("solicitud", serde_json::to_string(&request.solicitud)?)
            .text("data", serde_json::to_string(&request.data)?)
            .text("totalHojas", request.total_hojas.to_string())
            .part(
                "file",
                multipart::Part::bytes(file).file_name(file_name.to_string()),
            );

        Ok(self.http.post(&self.endpoint).multipart(form).send()?)
    }
}

fn check_status(sheet: &str, response: Response) -> Result<Response, SubmissionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(SubmissionError::Status {
        sheet: sheet.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_endpoint() {
        let config = SubmissionConfig::default();
        assert!(matches!(
            SubmissionClient::new(&config),
            Err(SubmissionError::NoEndpoint)
        ));

        let config = SubmissionConfig {
            endpoint: Some("  ".into()),
            timeout_secs: 5,
        };
        assert!(matches!(
            SubmissionClient::new(&config),
            Err(SubmissionError::NoEndpoint)
        ));
    }
}
