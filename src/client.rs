use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::report::{AttendanceReportPayload, GradeReportPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Excel,
}

impl ReportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Some(ReportFormat::Pdf),
            "excel" => Some(ReportFormat::Excel),
            _ => None,
        }
    }

    /// Fixed download name for the attendance variant.
    pub fn attendance_filename(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "attendance_report.pdf",
            ReportFormat::Excel => "attendance_report.xlsx",
        }
    }

    fn attendance_endpoint(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "/generate_attendance_pdf",
            ReportFormat::Excel => "/generate_attendance_excel",
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    /// The service answered with a non-success status. Carries the server's
    /// `error` message when the body had one.
    #[error("{0}")]
    Rejected(String),
    #[error("report request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin client for the report-generation service. One base URL, two fixed
/// endpoint families, JSON in, binary document out. No retries.
pub struct ReportClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ReportClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generate_grade_report(
        &self,
        payload: &GradeReportPayload,
    ) -> Result<Vec<u8>, ReportError> {
        self.post_for_document("/generate_pdf", payload, "Failed to generate PDF")
    }

    pub fn generate_attendance_report(
        &self,
        payload: &AttendanceReportPayload,
        format: ReportFormat,
    ) -> Result<Vec<u8>, ReportError> {
        self.post_for_document(
            format.attendance_endpoint(),
            payload,
            "Failed to generate attendance report",
        )
    }

    fn post_for_document<T: Serialize>(
        &self,
        endpoint: &str,
        payload: &T,
        generic_message: &str,
    ) -> Result<Vec<u8>, ReportError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "requesting report document");
        let response = self.http.post(&url).json(payload).send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .ok()
                .and_then(|body| {
                    body.get("error")
                        .and_then(|e| e.as_str())
                        .map(|s| s.to_string())
                })
                .unwrap_or_else(|| generic_message.to_string());
            warn!(%url, %status, "report service rejected request");
            return Err(ReportError::Rejected(message));
        }

        let bytes = response.bytes()?;
        debug!(%url, len = bytes.len(), "received report document");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_is_case_insensitive() {
        assert_eq!(ReportFormat::parse("pdf"), Some(ReportFormat::Pdf));
        assert_eq!(ReportFormat::parse("PDF"), Some(ReportFormat::Pdf));
        assert_eq!(ReportFormat::parse("Excel"), Some(ReportFormat::Excel));
        assert_eq!(ReportFormat::parse("docx"), None);
    }

    #[test]
    fn attendance_filenames_are_fixed() {
        assert_eq!(
            ReportFormat::Pdf.attendance_filename(),
            "attendance_report.pdf"
        );
        assert_eq!(
            ReportFormat::Excel.attendance_filename(),
            "attendance_report.xlsx"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ReportClient::new("http://127.0.0.1:5000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
    }
}
