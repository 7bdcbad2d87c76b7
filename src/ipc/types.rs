use serde::Deserialize;

use crate::client::ReportClient;
use crate::session::{AttendanceSheet, FormSession};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub backend: Option<ReportClient>,
    pub session: FormSession,
    pub attendance: AttendanceSheet,
}

impl AppState {
    pub fn new(backend_url: Option<&str>) -> Self {
        Self {
            backend: backend_url.map(ReportClient::new),
            session: FormSession::new(),
            attendance: AttendanceSheet::new(),
        }
    }
}
