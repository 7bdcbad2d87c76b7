use crate::client::{ReportClient, ReportError, ReportFormat};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::report::{build_attendance_report, build_grade_report, grade_report_filename};
use crate::session::SessionError;
use serde_json::json;
use std::path::PathBuf;

fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

fn backend<'a>(state: &'a AppState, req: &Request) -> Result<&'a ReportClient, serde_json::Value> {
    state
        .backend
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_backend", "configure a report backend first", None))
}

fn session_err(req: &Request, e: SessionError) -> serde_json::Value {
    err(&req.id, e.code(), e.to_string(), None)
}

fn report_err(req: &Request, e: ReportError) -> serde_json::Value {
    let details = match &e {
        ReportError::Rejected(_) => Some(json!({ "kind": "rejected" })),
        ReportError::Transport(_) => Some(json!({ "kind": "transport" })),
    };
    err(&req.id, "report_request_failed", e.to_string(), details)
}

fn write_document(
    req: &Request,
    out_path: &str,
    bytes: &[u8],
    filename: &str,
) -> serde_json::Value {
    let path = PathBuf::from(out_path);
    if let Err(e) = std::fs::write(&path, bytes) {
        return err(
            &req.id,
            "file_write_failed",
            e.to_string(),
            Some(json!({ "path": out_path })),
        );
    }
    ok(
        &req.id,
        json!({
            "path": path.to_string_lossy(),
            "filename": filename,
            "bytes": bytes.len(),
        }),
    )
}

/// Grade report: validate, build the wire payload, request the PDF, save it
/// where the shell asked. Validation failures never reach the network.
fn handle_generate_grade(state: &mut AppState, req: &Request) -> serde_json::Value {
    let out_path = match required_str(req, "outPath") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let payload = match build_grade_report(&state.session) {
        Ok(v) => v,
        Err(e) => return session_err(req, e),
    };
    let client = match backend(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let document = match client.generate_grade_report(&payload) {
        Ok(v) => v,
        Err(e) => return report_err(req, e),
    };
    let filename = grade_report_filename(&state.session.student_name);
    write_document(req, &out_path, &document, &filename)
}

fn handle_generate_attendance(state: &mut AppState, req: &Request) -> serde_json::Value {
    let out_path = match required_str(req, "outPath") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let format_raw = match required_str(req, "format") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(format) = ReportFormat::parse(&format_raw) else {
        return err(
            &req.id,
            "bad_params",
            "format must be one of: pdf, excel",
            Some(json!({ "format": format_raw })),
        );
    };
    let payload = match build_attendance_report(&state.attendance) {
        Ok(v) => v,
        Err(e) => return session_err(req, e),
    };
    let client = match backend(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let document = match client.generate_attendance_report(&payload, format) {
        Ok(v) => v,
        Err(e) => return report_err(req, e),
    };
    write_document(req, &out_path, &document, format.attendance_filename())
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.generateGrade" => Some(handle_generate_grade(state, req)),
        "reports.generateAttendance" => Some(handle_generate_attendance(state, req)),
        _ => None,
    }
}
