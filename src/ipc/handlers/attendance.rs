use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::session::{AttendancePatch, AttendanceSheet, SessionError};
use serde_json::json;

fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

fn session_err(req: &Request, e: SessionError) -> serde_json::Value {
    err(&req.id, e.code(), e.to_string(), None)
}

fn sheet_view(sheet: &AttendanceSheet) -> serde_json::Value {
    // AttendanceSheet serializes with its wire-adjacent field names already.
    let students =
        serde_json::to_value(&sheet.students).unwrap_or_else(|_| serde_json::Value::Null);
    json!({
        "className": sheet.class_name,
        "attendanceDate": sheet.attendance_date,
        "students": students,
    })
}

fn handle_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, sheet_view(&state.attendance))
}

fn handle_set_class_name(state: &mut AppState, req: &Request) -> serde_json::Value {
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    state.attendance = state.attendance.with_class_name(&name);
    ok(&req.id, sheet_view(&state.attendance))
}

fn handle_set_date(state: &mut AppState, req: &Request) -> serde_json::Value {
    let date = match required_str(req, "date") {
        Ok(v) => v,
        Err(e) => return e,
    };
    state.attendance = state.attendance.with_date(&date);
    ok(&req.id, sheet_view(&state.attendance))
}

fn handle_add_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (next, index) = state.attendance.with_student_added();
    state.attendance = next;
    let mut result = sheet_view(&state.attendance);
    result["index"] = json!(index);
    ok(&req.id, result)
}

fn handle_update_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(index) = req.params.get("index").and_then(|v| v.as_u64()) else {
        return err(&req.id, "bad_params", "missing index", None);
    };
    let patch: AttendancePatch = match req.params.get("patch") {
        Some(raw) => match serde_json::from_value(raw.clone()) {
            Ok(v) => v,
            Err(e) => {
                return err(
                    &req.id,
                    "bad_params",
                    format!("invalid patch: {}", e),
                    None,
                )
            }
        },
        None => return err(&req.id, "bad_params", "missing patch", None),
    };
    match state.attendance.with_student_updated(index as usize, &patch) {
        Ok(next) => {
            state.attendance = next;
            ok(&req.id, sheet_view(&state.attendance))
        }
        Err(e) => session_err(req, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.open" => Some(handle_open(state, req)),
        "attendance.setClassName" => Some(handle_set_class_name(state, req)),
        "attendance.setDate" => Some(handle_set_date(state, req)),
        "attendance.addStudent" => Some(handle_add_student(state, req)),
        "attendance.updateStudent" => Some(handle_update_student(state, req)),
        _ => None,
    }
}
