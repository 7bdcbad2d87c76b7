use crate::grades::{calculate_gpa, calculate_grade_point, calculate_total, letter_grade};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::session::{FormSession, SessionError, SubjectPatch};
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

/// Full form view with the derived columns the form displays live:
/// per-subject total, grade point, letter grade, and the overall GPA.
fn session_view(session: &FormSession) -> serde_json::Value {
    let subjects: Vec<serde_json::Value> = session
        .subjects
        .iter()
        .map(|s| {
            let total = calculate_total(s);
            let grade_point = calculate_grade_point(total);
            json!({
                "id": s.id,
                "name": s.name,
                "fa1": s.fa1,
                "fa2": s.fa2,
                "sa": s.sa,
                "total": total,
                "gradePoint": grade_point,
                "letterGrade": letter_grade(grade_point),
            })
        })
        .collect();
    json!({
        "studentName": session.student_name,
        "subjects": subjects,
        "gpa": calculate_gpa(&session.subjects),
    })
}

fn handle_session_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, session_view(&state.session))
}

fn handle_session_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.session = FormSession::new();
    ok(&req.id, session_view(&state.session))
}

fn handle_set_student_name(state: &mut AppState, req: &Request) -> serde_json::Value {
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    state.session = state.session.with_student_name(&name);
    ok(&req.id, session_view(&state.session))
}

fn handle_subject_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (next, subject_id) = state.session.with_subject_added();
    state.session = next;
    let mut result = session_view(&state.session);
    result["subjectId"] = json!(subject_id);
    ok(&req.id, result)
}

fn handle_subject_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let subject_id = match required_str(req, "subjectId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let patch: SubjectPatch = match req.params.get("patch") {
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
    match state.session.with_subject_updated(&subject_id, &patch) {
        Ok(next) => {
            state.session = next;
            ok(&req.id, session_view(&state.session))
        }
        Err(e) => session_err(req, e),
    }
}

fn handle_subject_remove(state: &mut AppState, req: &Request) -> serde_json::Value {
    let subject_id = match required_str(req, "subjectId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.session.with_subject_removed(&subject_id) {
        Ok(next) => {
            state.session = next;
            ok(&req.id, session_view(&state.session))
        }
        Err(e) => session_err(req, e),
    }
}

fn handle_grades_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, session_view(&state.session))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.open" => Some(handle_session_open(state, req)),
        "session.reset" => Some(handle_session_reset(state, req)),
        "session.setStudentName" => Some(handle_set_student_name(state, req)),
        "subjects.add" => Some(handle_subject_add(state, req)),
        "subjects.update" => Some(handle_subject_update(state, req)),
        "subjects.remove" => Some(handle_subject_remove(state, req)),
        "grades.summary" => Some(handle_grades_summary(state, req)),
        _ => None,
    }
}
