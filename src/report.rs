use serde::Serialize;

use crate::session::{AttendanceSheet, AttendanceStatus, FormSession, SessionError};

/// Wire entry for one subject. Field names match the report service exactly;
/// the internal `id` is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectEntry {
    pub subject_name: String,
    #[serde(rename = "FA1")]
    pub fa1: f64,
    #[serde(rename = "FA2")]
    pub fa2: f64,
    #[serde(rename = "SA")]
    pub sa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReportPayload {
    pub student_name: String,
    pub subjects: Vec<SubjectEntry>,
}

/// Validates the session, then maps it one-to-one onto the wire shape.
/// Validation failure means no payload and no network call.
pub fn build_grade_report(session: &FormSession) -> Result<GradeReportPayload, SessionError> {
    session.validate_for_report()?;
    Ok(GradeReportPayload {
        student_name: session.student_name.clone(),
        subjects: session
            .subjects
            .iter()
            .map(|s| SubjectEntry {
                subject_name: s.name.clone(),
                fa1: s.fa1,
                fa2: s.fa2,
                sa: s.sa,
            })
            .collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceEntry {
    pub name: String,
    pub prn: String,
    pub division: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReportPayload {
    pub class_name: String,
    pub attendance_date: String,
    pub students: Vec<AttendanceEntry>,
}

pub fn build_attendance_report(
    sheet: &AttendanceSheet,
) -> Result<AttendanceReportPayload, SessionError> {
    sheet.validate_for_report()?;
    Ok(AttendanceReportPayload {
        class_name: sheet.class_name.clone(),
        attendance_date: sheet.attendance_date.clone(),
        students: sheet
            .students
            .iter()
            .map(|r| AttendanceEntry {
                name: r.name.clone(),
                prn: r.prn.clone(),
                division: r.division.clone(),
                status: r.status,
            })
            .collect(),
    })
}

/// Download name for a grade report: whitespace runs in the student name
/// collapse to single underscores.
pub fn grade_report_filename(student_name: &str) -> String {
    let safe = student_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{}_grade_report.pdf", safe)
}
