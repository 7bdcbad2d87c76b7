use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grades::{clamp_fa, clamp_sa, Subject};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("subject not found: {0}")]
    SubjectNotFound(String),
    #[error("a report must keep at least one subject")]
    LastSubject,
    #[error("student name is required")]
    MissingStudentName,
    #[error("every subject needs a name")]
    MissingSubjectName { subject_id: String },
    #[error("class name is required")]
    MissingClassName,
    #[error("attendance row {0} does not exist")]
    RowNotFound(usize),
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::SubjectNotFound(_) => "not_found",
            SessionError::LastSubject => "cannot_remove_last",
            SessionError::MissingStudentName
            | SessionError::MissingSubjectName { .. }
            | SessionError::MissingClassName => "validation_failed",
            SessionError::RowNotFound(_) => "not_found",
        }
    }
}

/// Partial edit of one subject row. Scores are clamped into range as they
/// are applied, so the session invariant holds at every step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub fa1: Option<f64>,
    pub fa2: Option<f64>,
    pub sa: Option<f64>,
}

/// The grade form's entire state. Every edit produces a new value; the IPC
/// layer swaps the state rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSession {
    pub student_name: String,
    pub subjects: Vec<Subject>,
}

impl FormSession {
    /// A fresh session starts with a single blank subject row.
    pub fn new() -> Self {
        Self {
            student_name: String::new(),
            subjects: vec![Subject::blank()],
        }
    }

    pub fn with_student_name(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.student_name = name.to_string();
        next
    }

    /// Appends a blank row and returns the new state plus the new row's id.
    pub fn with_subject_added(&self) -> (Self, String) {
        let mut next = self.clone();
        let subject = Subject::blank();
        let id = subject.id.clone();
        next.subjects.push(subject);
        (next, id)
    }

    pub fn with_subject_updated(
        &self,
        subject_id: &str,
        patch: &SubjectPatch,
    ) -> Result<Self, SessionError> {
        let mut next = self.clone();
        let subject = next
            .subjects
            .iter_mut()
            .find(|s| s.id == subject_id)
            .ok_or_else(|| SessionError::SubjectNotFound(subject_id.to_string()))?;
        if let Some(name) = &patch.name {
            subject.name = name.clone();
        }
        if let Some(v) = patch.fa1 {
            subject.fa1 = clamp_fa(v);
        }
        if let Some(v) = patch.fa2 {
            subject.fa2 = clamp_fa(v);
        }
        if let Some(v) = patch.sa {
            subject.sa = clamp_sa(v);
        }
        Ok(next)
    }

    /// Removal is refused, not ignored, when it would empty the list.
    pub fn with_subject_removed(&self, subject_id: &str) -> Result<Self, SessionError> {
        if !self.subjects.iter().any(|s| s.id == subject_id) {
            return Err(SessionError::SubjectNotFound(subject_id.to_string()));
        }
        if self.subjects.len() <= 1 {
            return Err(SessionError::LastSubject);
        }
        let mut next = self.clone();
        next.subjects.retain(|s| s.id != subject_id);
        Ok(next)
    }

    /// Preconditions for report submission: student name and every subject
    /// name must be non-blank. Checked before any payload is built.
    pub fn validate_for_report(&self) -> Result<(), SessionError> {
        if self.student_name.trim().is_empty() {
            return Err(SessionError::MissingStudentName);
        }
        for s in &self.subjects {
            if s.name.trim().is_empty() {
                return Err(SessionError::MissingSubjectName {
                    subject_id: s.id.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "P")]
    Present,
    #[serde(rename = "A")]
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub name: String,
    pub prn: String,
    pub division: String,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    fn blank() -> Self {
        Self {
            name: String::new(),
            prn: String::new(),
            division: String::new(),
            status: AttendanceStatus::Present,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendancePatch {
    pub name: Option<String>,
    pub prn: Option<String>,
    pub division: Option<String>,
    pub status: Option<AttendanceStatus>,
}

/// Attendance form state. Rows are addressed by index; the sheet carries no
/// derived values — the report service does all formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSheet {
    pub class_name: String,
    pub attendance_date: String,
    pub students: Vec<AttendanceRecord>,
}

impl AttendanceSheet {
    pub fn new() -> Self {
        Self {
            class_name: String::new(),
            attendance_date: Local::now().format("%Y-%m-%dT%H:%M").to_string(),
            students: Vec::new(),
        }
    }

    pub fn with_class_name(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.class_name = name.to_string();
        next
    }

    pub fn with_date(&self, date: &str) -> Self {
        let mut next = self.clone();
        next.attendance_date = date.to_string();
        next
    }

    pub fn with_student_added(&self) -> (Self, usize) {
        let mut next = self.clone();
        next.students.push(AttendanceRecord::blank());
        let index = next.students.len() - 1;
        (next, index)
    }

    pub fn with_student_updated(
        &self,
        index: usize,
        patch: &AttendancePatch,
    ) -> Result<Self, SessionError> {
        let mut next = self.clone();
        let row = next
            .students
            .get_mut(index)
            .ok_or(SessionError::RowNotFound(index))?;
        if let Some(name) = &patch.name {
            row.name = name.clone();
        }
        if let Some(prn) = &patch.prn {
            row.prn = prn.clone();
        }
        if let Some(division) = &patch.division {
            row.division = division.clone();
        }
        if let Some(status) = patch.status {
            row.status = status;
        }
        Ok(next)
    }

    pub fn validate_for_report(&self) -> Result<(), SessionError> {
        if self.class_name.trim().is_empty() {
            return Err(SessionError::MissingClassName);
        }
        Ok(())
    }
}

impl Default for AttendanceSheet {
    fn default() -> Self {
        Self::new()
    }
}
