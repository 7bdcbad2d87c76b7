use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const FA_MAX: f64 = 20.0;
pub const SA_MAX: f64 = 60.0;

/// One subject row on the grade form. Scores are clamped on entry
/// (`clamp_fa` / `clamp_sa`), so everything here assumes range-valid inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub fa1: f64,
    pub fa2: f64,
    pub sa: f64,
}

impl Subject {
    pub fn blank() -> Self {
        Self {
            id: generate_subject_id(),
            name: String::new(),
            fa1: 0.0,
            fa2: 0.0,
            sa: 0.0,
        }
    }
}

/// Session-unique subject identifier for list keys and lookups.
/// No persistence or global-uniqueness guarantee is needed.
pub fn generate_subject_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn clamp_fa(value: f64) -> f64 {
    value.clamp(0.0, FA_MAX)
}

pub fn clamp_sa(value: f64) -> f64 {
    value.clamp(0.0, SA_MAX)
}

pub fn calculate_total(subject: &Subject) -> f64 {
    subject.fa1 + subject.fa2 + subject.sa
}

/// Descending threshold table, first match wins. Boundary values belong to
/// the higher bucket (total 90 is a 10, not a 9).
const GRADE_POINT_THRESHOLDS: &[(f64, u32)] = &[
    (90.0, 10),
    (80.0, 9),
    (70.0, 8),
    (60.0, 7),
    (50.0, 6),
    (40.0, 5),
];

pub fn calculate_grade_point(total_marks: f64) -> u32 {
    for &(cutoff, point) in GRADE_POINT_THRESHOLDS {
        if total_marks >= cutoff {
            return point;
        }
    }
    0
}

const LETTER_GRADES: &[(u32, &str)] = &[
    (10, "A+"),
    (9, "A"),
    (8, "B+"),
    (7, "B"),
    (6, "C"),
    (5, "D"),
];

/// Exact-match letter lookup. Any grade point without an entry (0, and the
/// 1..=4 band the threshold table never produces) is an "F" by contract.
pub fn letter_grade(grade_point: u32) -> &'static str {
    LETTER_GRADES
        .iter()
        .find(|(gp, _)| *gp == grade_point)
        .map(|(_, letter)| *letter)
        .unwrap_or("F")
}

/// Arithmetic mean of per-subject grade points. An empty list is defined as
/// 0.0, not a division error.
pub fn calculate_gpa(subjects: &[Subject]) -> f64 {
    if subjects.is_empty() {
        return 0.0;
    }
    let sum: u32 = subjects
        .iter()
        .map(|s| calculate_grade_point(calculate_total(s)))
        .sum();
    f64::from(sum) / (subjects.len() as f64)
}
