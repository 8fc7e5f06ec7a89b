use serde::Serialize;

use super::{check_exam, mark_percent, CalcError};
use crate::model::{ExamRecord, ResultRecord};

/// One line of an exam's results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    #[serde(flatten)]
    pub result: ResultRecord,
    pub percentage: f64,
    pub passed: bool,
}

pub fn annotate(exam: &ExamRecord, results: &[ResultRecord]) -> Result<Vec<ResultRow>, CalcError> {
    check_exam(exam)?;
    results
        .iter()
        .map(|r| {
            if !r.marks_obtained.is_finite() {
                return Err(CalcError::InvalidMarks { label: r.label() });
            }
            Ok(ResultRow {
                result: r.clone(),
                percentage: mark_percent(exam, r.marks_obtained)?,
                passed: r.marks_obtained >= exam.passing_marks,
            })
        })
        .collect()
}
