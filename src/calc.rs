//! Exam statistics: pass/fail summaries, grade distributions, per-result rows
//! and date-derived status.
//!
//! Everything in here is a pure function of its arguments. "Today" is always
//! passed in; nothing reads the clock.

mod grades;
mod rows;
mod status;
mod summary;

pub use grades::{distribution, GradeBucket, GradeDistribution, LetterGrade};
pub use rows::{annotate, ResultRow};
pub use status::{classify, days_until, ExamStatus};
pub use summary::{summarize, ExamSummary};

use crate::model::ExamRecord;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("exam {exam_id} has total marks {total_marks}; expected a positive number")]
    InvalidTotalMarks { exam_id: i64, total_marks: f64 },
    #[error("exam {exam_id} has passing marks {passing_marks} outside 0..={total_marks}")]
    InvalidPassingMarks {
        exam_id: i64,
        passing_marks: f64,
        total_marks: f64,
    },
    #[error("{label} has non-numeric marks")]
    InvalidMarks { label: String },
    #[error("exam {exam_id} statistics are out of numeric range")]
    StatisticOutOfRange { exam_id: i64 },
}

impl CalcError {
    /// Stable machine-readable code used in IPC error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            CalcError::InvalidTotalMarks { .. } => "invalid_total_marks",
            CalcError::InvalidPassingMarks { .. } => "invalid_passing_marks",
            CalcError::InvalidMarks { .. } => "invalid_marks",
            CalcError::StatisticOutOfRange { .. } => "statistic_out_of_range",
        }
    }
}

/// An exam whose marks scale can be used as a denominator.
pub(crate) fn check_exam(exam: &ExamRecord) -> Result<(), CalcError> {
    if !exam.total_marks.is_finite() || exam.total_marks <= 0.0 {
        return Err(CalcError::InvalidTotalMarks {
            exam_id: exam.exam_id,
            total_marks: exam.total_marks,
        });
    }
    if !exam.passing_marks.is_finite()
        || exam.passing_marks < 0.0
        || exam.passing_marks > exam.total_marks
    {
        return Err(CalcError::InvalidPassingMarks {
            exam_id: exam.exam_id,
            passing_marks: exam.passing_marks,
            total_marks: exam.total_marks,
        });
    }
    Ok(())
}

pub(crate) fn percent_of(value: f64, out_of: f64) -> f64 {
    100.0 * value / out_of
}

/// Marks as a percentage of the exam total, divided before scaling so marks
/// near `f64::MAX` stay finite.
pub(crate) fn mark_percent(exam: &ExamRecord, marks: f64) -> Result<f64, CalcError> {
    let pct = marks / exam.total_marks * 100.0;
    if !pct.is_finite() {
        return Err(CalcError::StatisticOutOfRange {
            exam_id: exam.exam_id,
        });
    }
    Ok(pct)
}
