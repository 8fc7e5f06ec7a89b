use serde::Serialize;

use super::{check_exam, mark_percent, percent_of, CalcError};
use crate::model::{ExamRecord, ResultRecord};

/// Pass/fail and mark statistics for one exam.
///
/// The mark statistics are `None` when no results were supplied, so
/// "nobody sat the exam" never reads as "everybody scored zero".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub total_students: usize,
    pub passed: usize,
    pub failed: usize,
    pub average_marks: Option<f64>,
    pub highest_marks: Option<f64>,
    pub lowest_marks: Option<f64>,
    pub average_percentage: Option<f64>,
    /// Results scoring above the exam's total; kept as-is in every statistic.
    pub over_total_count: usize,
}

impl ExamSummary {
    fn empty() -> Self {
        Self {
            total_students: 0,
            passed: 0,
            failed: 0,
            average_marks: None,
            highest_marks: None,
            lowest_marks: None,
            average_percentage: None,
            over_total_count: 0,
        }
    }

    pub fn has_data(&self) -> bool {
        self.total_students > 0
    }

    pub fn pass_rate(&self) -> Option<f64> {
        if self.total_students == 0 {
            return None;
        }
        Some(percent_of(self.passed as f64, self.total_students as f64))
    }
}

/// Neumaier-compensated running sum.
#[derive(Debug, Default)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, v: f64) {
        let t = self.sum + v;
        if self.sum.abs() >= v.abs() {
            self.compensation += (self.sum - t) + v;
        } else {
            self.compensation += (v - t) + self.sum;
        }
        self.sum = t;
    }

    fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Summarize a result set against its exam.
///
/// Every result is assumed to belong to `exam`. A mark equal to the passing
/// threshold passes.
pub fn summarize(exam: &ExamRecord, results: &[ResultRecord]) -> Result<ExamSummary, CalcError> {
    check_exam(exam)?;
    if results.is_empty() {
        return Ok(ExamSummary::empty());
    }

    // Summing m / n keeps every partial sum within the largest |mark|.
    let n = results.len() as f64;
    let mut mean = CompensatedSum::default();
    let mut passed: usize = 0;
    let mut over_total_count: usize = 0;
    let mut highest = f64::NEG_INFINITY;
    let mut lowest = f64::INFINITY;

    for r in results {
        let m = r.marks_obtained;
        if !m.is_finite() {
            return Err(CalcError::InvalidMarks { label: r.label() });
        }
        if m >= exam.passing_marks {
            passed += 1;
        }
        if m > exam.total_marks {
            over_total_count += 1;
        }
        highest = highest.max(m);
        lowest = lowest.min(m);
        mean.add(m / n);
    }

    if over_total_count > 0 {
        tracing::warn!(
            exam_id = exam.exam_id,
            total_marks = exam.total_marks,
            count = over_total_count,
            "results exceed the exam's total marks"
        );
    }

    let total_students = results.len();
    let average = mean.total();
    if !average.is_finite() {
        return Err(CalcError::StatisticOutOfRange {
            exam_id: exam.exam_id,
        });
    }

    Ok(ExamSummary {
        total_students,
        passed,
        failed: total_students - passed,
        average_marks: Some(average),
        highest_marks: Some(highest),
        lowest_marks: Some(lowest),
        average_percentage: Some(mark_percent(exam, average)?),
        over_total_count,
    })
}
