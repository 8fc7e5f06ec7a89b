use serde::Serialize;

use super::percent_of;
use crate::model::ResultRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    pub const ALL: [LetterGrade; 5] = [
        LetterGrade::A,
        LetterGrade::B,
        LetterGrade::C,
        LetterGrade::D,
        LetterGrade::F,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }

    /// Exact match only: "a" or " A" are not grades.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBucket {
    pub grade: LetterGrade,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeDistribution {
    pub buckets: Vec<GradeBucket>,
    pub total_results: usize,
    pub graded_count: usize,
    /// Sum of bucket percentages; below 100 when some grades are missing or unknown.
    pub coverage: f64,
}

pub fn distribution(results: &[ResultRecord]) -> GradeDistribution {
    let mut counts = [0usize; 5];
    for r in results {
        let Some(grade) = r.grade.as_deref().and_then(LetterGrade::from_label) else {
            continue;
        };
        counts[grade as usize] += 1;
    }

    let total_results = results.len();
    let pct = |count: usize| {
        if total_results == 0 {
            0.0
        } else {
            percent_of(count as f64, total_results as f64)
        }
    };

    let buckets: Vec<GradeBucket> = LetterGrade::ALL
        .into_iter()
        .zip(counts)
        .map(|(grade, count)| GradeBucket {
            grade,
            count,
            percentage: pct(count),
        })
        .collect();
    let graded_count: usize = counts.iter().sum();

    GradeDistribution {
        buckets,
        total_results,
        graded_count,
        coverage: pct(graded_count),
    }
}
