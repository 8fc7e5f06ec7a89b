use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle label of an exam relative to a given day. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl ExamStatus {
    pub const ALL: [ExamStatus; 3] = [
        ExamStatus::Upcoming,
        ExamStatus::Ongoing,
        ExamStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExamStatus::Upcoming => "upcoming",
            ExamStatus::Ongoing => "ongoing",
            ExamStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Whole calendar days from `today` until `exam_date`; negative once it has passed.
pub fn days_until(exam_date: NaiveDate, today: NaiveDate) -> i64 {
    exam_date.signed_duration_since(today).num_days()
}

pub fn classify(exam_date: NaiveDate, today: NaiveDate) -> ExamStatus {
    match days_until(exam_date, today) {
        d if d > 0 => ExamStatus::Upcoming,
        0 => ExamStatus::Ongoing,
        _ => ExamStatus::Completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::date;

    #[test]
    fn june_scenario() {
        let today = date(2024, 6, 10);
        assert_eq!(classify(date(2024, 6, 15), today), ExamStatus::Upcoming);
        assert_eq!(classify(date(2024, 6, 10), today), ExamStatus::Ongoing);
        assert_eq!(classify(date(2024, 6, 1), today), ExamStatus::Completed);
    }

    #[test]
    fn one_day_either_side() {
        let today = date(2024, 2, 29);
        let tomorrow = today.succ_opt().expect("succ");
        let yesterday = today.pred_opt().expect("pred");
        assert_eq!(classify(tomorrow, today), ExamStatus::Upcoming);
        assert_eq!(classify(yesterday, today), ExamStatus::Completed);
        assert_eq!(days_until(tomorrow, today), 1);
        assert_eq!(days_until(yesterday, today), -1);
    }

    #[test]
    fn days_until_crosses_year_boundary() {
        assert_eq!(days_until(date(2025, 1, 2), date(2024, 12, 30)), 3);
        assert_eq!(days_until(date(2024, 12, 30), date(2025, 1, 2)), -3);
    }

    #[test]
    fn status_parse_is_lenient_about_case() {
        assert_eq!(ExamStatus::parse("Upcoming"), Some(ExamStatus::Upcoming));
        assert_eq!(ExamStatus::parse(" completed "), Some(ExamStatus::Completed));
        assert_eq!(ExamStatus::parse("cancelled"), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        let v = serde_json::to_value(ExamStatus::Ongoing).expect("serialize");
        assert_eq!(v, "ongoing");
    }
}
