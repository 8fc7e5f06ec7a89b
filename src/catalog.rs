//! Exam listings as the exams page shows them: tagged with status, filtered,
//! sorted and grouped.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::calc::{classify, days_until, ExamStatus};
use crate::model::ExamRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Name,
    Class,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamQuery {
    pub search: Option<String>,
    #[serde(alias = "class_id", deserialize_with = "de_class_filter")]
    pub class_id: Option<i64>,
    #[serde(deserialize_with = "de_status_filter")]
    pub status: Option<ExamStatus>,
    pub sort: SortKey,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FilterValue {
    Int(i64),
    Text(String),
}

fn is_all(raw: &str) -> bool {
    let t = raw.trim();
    t.is_empty() || t.eq_ignore_ascii_case("all")
}

/// `"all"`, blank or null mean no class filter; numeric strings are accepted.
fn de_class_filter<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FilterValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FilterValue::Int(n)) => Ok(Some(n)),
        Some(FilterValue::Text(s)) if is_all(&s) => Ok(None),
        Some(FilterValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| {
                D::Error::custom(format!("classId must be an integer or 'all', got {s:?}"))
            }),
    }
}

fn de_status_filter<'de, D>(deserializer: D) -> Result<Option<ExamStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if is_all(&s) => Ok(None),
        Some(s) => ExamStatus::parse(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unknown status {s:?}"))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamListing {
    #[serde(flatten)]
    pub exam: ExamRecord,
    pub status: ExamStatus,
    pub days_until: i64,
}

impl ExamListing {
    pub fn new(exam: ExamRecord, today: NaiveDate) -> Self {
        Self {
            status: classify(exam.exam_date, today),
            days_until: days_until(exam.exam_date, today),
            exam,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusGroups {
    pub upcoming: Vec<ExamListing>,
    pub ongoing: Vec<ExamListing>,
    pub completed: Vec<ExamListing>,
    pub counts: StatusCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub upcoming: usize,
    pub ongoing: usize,
    pub completed: usize,
}

fn matches_search(exam: &ExamRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    exam.exam_name.to_lowercase().contains(needle)
        || exam
            .subject_name
            .as_deref()
            .map(|s| s.to_lowercase().contains(needle))
            .unwrap_or(false)
}

fn compare(a: &ExamListing, b: &ExamListing, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.exam.exam_date.cmp(&b.exam.exam_date),
        SortKey::Name => a
            .exam
            .exam_name
            .to_lowercase()
            .cmp(&b.exam.exam_name.to_lowercase())
            .then_with(|| a.exam.exam_name.cmp(&b.exam.exam_name)),
        SortKey::Class => a.exam.class_id.cmp(&b.exam.class_id),
    }
}

/// Tag, filter and sort. The sort is stable, so ties keep input order.
pub fn list(exams: &[ExamRecord], today: NaiveDate, query: &ExamQuery) -> Vec<ExamListing> {
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    let mut out: Vec<ExamListing> = exams
        .iter()
        .filter(|e| matches_search(e, &needle))
        .filter(|e| query.class_id.map(|c| e.class_id == c).unwrap_or(true))
        .map(|e| ExamListing::new(e.clone(), today))
        .filter(|l| query.status.map(|s| l.status == s).unwrap_or(true))
        .collect();
    out.sort_by(|a, b| compare(a, b, query.sort));
    out
}

/// Split exams by status, each group in date order.
pub fn group_by_status(exams: &[ExamRecord], today: NaiveDate) -> StatusGroups {
    let mut groups = StatusGroups::default();
    for listing in list(exams, today, &ExamQuery::default()) {
        match listing.status {
            ExamStatus::Upcoming => groups.upcoming.push(listing),
            ExamStatus::Ongoing => groups.ongoing.push(listing),
            ExamStatus::Completed => groups.completed.push(listing),
        }
    }
    groups.counts = StatusCounts {
        upcoming: groups.upcoming.len(),
        ongoing: groups.ongoing.len(),
        completed: groups.completed.len(),
    };
    groups
}

pub fn distinct_classes(exams: &[ExamRecord]) -> Vec<i64> {
    exams
        .iter()
        .map(|e| e.class_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{date, exam};

    fn make(id: i64, name: &str, subject: &str, day: u32, class_id: i64) -> ExamRecord {
        let mut e = exam(100.0, 40.0);
        e.exam_id = id;
        e.exam_name = name.to_string();
        e.subject_name = Some(subject.to_string());
        e.exam_date = date(2024, 6, day);
        e.class_id = class_id;
        e
    }

    fn sample() -> Vec<ExamRecord> {
        vec![
            make(1, "Physics Final", "Physics", 15, 9),
            make(2, "algebra quiz", "Mathematics", 10, 7),
            make(3, "Chemistry Lab", "Chemistry", 1, 8),
            make(4, "Biology Midterm", "Biology", 20, 7),
        ]
    }

    fn ids(listings: &[ExamListing]) -> Vec<i64> {
        listings.iter().map(|l| l.exam.exam_id).collect()
    }

    #[test]
    fn default_query_sorts_by_date() {
        let out = list(&sample(), date(2024, 6, 10), &ExamQuery::default());
        assert_eq!(ids(&out), vec![3, 2, 1, 4]);
        assert_eq!(out[0].status, ExamStatus::Completed);
        assert_eq!(out[1].status, ExamStatus::Ongoing);
        assert_eq!(out[2].days_until, 5);
        assert_eq!(out[0].days_until, -9);
    }

    #[test]
    fn search_matches_name_or_subject_case_insensitively() {
        let q = ExamQuery {
            search: Some("  MATH ".to_string()),
            ..ExamQuery::default()
        };
        assert_eq!(ids(&list(&sample(), date(2024, 6, 10), &q)), vec![2]);

        let q = ExamQuery {
            search: Some("final".to_string()),
            ..ExamQuery::default()
        };
        assert_eq!(ids(&list(&sample(), date(2024, 6, 10), &q)), vec![1]);
    }

    #[test]
    fn class_and_status_filters_combine() {
        let q = ExamQuery {
            class_id: Some(7),
            status: Some(ExamStatus::Upcoming),
            ..ExamQuery::default()
        };
        assert_eq!(ids(&list(&sample(), date(2024, 6, 10), &q)), vec![4]);
    }

    #[test]
    fn status_filter_returns_only_that_status() {
        let q = ExamQuery {
            status: Some(ExamStatus::Completed),
            ..ExamQuery::default()
        };
        let out = list(&sample(), date(2024, 6, 16), &q);
        assert_eq!(ids(&out), vec![3, 2, 1]);
        assert!(out.iter().all(|l| l.status == ExamStatus::Completed));
    }

    #[test]
    fn name_and_class_sorts() {
        let today = date(2024, 6, 10);
        let by_name = ExamQuery {
            sort: SortKey::Name,
            ..ExamQuery::default()
        };
        assert_eq!(ids(&list(&sample(), today, &by_name)), vec![2, 4, 3, 1]);

        let by_class = ExamQuery {
            sort: SortKey::Class,
            ..ExamQuery::default()
        };
        // Stable: exams 2 and 4 share class 7 and keep input order.
        assert_eq!(ids(&list(&sample(), today, &by_class)), vec![2, 4, 3, 1]);
    }

    #[test]
    fn groups_partition_the_input() {
        let groups = group_by_status(&sample(), date(2024, 6, 10));
        assert_eq!(ids(&groups.upcoming), vec![1, 4]);
        assert_eq!(ids(&groups.ongoing), vec![2]);
        assert_eq!(ids(&groups.completed), vec![3]);
        let c = groups.counts;
        assert_eq!(c.upcoming + c.ongoing + c.completed, 4);
    }

    #[test]
    fn groups_are_in_date_order_not_input_order() {
        let exams = vec![
            make(5, "Late", "History", 28, 7),
            make(6, "Early", "History", 12, 7),
            make(7, "Old", "History", 5, 7),
            make(8, "Older", "History", 2, 7),
        ];
        let groups = group_by_status(&exams, date(2024, 6, 10));
        assert_eq!(ids(&groups.upcoming), vec![6, 5]);
        assert_eq!(ids(&groups.completed), vec![8, 7]);
        assert!(groups.ongoing.is_empty());
    }

    #[test]
    fn distinct_classes_sorted() {
        assert_eq!(distinct_classes(&sample()), vec![7, 8, 9]);
        assert!(distinct_classes(&[]).is_empty());
    }

    #[test]
    fn query_deserializes_from_page_params() {
        let q: ExamQuery = serde_json::from_value(serde_json::json!({
            "search": "lab",
            "classId": 8,
            "status": "completed",
            "sort": "name"
        }))
        .expect("query");
        assert_eq!(q.class_id, Some(8));
        assert_eq!(q.status, Some(ExamStatus::Completed));
        assert_eq!(q.sort, SortKey::Name);
    }

    #[test]
    fn all_means_no_filter() {
        let q: ExamQuery = serde_json::from_value(serde_json::json!({
            "classId": "all",
            "status": "ALL"
        }))
        .expect("query");
        assert_eq!(q, ExamQuery::default());

        let q: ExamQuery =
            serde_json::from_value(serde_json::json!({ "classId": "7" })).expect("query");
        assert_eq!(q.class_id, Some(7));

        assert!(serde_json::from_value::<ExamQuery>(serde_json::json!({ "status": "cancelled" }))
            .is_err());
    }
}
