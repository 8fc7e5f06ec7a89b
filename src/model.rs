//! Exam and result records as they arrive from the dashboard backend.
//!
//! The backend serializes dates with Flask's default encoder (RFC 2822) on
//! some routes and ISO dates on others, and emits decimal columns either as
//! numbers or as strings. Everything is normalized here so the calculators
//! only ever see typed values.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    #[serde(alias = "exam_id", deserialize_with = "de_i64")]
    pub exam_id: i64,
    #[serde(alias = "exam_name")]
    pub exam_name: String,
    #[serde(
        alias = "exam_date",
        deserialize_with = "de_calendar_date",
        serialize_with = "ser_calendar_date"
    )]
    pub exam_date: NaiveDate,
    #[serde(alias = "class_id", deserialize_with = "de_i64")]
    pub class_id: i64,
    #[serde(alias = "subject_id", deserialize_with = "de_i64")]
    pub subject_id: i64,
    #[serde(default, alias = "subject_name")]
    pub subject_name: Option<String>,
    #[serde(alias = "total_marks", deserialize_with = "de_f64")]
    pub total_marks: f64,
    #[serde(alias = "passing_marks", deserialize_with = "de_f64")]
    pub passing_marks: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(default, alias = "result_id", deserialize_with = "de_opt_i64")]
    pub result_id: Option<i64>,
    #[serde(alias = "exam_id", deserialize_with = "de_i64")]
    pub exam_id: i64,
    #[serde(alias = "student_id", deserialize_with = "de_i64")]
    pub student_id: i64,
    #[serde(alias = "marks_obtained", deserialize_with = "de_f64")]
    pub marks_obtained: f64,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl ResultRecord {
    /// Label used in error messages: the result id when saved, otherwise the student.
    pub fn label(&self) -> String {
        match self.result_id {
            Some(id) => format!("result {id}"),
            None => format!("student {}", self.student_id),
        }
    }
}

/// Parse a backend date into a UTC calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 and RFC 2822 timestamps.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(t) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    // `2024-06-10T00:00:00` without an offset: treat as UTC.
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    None
}

fn de_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
}

fn ser_calendar_date<S>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.format("%Y-%m-%d").to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

fn de_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("number out of range: {n}"))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

fn de_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("expected an integer id, got {n}"))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected an integer id, got {s:?}"))),
    }
}

fn de_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an integer id, got {n}"))),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an integer id, got {s:?}"))),
    }
}
