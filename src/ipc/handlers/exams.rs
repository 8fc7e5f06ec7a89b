use crate::calc::{self, ExamStatus};
use crate::catalog::{self, ExamQuery};
use crate::ipc::error::{calc_err, err, ok};
use crate::ipc::params::{optional, required, required_date, today};
use crate::ipc::types::{AppState, Request};
use crate::model::{ExamRecord, ResultRecord};
use serde_json::json;

fn to_json<T: serde::Serialize>(
    req: &Request,
    value: &T,
) -> Result<serde_json::Value, serde_json::Value> {
    serde_json::to_value(value).map_err(|e| err(&req.id, "serialize_failed", e.to_string(), None))
}

fn handle_summary(req: &Request) -> Result<serde_json::Value, serde_json::Value> {
    let exam: ExamRecord = required(req, "exam")?;
    let results: Vec<ResultRecord> = required(req, "results")?;
    let summary = calc::summarize(&exam, &results).map_err(|e| calc_err(&req.id, &e))?;
    Ok(ok(&req.id, to_json(req, &summary)?))
}

fn handle_grade_distribution(req: &Request) -> Result<serde_json::Value, serde_json::Value> {
    let results: Vec<ResultRecord> = required(req, "results")?;
    Ok(ok(&req.id, to_json(req, &calc::distribution(&results))?))
}

fn handle_status(state: &AppState, req: &Request) -> Result<serde_json::Value, serde_json::Value> {
    let exam_date = required_date(req, "examDate")?;
    let today = today(state, req)?;
    Ok(ok(
        &req.id,
        json!({
            "status": calc::classify(exam_date, today),
            "daysUntil": calc::days_until(exam_date, today),
            "today": today.format("%Y-%m-%d").to_string(),
        }),
    ))
}

/// Everything the exam detail page shows, computed in one call.
fn handle_report(state: &AppState, req: &Request) -> Result<serde_json::Value, serde_json::Value> {
    let exam: ExamRecord = required(req, "exam")?;
    let results: Vec<ResultRecord> = required(req, "results")?;
    let today = today(state, req)?;

    let summary = calc::summarize(&exam, &results).map_err(|e| calc_err(&req.id, &e))?;
    let rows = calc::annotate(&exam, &results).map_err(|e| calc_err(&req.id, &e))?;
    let grades = calc::distribution(&results);
    let status: ExamStatus = calc::classify(exam.exam_date, today);

    Ok(ok(
        &req.id,
        json!({
            "exam": to_json(req, &exam)?,
            "status": status,
            "daysUntil": calc::days_until(exam.exam_date, today),
            "summary": to_json(req, &summary)?,
            "gradeDistribution": to_json(req, &grades)?,
            "rows": to_json(req, &rows)?,
        }),
    ))
}

fn handle_list(state: &AppState, req: &Request) -> Result<serde_json::Value, serde_json::Value> {
    let exams: Vec<ExamRecord> = required(req, "exams")?;
    let query: ExamQuery = optional(req, "query")?.unwrap_or_default();
    let today = today(state, req)?;
    let listings = catalog::list(&exams, today, &query);
    Ok(ok(
        &req.id,
        json!({
            "today": today.format("%Y-%m-%d").to_string(),
            "exams": to_json(req, &listings)?,
            "classes": catalog::distinct_classes(&exams),
        }),
    ))
}

fn handle_group_by_status(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, serde_json::Value> {
    let exams: Vec<ExamRecord> = required(req, "exams")?;
    let today = today(state, req)?;
    Ok(ok(&req.id, to_json(req, &catalog::group_by_status(&exams, today))?))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let resp = match req.method.as_str() {
        "exams.summary" => handle_summary(req),
        "exams.gradeDistribution" => handle_grade_distribution(req),
        "exams.status" => handle_status(state, req),
        "exams.report" => handle_report(state, req),
        "exams.list" => handle_list(state, req),
        "exams.groupByStatus" => handle_group_by_status(state, req),
        _ => return None,
    };
    Some(resp.unwrap_or_else(|e| e))
}
