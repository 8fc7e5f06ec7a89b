use crate::calc;
use crate::ipc::error::{calc_err, err, ok};
use crate::ipc::params::required;
use crate::ipc::types::{AppState, Request};
use crate::model::{ExamRecord, ResultRecord};

fn handle_rows(req: &Request) -> Result<serde_json::Value, serde_json::Value> {
    let exam: ExamRecord = required(req, "exam")?;
    let results: Vec<ResultRecord> = required(req, "results")?;
    let rows = calc::annotate(&exam, &results).map_err(|e| calc_err(&req.id, &e))?;
    let value = serde_json::to_value(&rows)
        .map_err(|e| err(&req.id, "serialize_failed", e.to_string(), None))?;
    Ok(ok(&req.id, value))
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "results.rows" => Some(handle_rows(req).unwrap_or_else(|e| e)),
        _ => None,
    }
}
