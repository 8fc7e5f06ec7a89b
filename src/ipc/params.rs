use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use super::error::err;
use super::types::{AppState, Request};
use crate::model::parse_calendar_date;

/// Deserialize `params.<key>`, or build a `bad_params` reply.
pub fn required<T: DeserializeOwned>(req: &Request, key: &str) -> Result<T, serde_json::Value> {
    let Some(raw) = req.params.get(key).filter(|v| !v.is_null()) else {
        return Err(err(&req.id, "bad_params", format!("missing {}", key), None));
    };
    serde_json::from_value(raw.clone())
        .map_err(|e| err(&req.id, "bad_params", format!("invalid {}: {}", key, e), None))
}

pub fn optional<T: DeserializeOwned>(
    req: &Request,
    key: &str,
) -> Result<Option<T>, serde_json::Value> {
    match req.params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(_) => required(req, key).map(Some),
    }
}

pub fn required_date(req: &Request, key: &str) -> Result<NaiveDate, serde_json::Value> {
    let raw: String = required(req, key)?;
    parse_calendar_date(&raw).ok_or_else(|| {
        err(
            &req.id,
            "bad_params",
            format!("{} must be a date, got {:?}", key, raw),
            None,
        )
    })
}

/// `params.today` when given; otherwise the clock, read once here at the boundary.
pub fn today(state: &AppState, req: &Request) -> Result<NaiveDate, serde_json::Value> {
    match req.params.get("today") {
        None => Ok(state.settings.today()),
        Some(v) if v.is_null() => Ok(state.settings.today()),
        Some(_) => required_date(req, "today"),
    }
}
