use serde_json::json;

use crate::calc::CalcError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Reply for a line that did not parse as a request; there is no id to echo.
pub fn bad_json(message: impl Into<String>) -> serde_json::Value {
    json!({
        "ok": false,
        "error": {
            "code": "bad_json",
            "message": message.into(),
        }
    })
}

pub fn calc_err(id: &str, e: &CalcError) -> serde_json::Value {
    tracing::warn!(id, code = e.code(), error = %e, "calculation rejected");
    let details = match e {
        CalcError::InvalidTotalMarks {
            exam_id,
            total_marks,
        } => json!({ "examId": exam_id, "totalMarks": total_marks }),
        CalcError::InvalidPassingMarks {
            exam_id,
            passing_marks,
            total_marks,
        } => json!({
            "examId": exam_id,
            "passingMarks": passing_marks,
            "totalMarks": total_marks,
        }),
        CalcError::InvalidMarks { label } => json!({ "record": label }),
        CalcError::StatisticOutOfRange { exam_id } => json!({ "examId": exam_id }),
    };
    err(id, e.code(), e.to_string(), Some(details))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelopes_echo_id() {
        let v = ok("7", json!({ "x": 1 }));
        assert_eq!(v["id"], "7");
        assert_eq!(v["ok"], true);
        assert_eq!(v["result"]["x"], 1);

        let v = err("8", "bad_params", "missing exam", None);
        assert_eq!(v["ok"], false);
        assert_eq!(v["error"]["code"], "bad_params");
        assert!(v["error"].get("details").is_none());
    }

    #[test]
    fn calc_errors_carry_details() {
        let e = CalcError::InvalidTotalMarks {
            exam_id: 3,
            total_marks: 0.0,
        };
        let v = calc_err("9", &e);
        assert_eq!(v["error"]["code"], "invalid_total_marks");
        assert_eq!(v["error"]["details"]["examId"], 3);
    }
}
