use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use thiserror::Error;

const MAX_OFFSET_MINUTES: i32 = 23 * 60 + 59;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySettings {
    pub log_level: String,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    telemetry: TelemetrySettings,
    utc_offset: FixedOffset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            telemetry: TelemetrySettings {
                log_level: "info".to_string(),
                json: false,
            },
            utc_offset: utc(),
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES" | "on" | "ON")
}

impl Settings {
    /// Read settings from the process environment (after `.env`, if any).
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut settings = Settings::default();

        if let Some(level) = get("EXAMSTATSD_LOG_LEVEL") {
            settings.telemetry.log_level = level;
        }
        if let Some(json) = get("EXAMSTATSD_LOG_JSON") {
            settings.telemetry.json = parse_bool(&json);
        }
        if let Some(raw) = get("EXAMSTATSD_UTC_OFFSET_MINUTES") {
            let invalid = || ConfigError::InvalidValue {
                field: "EXAMSTATSD_UTC_OFFSET_MINUTES",
                value: raw.clone(),
            };
            let minutes: i32 = raw.parse().map_err(|_| invalid())?;
            if minutes.abs() > MAX_OFFSET_MINUTES {
                return Err(invalid());
            }
            settings.utc_offset = FixedOffset::east_opt(minutes * 60).ok_or_else(invalid)?;
        }

        Ok(settings)
    }

    pub fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Human-readable form of the time zone used to derive "today".
    pub fn timezone_policy(&self) -> String {
        format!("UTC{}", self.utc_offset)
    }

    /// The current calendar date under the configured offset.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_are_utc_and_info() {
        let s = Settings::from_lookup(lookup(&[])).expect("settings");
        assert_eq!(s, Settings::default());
        assert_eq!(s.telemetry().log_level, "info");
        assert!(!s.telemetry().json);
        assert_eq!(s.utc_offset().local_minus_utc(), 0);
        assert_eq!(s.timezone_policy(), "UTC+00:00");
    }

    #[test]
    fn reads_overrides() {
        let s = Settings::from_lookup(lookup(&[
            ("EXAMSTATSD_LOG_LEVEL", "debug"),
            ("EXAMSTATSD_LOG_JSON", "yes"),
            ("EXAMSTATSD_UTC_OFFSET_MINUTES", "-300"),
        ]))
        .expect("settings");
        assert_eq!(s.telemetry().log_level, "debug");
        assert!(s.telemetry().json);
        assert_eq!(s.utc_offset().local_minus_utc(), -300 * 60);
        assert_eq!(s.timezone_policy(), "UTC-05:00");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let s = Settings::from_lookup(lookup(&[("EXAMSTATSD_LOG_LEVEL", "  ")])).expect("settings");
        assert_eq!(s.telemetry().log_level, "info");
    }

    #[test]
    fn rejects_bad_offsets() {
        for raw in ["abc", "1440", "-1500", "90.5"] {
            let err = Settings::from_lookup(lookup(&[("EXAMSTATSD_UTC_OFFSET_MINUTES", raw)]))
                .unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    field: "EXAMSTATSD_UTC_OFFSET_MINUTES",
                    value: raw.to_string()
                }
            );
        }
    }
}
