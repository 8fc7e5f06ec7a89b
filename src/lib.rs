//! Exam analytics for the school dashboard: summaries, grade distributions,
//! status labels and exam listings, plus the JSON-over-stdio sidecar that
//! serves them.

pub mod calc;
pub mod catalog;
pub mod config;
pub mod ipc;
pub mod model;
pub mod telemetry;
