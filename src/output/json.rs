//! JSON output formatting

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T> {
    /// Report category (roles, channels, ...)
    pub report: String,

    /// The report payload
    pub data: T,

    /// Metadata about the run
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    /// When the report was generated
    pub timestamp: String,

    /// CLI version
    pub version: String,
}

impl<T> JsonOutput<T> {
    /// Create a new JSON output with metadata
    pub fn new(report: impl Into<String>, data: T) -> Self {
        Self {
            report: report.into(),
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Format a report payload as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(report: &str, data: &T) -> Result<String, serde_json::Error> {
    let output = JsonOutput::new(report, data);
    serde_json::to_string_pretty(&output)
}
