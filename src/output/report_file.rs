//! JSON report files on disk
//!
//! Reports land at `<base>/<guild_id>/<category>.json`.

use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use log::debug;
use serde_json::{Map, Value};

use crate::error::Result;

/// Default output root, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Writes report payloads under a base directory, one folder per guild.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    base: PathBuf,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl ReportWriter {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Write `data` as `<category>.json` for the guild and return the
    /// absolute path. Any existing file is replaced.
    ///
    /// A `generatedAt` timestamp is placed first, followed by the fields of
    /// `data`. Non-object data is stored under a `data` key.
    pub fn write(&self, category: &str, data: Value, guild_id: &str) -> Result<PathBuf> {
        let dir = self.base.join(guild_id);
        std::fs::create_dir_all(&dir)?;

        let mut document = Map::new();
        document.insert(
            "generatedAt".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        match data {
            Value::Object(fields) => {
                for (key, value) in fields {
                    if key != "generatedAt" {
                        document.insert(key, value);
                    }
                }
            }
            other => {
                document.insert("data".to_string(), other);
            }
        }

        let path = dir.join(format!("{}.json", category));
        let contents = serde_json::to_string_pretty(&Value::Object(document))?;
        std::fs::write(&path, contents)?;
        debug!("Wrote {} report to {}", category, path.display());

        Ok(std::path::absolute(&path)?)
    }
}
