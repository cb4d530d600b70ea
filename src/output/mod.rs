//! Output formatting for reports

pub mod export;
pub mod formatters;
pub mod json;
pub mod report_file;

pub use report_file::ReportWriter;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and copy-paste exports
    #[default]
    Pretty,
    /// Report payloads as JSON, for scripts
    Json,
}
