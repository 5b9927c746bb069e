//! Output formatting for analyzed reports.

use serde::Serialize;
use syscheck_core::{ReportResult, SlotStatistics};

use crate::error::Result;
use crate::synthesize::synthesize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// The synthesized human-readable summary.
    #[default]
    Text,
    Json,
    Yaml,
}

/// Machine-readable view of one analyzed report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument<'a> {
    pub result: &'a ReportResult,
    pub statistics: SlotStatistics,
    pub summary: String,
}

impl<'a> ReportDocument<'a> {
    pub fn new(result: &'a ReportResult) -> Self {
        Self {
            result,
            statistics: result.statistics(),
            summary: synthesize(result),
        }
    }
}

/// Formats an analyzed report in the requested output format.
pub fn format_report(result: &ReportResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(synthesize(result)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ReportDocument::new(result))?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&ReportDocument::new(result))?),
    }
}
