//! Classification and summary of sysCheck firmware reports.
//!
//! This crate turns the text dump produced by sysCheck into a structured
//! firmware inventory ([`ReportResult`]) and a readable health summary.
//! Processing runs in one synchronous forward pass with no shared state, so
//! independent reports can be analyzed concurrently.
//!
//! # Pipeline
//!
//! - [`catalog`] — literal markers, structured patterns, System Menu table.
//! - [`extract`] — per-line facts.
//! - [`classify`] — per-slot taxonomy and marker precedence.
//! - [`accumulate`] — folds lines into a [`ReportResult`].
//! - [`synthesize`] — renders the summary and statistics.
//!
//! # Example
//!
//! ```
//! use syscheck_analyzer::summarize_text;
//!
//! let report = "\
//! System Menu 4.3E (v514)
//! IOS249 (rev 65535): No Patches
//! IOS250 (rev 65280): Stub
//! ";
//!
//! let summary = summarize_text(report).unwrap();
//! assert!(summary.contains("System Menu version 4.3 running on IOS 80"));
//! assert!(summary.contains("Stubbed IOS: 1 (50.00%)"));
//! ```
//!
//! [`ReportResult`]: syscheck_core::ReportResult

pub mod accumulate;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod intake;
pub mod output;
pub mod synthesize;

use std::io::BufRead;
use std::path::Path;

use syscheck_core::ReportResult;

pub use error::{AnalyzeError, Result};

/// Classifies a sequence of report lines.
///
/// # Errors
///
/// [`AnalyzeError::UnsupportedInput`] for vWii reports and
/// [`AnalyzeError::MalformedMarker`] for half-recognized custom IOS lines.
pub fn analyze_lines<I, S>(lines: I) -> Result<ReportResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    accumulate::accumulate(lines)
}

/// Classifies every line read from `reader`.
pub fn analyze_reader<R: BufRead>(reader: R) -> Result<ReportResult> {
    accumulate::accumulate_reader(reader)
}

/// Renders the readable summary of an already classified report.
pub fn summarize(result: &ReportResult) -> String {
    synthesize::synthesize(result)
}

/// Classifies report text and renders its summary.
pub fn summarize_text(text: &str) -> Result<String> {
    let result = analyze_lines(text.lines())?;
    Ok(summarize(&result))
}

/// Reads a report file through the intake policy and classifies it.
pub fn analyze_file(path: impl AsRef<Path>, intake: &config::IntakeConfig) -> Result<ReportResult> {
    let text = intake::read_report(path, intake)?;
    analyze_lines(text.lines())
}

/// Reads, classifies and summarizes a report file.
pub fn summarize_file(path: impl AsRef<Path>, intake: &config::IntakeConfig) -> Result<String> {
    analyze_file(path, intake).map(|result| summarize(&result))
}
