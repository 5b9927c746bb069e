//! Intake policy for submitted reports.
//!
//! The checks a front end applies before handing a report to the
//! classifier: no images, a byte cap, and optionally a filename marker.
//! Transport, temporary storage and cleanup belong to the front end.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::config::IntakeConfig;
use crate::error::Result;

/// Why a submitted report was turned away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeRejection {
    #[error("attachment is an image")]
    Image,
    #[error("report is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
    #[error("filename {filename:?} does not contain {marker:?}")]
    MissingFilenameMarker { filename: String, marker: String },
}

/// Metadata of a submitted report, as seen by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission<'a> {
    pub filename: &'a str,
    pub size: u64,
    pub is_image: bool,
}

/// Applies an [`IntakeConfig`] to submissions.
#[derive(Debug, Clone)]
pub struct IntakePolicy<'a> {
    config: &'a IntakeConfig,
}

impl<'a> IntakePolicy<'a> {
    pub fn new(config: &'a IntakeConfig) -> Self {
        Self { config }
    }

    /// Checks one submission against the policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use syscheck_analyzer::config::IntakeConfig;
    /// use syscheck_analyzer::intake::{IntakePolicy, IntakeRejection, Submission};
    ///
    /// let config = IntakeConfig::default();
    /// let policy = IntakePolicy::new(&config);
    /// let ok = Submission { filename: "sysCheck.csv", size: 4096, is_image: false };
    /// assert!(policy.check(&ok).is_ok());
    ///
    /// let big = Submission { size: 20_000, ..ok };
    /// assert!(matches!(policy.check(&big), Err(IntakeRejection::TooLarge { .. })));
    /// ```
    pub fn check(&self, submission: &Submission<'_>) -> std::result::Result<(), IntakeRejection> {
        if self.config.reject_images && submission.is_image {
            return Err(IntakeRejection::Image);
        }
        if submission.size > self.config.max_report_bytes {
            return Err(IntakeRejection::TooLarge {
                size: submission.size,
                limit: self.config.max_report_bytes,
            });
        }
        if self.config.require_filename_marker
            && !submission
                .filename
                .to_ascii_lowercase()
                .contains(&self.config.filename_marker.to_ascii_lowercase())
        {
            return Err(IntakeRejection::MissingFilenameMarker {
                filename: submission.filename.to_string(),
                marker: self.config.filename_marker.clone(),
            });
        }
        Ok(())
    }
}

/// Reads a report file after checking it against the intake policy.
///
/// The file is closed before returning on every path. At most
/// `max_report_bytes` are read even if the file grows after the check.
///
/// # Errors
///
/// [`Rejected`](crate::AnalyzeError::Rejected) when the policy refuses the
/// file, [`Io`](crate::AnalyzeError::Io) on read failures.
pub fn read_report(path: impl AsRef<Path>, config: &IntakeConfig) -> Result<String> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    IntakePolicy::new(config).check(&Submission {
        filename: &filename,
        size,
        is_image: false,
    })?;

    let mut bytes = Vec::with_capacity(size as usize);
    BufReader::new(file)
        .take(config.max_report_bytes)
        .read_to_end(&mut bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read report");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
