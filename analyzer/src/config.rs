//! Analyzer configuration.
//!
//! YAML-serializable settings for the report intake boundary.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! intake:
//!   max_report_bytes: 10240
//!   filename_marker: syscheck
//!   require_filename_marker: false
//!   reject_images: true
//! ```

use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzeError, Result};

/// Largest report accepted by default (10 KiB).
pub const DEFAULT_MAX_REPORT_BYTES: u64 = 10 * 1024;
/// Substring a submitted filename must contain when the marker is required.
pub const DEFAULT_FILENAME_MARKER: &str = "syscheck";

/// Filters applied to a submitted report before it is classified.
///
/// # Examples
///
/// ```
/// # use syscheck_analyzer::config::IntakeConfig;
/// let intake = IntakeConfig::default();
/// assert_eq!(intake.max_report_bytes, 10240);
/// assert!(!intake.require_filename_marker);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Reports larger than this many bytes are rejected.
    pub max_report_bytes: u64,
    /// Case-insensitive substring expected in the submitted filename.
    pub filename_marker: String,
    /// Whether a filename without the marker is rejected.
    pub require_filename_marker: bool,
    /// Whether image attachments are rejected.
    pub reject_images: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_report_bytes: DEFAULT_MAX_REPORT_BYTES,
            filename_marker: DEFAULT_FILENAME_MARKER.to_string(),
            require_filename_marker: false,
            reject_images: true,
        }
    }
}

/// Top-level analyzer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    #[serde(default)]
    pub intake: IntakeConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            intake: IntakeConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// [`Io`](AnalyzeError::Io) if the file cannot be read,
    /// [`Yaml`](AnalyzeError::Yaml) if parsing fails, and
    /// [`Config`](AnalyzeError::Config) if a value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_yaml::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Rejects settings that would make every report unacceptable.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(AnalyzeError::Config("version cannot be empty".to_string()));
        }
        if self.intake.max_report_bytes == 0 {
            return Err(AnalyzeError::Config(
                "intake.max_report_bytes must be greater than zero".to_string(),
            ));
        }
        if self.intake.require_filename_marker && self.intake.filename_marker.trim().is_empty() {
            return Err(AnalyzeError::Config(
                "intake.filename_marker cannot be empty when required".to_string(),
            ));
        }
        Ok(())
    }
}
