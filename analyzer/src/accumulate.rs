//! Report accumulation.
//!
//! Folds report lines into a [`ReportResult`] in a single forward pass. The
//! [`ReportAccumulator`] owns the result while lines are pushed and hands it
//! off by value from [`ReportAccumulator::finish`].

use std::io::BufRead;

use syscheck_core::{OriginalRegion, ReportResult};
use tracing::{debug, warn};

use crate::classify::classify;
use crate::error::{AnalyzeError, Result};
use crate::extract::extract;

/// Mutable state of one classification run.
#[derive(Debug, Default)]
pub struct ReportAccumulator {
    result: ReportResult,
    system_menu_seen: bool,
    homebrew_channel_seen: bool,
    region_seen: bool,
    lines_seen: usize,
}

impl ReportAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one line into the result.
    ///
    /// Singleton facts are captured from the first line that carries them.
    /// A line with a slot id may overwrite that slot's previous entry.
    ///
    /// # Errors
    ///
    /// [`AnalyzeError::UnsupportedInput`] on a vIOS marker, and any
    /// classification error for the line's slot.
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        self.lines_seen += 1;
        let facts = extract(line);

        if facts.markers.vios {
            warn!(line = self.lines_seen, "vIOS marker found, aborting classification");
            return Err(AnalyzeError::UnsupportedInput);
        }

        if !self.system_menu_seen {
            if let Some(version) = facts.system_menu.as_ref() {
                debug!(version = %version, "Captured System Menu version");
                self.result.system_menu_version = version.clone();
                self.system_menu_seen = true;
            }
        }

        if !self.homebrew_channel_seen {
            if let Some(hbc) = facts.homebrew_channel.as_ref() {
                debug!(version = %hbc.version, slot_id = hbc.slot_id, "Captured Homebrew Channel");
                self.result.homebrew_channel_version = hbc.version.clone();
                self.result.homebrew_channel_slot = hbc.slot_id;
                self.homebrew_channel_seen = true;
            }
        }

        if !self.region_seen {
            if let Some(region) = facts.region.as_ref() {
                debug!(current = %region.current, original = ?region.original, "Captured region");
                self.result.current_region = region.current.clone();
                if let Some(original) = region.original.as_ref() {
                    self.result.original_region = OriginalRegion::Changed(original.clone());
                }
                self.region_seen = true;
            }
        }

        if self.result.drive_date.is_none() {
            self.result.drive_date = facts.drive_date.clone();
        }

        if facts.markers.priiloader {
            self.result.priiloader_installed = true;
        }

        if let Some(slot_id) = facts.slot_id {
            if let Some(entry) = classify(slot_id, &facts)? {
                self.result.insert(entry);
            }
        }

        Ok(())
    }

    /// Number of lines pushed so far.
    pub fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    /// Ends the run and hands off the finished result.
    pub fn finish(self) -> ReportResult {
        debug!(
            lines = self.lines_seen,
            slots = self.result.slots.len(),
            "Finished report accumulation"
        );
        self.result
    }
}

/// Classifies a sequence of report lines.
///
/// # Examples
///
/// ```
/// use syscheck_analyzer::accumulate::accumulate;
/// use syscheck_core::FirmwareVariant;
///
/// let result = accumulate([
///     "IOS249 (rev 65535): No Patches",
///     "IOS250 (rev 65280): Stub",
/// ])
/// .unwrap();
/// assert_eq!(result.slot(249).unwrap().variant, FirmwareVariant::Active);
/// assert_eq!(result.slot(250).unwrap().variant, FirmwareVariant::Stub);
/// ```
///
/// # Errors
///
/// Stops at the first vIOS marker with [`AnalyzeError::UnsupportedInput`];
/// no partial result is returned.
pub fn accumulate<I, S>(lines: I) -> Result<ReportResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut accumulator = ReportAccumulator::new();
    for line in lines {
        accumulator.push_line(line.as_ref())?;
    }
    Ok(accumulator.finish())
}

/// Classifies every line read from `reader`.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn accumulate_reader<R: BufRead>(mut reader: R) -> Result<ReportResult> {
    let mut accumulator = ReportAccumulator::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        accumulator.push_line(line.trim_end_matches(['\r', '\n']))?;
    }
    Ok(accumulator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syscheck_core::{FirmwareVariant, UNKNOWN};

    #[test]
    fn test_empty_input_yields_defaults() {
        let result = accumulate(Vec::<String>::new()).unwrap();
        assert_eq!(result, ReportResult::default());
    }

    #[test]
    fn test_singletons_first_match_wins() {
        let result = accumulate([
            "System Menu 4.3E (v514)",
            "System Menu 4.1U (v449)",
            "Homebrew Channel 1.1.2 running on IOS58",
            "Homebrew Channel 1.0.8 running on IOS61",
            "Region: PAL",
            "Region: NTSC-U (original region: NTSC-J)",
            "Drive date: 2009.03.30",
            "Drive date: 2011.01.01",
        ])
        .unwrap();

        assert_eq!(result.system_menu_version, "4.3");
        assert_eq!(result.homebrew_channel_version, "1.1.2");
        assert_eq!(result.homebrew_channel_slot, 58);
        assert_eq!(result.current_region, "PAL");
        assert_eq!(result.original_region, OriginalRegion::Unchanged);
        assert_eq!(result.drive_date.as_deref(), Some("2009.03.30"));
    }

    #[test]
    fn test_original_region_captured_from_same_line() {
        let result = accumulate(["Region: NTSC-U (original region: PAL)"]).unwrap();
        assert_eq!(result.current_region, "NTSC-U");
        assert_eq!(
            result.original_region,
            OriginalRegion::Changed("PAL".to_string())
        );
    }

    #[test]
    fn test_later_line_overwrites_slot() {
        let result = accumulate([
            "IOS249 (rev 1): No Patches",
            "IOS249 (rev 2): Stub",
        ])
        .unwrap();
        assert_eq!(result.slots.len(), 1);
        assert_eq!(result.slot(249).unwrap().variant, FirmwareVariant::Stub);
    }

    #[test]
    fn test_unmarked_slot_line_keeps_previous_entry() {
        let result = accumulate([
            "IOS58 (rev 6176): USB 2.0",
            "Homebrew Channel 1.1.2 running on IOS58",
        ])
        .unwrap();
        assert_eq!(result.slot(58).unwrap().variant, FirmwareVariant::Active);
    }

    #[test]
    fn test_priiloader_detected() {
        let result = accumulate(["Priiloader installed"]).unwrap();
        assert!(result.priiloader_installed);
        assert_eq!(result.system_menu_version, UNKNOWN);
    }

    #[test]
    fn test_vios_anywhere_aborts() {
        let lines = [
            "System Menu 4.3E (v514)",
            "IOS58 (rev 6176): USB 2.0",
            "vIOS80 (rev 7200): No Patches",
            "IOS249 (rev 1): No Patches",
        ];
        assert!(matches!(accumulate(lines), Err(AnalyzeError::UnsupportedInput)));

        let trailing = ["IOS58 (rev 6176): USB 2.0", "Console: vIOS"];
        assert!(matches!(accumulate(trailing), Err(AnalyzeError::UnsupportedInput)));
    }

    #[test]
    fn test_reader_handles_crlf_and_invalid_utf8() {
        let raw: &[u8] = b"System Menu 4.2U (v481)\r\nIOS250 (rev 65280): Stub\r\n\xff\xfe\n";
        let result = accumulate_reader(raw).unwrap();
        assert_eq!(result.system_menu_version, "4.2");
        assert_eq!(result.slot(250).unwrap().variant, FirmwareVariant::Stub);
    }

    #[test]
    fn test_lines_seen_counts_pushed_lines() {
        let mut accumulator = ReportAccumulator::new();
        accumulator.push_line("a").unwrap();
        accumulator.push_line("b").unwrap();
        assert_eq!(accumulator.lines_seen(), 2);
    }
}
