//! Human-readable report synthesis.
//!
//! Renders a [`ReportResult`] into the summary lines sent back to whoever
//! submitted the report: headline facts, a diagnosis for each slot of
//! interest, and aggregate statistics.

use syscheck_core::{D2xDetail, FirmwareVariant, ReportResult, SlotStatistics};
use tracing::debug;

use crate::catalog;
use crate::error::{AnalyzeError, Result};

/// Renders the full summary, one fact per line.
///
/// Pure function of `result`: rendering the same result twice yields the
/// same string.
pub fn synthesize(result: &ReportResult) -> String {
    let mut lines = Vec::new();
    let system_menu_slot = catalog::system_menu_slot(&result.system_menu_version);

    lines.push(match system_menu_slot {
        Some(slot) => format!(
            "System Menu version {} running on IOS {slot}",
            result.system_menu_version
        ),
        None => format!(
            "System Menu version {} running on an unknown IOS",
            result.system_menu_version
        ),
    });

    lines.push(format!("Current region: {}", result.current_region));
    if let Some(original) = result.changed_original_region() {
        lines.push(format!("Original region: {original}"));
    }

    lines.push(format!(
        "Homebrew Channel version {} running on IOS {}",
        result.homebrew_channel_version, result.homebrew_channel_slot
    ));

    if let Some(date) = result.drive_date.as_deref() {
        lines.push(format!("Drive date: {date}"));
    }

    lines.push(if result.priiloader_installed {
        "Priiloader is installed".to_string()
    } else {
        "Priiloader is not installed".to_string()
    });

    for slot_id in diagnosed_slots(result, system_menu_slot) {
        lines.push(describe_slot(slot_id, result));
    }

    lines.extend(statistics_lines(&result.statistics()));
    lines.join("\n")
}

/// Slots diagnosed in the summary: the System Menu IOS, the Homebrew Channel
/// IOS unless it is the base slot, then every fixed interesting slot in order.
fn diagnosed_slots(result: &ReportResult, system_menu_slot: Option<u16>) -> Vec<u16> {
    let homebrew_slot = Some(result.homebrew_channel_slot)
        .filter(|_| result.homebrew_channel_found())
        .filter(|slot| *slot != catalog::BASE_SLOT_ID);

    system_menu_slot
        .into_iter()
        .chain(homebrew_slot)
        .chain(catalog::INTERESTING_SLOTS)
        .collect()
}

/// Renders the diagnosis line for one slot id.
pub fn describe_slot(slot_id: u16, result: &ReportResult) -> String {
    let Some(entry) = result.slot(slot_id) else {
        return format!("IOS {slot_id} not found in report");
    };
    match &entry.variant {
        FirmwareVariant::Stub => format!("IOS {slot_id}: Stubbed IOS"),
        FirmwareVariant::Active => format!("IOS {slot_id}: Active unmodified IOS"),
        FirmwareVariant::BootloaderInstall => format!("IOS {slot_id}: BootMii installed as IOS"),
        FirmwareVariant::CustomHermes { info } => {
            format!("IOS {slot_id}: Hermes firmware: {info}")
        }
        FirmwareVariant::CustomWanikoko { info } => {
            format!("IOS {slot_id}: Wanikoko firmware: {info}")
        }
        FirmwareVariant::CustomUnknown { info } => {
            format!("IOS {slot_id}: Custom firmware: {info}")
        }
        FirmwareVariant::CustomD2x(detail) => {
            format!("IOS {slot_id}: d2x firmware: {}", describe_d2x(detail))
        }
    }
}

fn describe_d2x(detail: &D2xDetail) -> String {
    let channel = detail
        .release_channel
        .map(|channel| channel.as_str())
        .unwrap_or_default();
    let release = format!("{channel}{}", detail.beta_suffix);
    let release = if release.is_empty() {
        "unspecified".to_string()
    } else {
        release
    };
    format!(
        "base IOS {} version {} release {release}",
        detail.base_slot_id, detail.version
    )
}

/// Computes `part` as a percentage of `whole`, rounded to two decimals.
///
/// # Errors
///
/// [`AnalyzeError::DivisionByZero`] when `whole` is zero.
///
/// # Examples
///
/// ```
/// use syscheck_analyzer::synthesize::percentage;
///
/// assert_eq!(percentage(1, 3, "stub share").unwrap(), 33.33);
/// assert!(percentage(1, 0, "stub share").is_err());
/// ```
pub fn percentage(part: usize, whole: usize, statistic: &'static str) -> Result<f64> {
    if whole == 0 {
        return Err(AnalyzeError::DivisionByZero { statistic });
    }
    let raw = part as f64 * 100.0 / whole as f64;
    Ok((raw * 100.0).round() / 100.0)
}

fn render_percentage(part: usize, whole: usize, statistic: &'static str) -> String {
    match percentage(part, whole, statistic) {
        Ok(value) => format!("{value:.2}%"),
        Err(err) => {
            debug!(error = %err, "Rendering statistic as n/a");
            "n/a".to_string()
        }
    }
}

fn statistics_lines(stats: &SlotStatistics) -> Vec<String> {
    vec![
        format!("Total IOS entries: {}", stats.total),
        format!(
            "Stubbed IOS: {} ({})",
            stats.stubs,
            render_percentage(stats.stubs, stats.total, "stub percentage")
        ),
        format!(
            "Active IOS: {} ({})",
            stats.active,
            render_percentage(stats.active, stats.total, "active percentage")
        ),
        // Custom share is measured against non-stub slots, unlike the two above.
        format!(
            "Custom IOS: {} ({} of non-stub)",
            stats.custom,
            render_percentage(stats.custom, stats.non_stub(), "custom percentage")
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use syscheck_core::{OriginalRegion, ReleaseChannel, SlotEntry};

    fn result_with(entries: Vec<SlotEntry>) -> ReportResult {
        let mut result = ReportResult::default();
        for entry in entries {
            result.insert(entry);
        }
        result
    }

    #[test]
    fn test_default_result_renders_unknowns_and_na() {
        let report = synthesize(&ReportResult::default());
        assert!(report.contains("System Menu version Unknown running on an unknown IOS"));
        assert!(report.contains("Current region: Unknown"));
        assert!(report.contains("Homebrew Channel version Unknown running on IOS 0"));
        assert!(report.contains("Priiloader is not installed"));
        assert!(report.contains("Total IOS entries: 0"));
        assert!(report.contains("Stubbed IOS: 0 (n/a)"));
        assert!(report.contains("Active IOS: 0 (n/a)"));
        assert!(report.contains("Custom IOS: 0 (n/a of non-stub)"));
        assert!(!report.contains("Drive date"));
    }

    #[test]
    fn test_diagnosis_keeps_fixed_list_after_homebrew_slot() {
        let result = ReportResult {
            system_menu_version: "4.3".to_string(),
            homebrew_channel_version: "1.1.2".to_string(),
            homebrew_channel_slot: 249,
            ..ReportResult::default()
        };
        assert_eq!(
            diagnosed_slots(&result, Some(80)),
            vec![80, 249, 58, 249, 250, 251, 254]
        );

        let on_base = ReportResult {
            homebrew_channel_version: "1.1.2".to_string(),
            homebrew_channel_slot: 58,
            ..ReportResult::default()
        };
        assert_eq!(diagnosed_slots(&on_base, None), catalog::INTERESTING_SLOTS.to_vec());
    }

    #[test]
    fn test_describe_slot_variants() {
        let result = result_with(vec![
            SlotEntry::new(58, FirmwareVariant::Active),
            SlotEntry::new(250, FirmwareVariant::Stub),
            SlotEntry::new(254, FirmwareVariant::BootloaderInstall),
            SlotEntry::new(
                251,
                FirmwareVariant::CustomHermes {
                    info: "hermes-v5.1".to_string(),
                },
            ),
            SlotEntry::new(
                249,
                FirmwareVariant::CustomD2x(D2xDetail {
                    base_slot_id: 56,
                    version: "v10".to_string(),
                    release_channel: Some(ReleaseChannel::Beta),
                    beta_suffix: "52".to_string(),
                }),
            ),
        ]);

        assert_eq!(describe_slot(58, &result), "IOS 58: Active unmodified IOS");
        assert_eq!(describe_slot(250, &result), "IOS 250: Stubbed IOS");
        assert_eq!(describe_slot(254, &result), "IOS 254: BootMii installed as IOS");
        assert_eq!(
            describe_slot(251, &result),
            "IOS 251: Hermes firmware: hermes-v5.1"
        );
        assert_eq!(
            describe_slot(249, &result),
            "IOS 249: d2x firmware: base IOS 56 version v10 release beta52"
        );
        assert_eq!(describe_slot(36, &result), "IOS 36 not found in report");
    }

    #[test]
    fn test_d2x_without_release_renders_unspecified() {
        let detail = D2xDetail {
            base_slot_id: 57,
            version: "v8".to_string(),
            release_channel: None,
            beta_suffix: String::new(),
        };
        assert_eq!(describe_d2x(&detail), "base IOS 57 version v8 release unspecified");
    }

    #[test]
    fn test_original_region_only_when_changed() {
        let mut result = ReportResult {
            current_region: "PAL".to_string(),
            ..ReportResult::default()
        };
        assert!(!synthesize(&result).contains("Original region"));

        result.original_region = OriginalRegion::Changed("NTSC-J".to_string());
        assert!(synthesize(&result).contains("Original region: NTSC-J"));
    }

    #[test]
    fn test_percentage_rounding_and_zero_denominator() {
        assert_eq!(percentage(2, 3, "x").unwrap(), 66.67);
        assert_eq!(percentage(0, 4, "x").unwrap(), 0.0);
        assert!(matches!(
            percentage(0, 0, "custom percentage"),
            Err(AnalyzeError::DivisionByZero {
                statistic: "custom percentage"
            })
        ));
    }

    #[test]
    fn test_all_stubs_renders_custom_as_na() {
        let result = result_with(vec![
            SlotEntry::new(4, FirmwareVariant::Stub),
            SlotEntry::new(10, FirmwareVariant::Stub),
        ]);
        let report = synthesize(&result);
        assert!(report.contains("Stubbed IOS: 2 (100.00%)"));
        assert!(report.contains("Active IOS: 0 (0.00%)"));
        assert!(report.contains("Custom IOS: 0 (n/a of non-stub)"));
    }

    #[test]
    fn test_synthesize_is_idempotent() {
        let result = result_with(vec![
            SlotEntry::new(58, FirmwareVariant::Active),
            SlotEntry::new(250, FirmwareVariant::Stub),
        ]);
        assert_eq!(synthesize(&result), synthesize(&result));
    }
}
