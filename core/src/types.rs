//! Inventory type definitions for classified sysCheck reports.
//!
//! The types serialize with [`serde`] so a finished inventory can be emitted
//! as JSON or YAML next to the human-readable summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder used for singleton facts the report never mentioned.
pub const UNKNOWN: &str = "Unknown";

/// Release channel of a d2x custom IOS build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseChannel {
    Beta,
    Final,
}

impl ReleaseChannel {
    /// Parses the literal channel token used in d2x version strings.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "beta" => Some(Self::Beta),
            "final" => Some(Self::Final),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beta => "beta",
            Self::Final => "final",
        }
    }
}

impl std::fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version metadata of a d2x custom IOS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D2xDetail {
    /// Slot id of the retail IOS the custom IOS was built on.
    pub base_slot_id: u16,
    /// Version token such as `v10`.
    pub version: String,
    /// Release channel, when the version string names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_channel: Option<ReleaseChannel>,
    /// Beta number and `-alt` flag following the channel (may be empty).
    #[serde(default)]
    pub beta_suffix: String,
}

/// Classification of one firmware slot.
///
/// Exactly one variant applies per classified slot. Custom-firmware families
/// carry the metadata sysCheck printed for them; the remaining variants carry
/// nothing.
///
/// # Examples
///
/// ```
/// use syscheck_core::FirmwareVariant;
///
/// let hermes = FirmwareVariant::CustomHermes { info: "hermes-v5.1".into() };
/// assert!(hermes.is_custom());
/// assert!(!FirmwareVariant::BootloaderInstall.is_custom());
/// assert!(FirmwareVariant::BootloaderInstall.counts_as_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum FirmwareVariant {
    /// Slot exists but is a non-functional placeholder.
    Stub,
    /// Unmodified, working retail IOS.
    Active,
    /// d2x custom IOS.
    CustomD2x(D2xDetail),
    /// Hermes custom IOS with its free-text info payload.
    CustomHermes { info: String },
    /// Waninkoko custom IOS with its free-text info payload.
    CustomWanikoko { info: String },
    /// Patched IOS from an unrecognized family.
    CustomUnknown { info: String },
    /// BootMii installed as an IOS.
    BootloaderInstall,
}

impl FirmwareVariant {
    /// Returns `true` for every custom-firmware family.
    pub fn is_custom(&self) -> bool {
        matches!(
            self,
            Self::CustomD2x(_)
                | Self::CustomHermes { .. }
                | Self::CustomWanikoko { .. }
                | Self::CustomUnknown { .. }
        )
    }

    /// Returns `true` for slots counted as active in aggregate statistics.
    pub fn counts_as_active(&self) -> bool {
        matches!(self, Self::Active | Self::BootloaderInstall)
    }

    /// Short snake_case label, matching the serialized tag.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stub => "stub",
            Self::Active => "active",
            Self::CustomD2x(_) => "custom_d2x",
            Self::CustomHermes { .. } => "custom_hermes",
            Self::CustomWanikoko { .. } => "custom_wanikoko",
            Self::CustomUnknown { .. } => "custom_unknown",
            Self::BootloaderInstall => "bootloader_install",
        }
    }
}

/// One classified firmware slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntry {
    /// Numeric slot id (0-999).
    pub slot_id: u16,
    #[serde(flatten)]
    pub variant: FirmwareVariant,
}

impl SlotEntry {
    pub fn new(slot_id: u16, variant: FirmwareVariant) -> Self {
        Self { slot_id, variant }
    }
}

/// Region the console was sold in, when the report says it was changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OriginalRegion {
    /// No region change was reported.
    #[default]
    Unchanged,
    /// The region printed in the `(original region: ...)` note.
    Changed(String),
}

/// Raw aggregate counts over the classified slots of a [`ReportResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotStatistics {
    pub total: usize,
    pub stubs: usize,
    /// Active slots, BootMii installs included.
    pub active: usize,
    pub custom: usize,
}

impl SlotStatistics {
    /// Slots that are not stubs; the denominator of the custom percentage.
    pub fn non_stub(&self) -> usize {
        self.total - self.stubs
    }
}

/// Inventory produced by one classification run over a sysCheck report.
///
/// Created empty at the start of a run and filled by a single forward pass
/// over the report lines. Singleton facts keep their [`UNKNOWN`] defaults
/// when the report never mentions them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    /// Classified slots keyed by slot id.
    pub slots: BTreeMap<u16, SlotEntry>,
    pub system_menu_version: String,
    pub homebrew_channel_version: String,
    /// Slot the Homebrew Channel runs on, `0` when not found.
    pub homebrew_channel_slot: u16,
    pub priiloader_installed: bool,
    pub current_region: String,
    pub original_region: OriginalRegion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_date: Option<String>,
}

impl Default for ReportResult {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
            system_menu_version: UNKNOWN.to_string(),
            homebrew_channel_version: UNKNOWN.to_string(),
            homebrew_channel_slot: 0,
            priiloader_installed: false,
            current_region: UNKNOWN.to_string(),
            original_region: OriginalRegion::Unchanged,
            drive_date: None,
        }
    }
}

impl ReportResult {
    /// Inserts or overwrites the entry for the entry's slot id.
    pub fn insert(&mut self, entry: SlotEntry) {
        self.slots.insert(entry.slot_id, entry);
    }

    /// Returns the entry for `slot_id`, if the report classified it.
    pub fn slot(&self, slot_id: u16) -> Option<&SlotEntry> {
        self.slots.get(&slot_id)
    }

    pub fn system_menu_known(&self) -> bool {
        self.system_menu_version != UNKNOWN
    }

    pub fn homebrew_channel_found(&self) -> bool {
        self.homebrew_channel_version != UNKNOWN
    }

    /// Returns the original region only when it differs from the current one.
    pub fn changed_original_region(&self) -> Option<&str> {
        match &self.original_region {
            OriginalRegion::Changed(region) if *region != self.current_region => {
                Some(region.as_str())
            }
            _ => None,
        }
    }

    /// Counts stubs, active and custom slots.
    pub fn statistics(&self) -> SlotStatistics {
        let mut stats = SlotStatistics {
            total: self.slots.len(),
            ..SlotStatistics::default()
        };
        for entry in self.slots.values() {
            if entry.variant == FirmwareVariant::Stub {
                stats.stubs += 1;
            } else if entry.variant.counts_as_active() {
                stats.active += 1;
            } else if entry.variant.is_custom() {
                stats.custom += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d2x_entry(slot_id: u16) -> SlotEntry {
        SlotEntry::new(
            slot_id,
            FirmwareVariant::CustomD2x(D2xDetail {
                base_slot_id: 56,
                version: "v10".to_string(),
                release_channel: Some(ReleaseChannel::Beta),
                beta_suffix: "52".to_string(),
            }),
        )
    }

    #[test]
    fn test_default_result_is_all_unknown() {
        let result = ReportResult::default();
        assert!(result.slots.is_empty());
        assert!(!result.system_menu_known());
        assert!(!result.homebrew_channel_found());
        assert_eq!(result.homebrew_channel_slot, 0);
        assert_eq!(result.current_region, UNKNOWN);
        assert_eq!(result.original_region, OriginalRegion::Unchanged);
        assert!(result.drive_date.is_none());
    }

    #[test]
    fn test_insert_overwrites_same_slot() {
        let mut result = ReportResult::default();
        result.insert(SlotEntry::new(58, FirmwareVariant::Active));
        result.insert(d2x_entry(58));
        assert_eq!(result.slots.len(), 1);
        assert!(result.slot(58).is_some_and(|e| e.variant.is_custom()));
    }

    #[test]
    fn test_statistics_counts_bootmii_as_active() {
        let mut result = ReportResult::default();
        result.insert(SlotEntry::new(9, FirmwareVariant::Stub));
        result.insert(SlotEntry::new(58, FirmwareVariant::Active));
        result.insert(SlotEntry::new(254, FirmwareVariant::BootloaderInstall));
        result.insert(d2x_entry(249));
        result.insert(SlotEntry::new(
            250,
            FirmwareVariant::CustomUnknown {
                info: "Generic custom firmware".to_string(),
            },
        ));

        let stats = result.statistics();
        assert_eq!(
            stats,
            SlotStatistics {
                total: 5,
                stubs: 1,
                active: 2,
                custom: 2,
            }
        );
        assert_eq!(stats.non_stub(), 4);
    }

    #[test]
    fn test_changed_original_region_ignores_same_region() {
        let mut result = ReportResult {
            current_region: "PAL".to_string(),
            original_region: OriginalRegion::Changed("PAL".to_string()),
            ..ReportResult::default()
        };
        assert_eq!(result.changed_original_region(), None);

        result.original_region = OriginalRegion::Changed("NTSC-U".to_string());
        assert_eq!(result.changed_original_region(), Some("NTSC-U"));
    }

    #[test]
    fn test_variant_serializes_with_snake_case_tag() {
        let json = serde_json::to_string(&SlotEntry::new(250, FirmwareVariant::Stub)).unwrap();
        assert!(json.contains(r#""slot_id":250"#));
        assert!(json.contains(r#""variant":"stub""#));

        let json = serde_json::to_string(&d2x_entry(249)).unwrap();
        assert!(json.contains(r#""variant":"custom_d2x""#));
        assert!(json.contains(r#""release_channel":"beta""#));
    }

    #[test]
    fn test_release_channel_tokens() {
        assert_eq!(ReleaseChannel::from_token("beta"), Some(ReleaseChannel::Beta));
        assert_eq!(ReleaseChannel::from_token("final"), Some(ReleaseChannel::Final));
        assert_eq!(ReleaseChannel::from_token("rc"), None);
        assert_eq!(ReleaseChannel::Final.to_string(), "final");
    }
}
