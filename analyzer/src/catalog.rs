//! Marker catalog for sysCheck reports.
//!
//! Literal substrings and structured patterns that identify meaningful lines,
//! plus the table mapping System Menu versions to the IOS they run on.
//! Substring markers are case-sensitive.

use regex::Regex;
use std::sync::LazyLock;

pub const STUB: &str = "Stub";
pub const NO_PATCHES: &str = "No Patches";
/// Storage-access patch. Retail IOS58 reports it without being modified.
pub const USB_2_0: &str = "USB 2.0";
pub const NAND_ACCESS: &str = "NAND Access";
pub const ES_IDENTIFY: &str = "ES Identify";
pub const TRUCHA_BUG: &str = "Trucha Bug";
pub const D2X: &str = "d2x";
pub const HERMES: &str = "hermes";
pub const WANIKOKO: &str = "wanikoko";
pub const PRIILOADER: &str = "Priiloader installed";
pub const BOOTMII: &str = "BootMii";
pub const VIOS: &str = "vIOS";

/// Payload recorded for patched IOS from an unrecognized family.
pub const GENERIC_CUSTOM_INFO: &str = "Generic custom firmware";

/// Retail IOS that legitimately carries the `USB 2.0` marker.
pub const BASE_SLOT_ID: u16 = 58;
/// Slot BootMii occupies when installed as an IOS.
pub const BOOTMII_SLOT_ID: u16 = 254;
/// Slots always diagnosed in the summary, in report order.
pub const INTERESTING_SLOTS: [u16; 5] = [58, 249, 250, 251, 254];

const SYSTEM_MENU_SLOTS: [(&str, u16); 14] = [
    ("4.3", 80),
    ("4.2", 70),
    ("4.1", 60),
    ("4.0", 60),
    ("3.5", 52),
    ("3.4", 50),
    ("3.3", 30),
    ("3.2", 30),
    ("3.1", 30),
    ("3.0", 30),
    ("2.2", 20),
    ("2.1", 11),
    ("2.0", 11),
    ("1.0", 9),
];

/// Returns the IOS slot a System Menu version runs on, if the version is known.
///
/// # Examples
///
/// ```
/// use syscheck_analyzer::catalog::system_menu_slot;
///
/// assert_eq!(system_menu_slot("4.3"), Some(80));
/// assert_eq!(system_menu_slot("5.0"), None);
/// ```
pub fn system_menu_slot(version: &str) -> Option<u16> {
    SYSTEM_MENU_SLOTS
        .iter()
        .find(|(known, _)| *known == version)
        .map(|(_, slot)| *slot)
}

/// Compiled structured patterns.
pub(crate) static PATTERNS: LazyLock<ReportPatterns> = LazyLock::new(ReportPatterns::new);

pub(crate) struct ReportPatterns {
    /// `IOS249` -> group 1 slot id.
    pub(crate) slot_id: Regex,
    /// `IOS249[56]` -> group 2 base slot id.
    pub(crate) custom_base: Regex,
    /// `d2x-v10-beta52-alt` -> version, channel, beta suffix.
    pub(crate) d2x_version: Regex,
    /// `Info: ...)` -> free-text payload.
    pub(crate) info: Regex,
    pub(crate) system_menu: Regex,
    /// Homebrew Channel version and the IOS it runs on.
    pub(crate) homebrew_channel: Regex,
    pub(crate) region: Regex,
    pub(crate) original_region: Regex,
    pub(crate) drive_date: Regex,
}

impl ReportPatterns {
    fn new() -> Self {
        // All regexes here are compile-time constants. An expect() failure indicates
        // a programmer error in the pattern, not a runtime condition.
        Self {
            slot_id: Regex::new(r"IOS([0-9]{1,3})\b").expect("static regex must compile"),
            custom_base: Regex::new(r"IOS([0-9]{1,3})\[([0-9]{1,3})\]")
                .expect("static regex must compile"),
            d2x_version: Regex::new(r"d2x-(v[0-9]{1,2})-?(beta|final)?([0-9]{0,2}(?:-alt)?)")
                .expect("static regex must compile"),
            info: Regex::new(r"Info: (.*)\)").expect("static regex must compile"),
            system_menu: Regex::new(r"System Menu (.\..)").expect("static regex must compile"),
            homebrew_channel: Regex::new(r"Homebrew Channel (.*) running on IOS([0-9]{1,3})\b")
                .expect("static regex must compile"),
            region: Regex::new(r"Region: (\w*(?:-.)?)").expect("static regex must compile"),
            original_region: Regex::new(r"\(original region: (.*)\)")
                .expect("static regex must compile"),
            drive_date: Regex::new(r"(?i)Drive date: (.+)").expect("static regex must compile"),
        }
    }
}
