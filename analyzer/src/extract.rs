//! Per-line pattern extraction.
//!
//! [`extract`] never fails: a line that matches nothing simply yields empty
//! facts. Every category is tested independently, so one line can carry a
//! slot id, singleton facts and several markers at once.

use crate::catalog::{self, PATTERNS};

/// Homebrew Channel version and the IOS it runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomebrewChannelFact {
    pub version: String,
    pub slot_id: u16,
}

/// Current region and, when noted on the same line, the original one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFact {
    pub current: String,
    pub original: Option<String>,
}

/// Substring markers present on one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerSet {
    pub stub: bool,
    pub no_patches: bool,
    pub usb_2_0: bool,
    pub nand_access: bool,
    pub es_identify: bool,
    pub trucha_bug: bool,
    pub d2x: bool,
    pub hermes: bool,
    pub wanikoko: bool,
    pub priiloader: bool,
    pub bootmii: bool,
    pub vios: bool,
}

impl MarkerSet {
    pub fn from_line(line: &str) -> Self {
        Self {
            stub: line.contains(catalog::STUB),
            no_patches: line.contains(catalog::NO_PATCHES),
            usb_2_0: line.contains(catalog::USB_2_0),
            nand_access: line.contains(catalog::NAND_ACCESS),
            es_identify: line.contains(catalog::ES_IDENTIFY),
            trucha_bug: line.contains(catalog::TRUCHA_BUG),
            d2x: line.contains(catalog::D2X),
            hermes: line.contains(catalog::HERMES),
            wanikoko: line.contains(catalog::WANIKOKO),
            priiloader: line.contains(catalog::PRIILOADER),
            bootmii: line.contains(catalog::BOOTMII),
            vios: line.contains(catalog::VIOS),
        }
    }

    /// Returns `true` when the line carries a patch that marks `slot_id` as
    /// custom firmware. `USB 2.0` only counts outside the base slot.
    pub fn has_custom_patch(&self, slot_id: u16) -> bool {
        self.nand_access
            || self.es_identify
            || self.trucha_bug
            || (self.usb_2_0 && slot_id != catalog::BASE_SLOT_ID)
    }
}

/// Everything recognized on one report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFacts<'a> {
    /// The line the facts came from; classification re-reads its sub-patterns.
    pub line: &'a str,
    pub slot_id: Option<u16>,
    pub system_menu: Option<String>,
    pub homebrew_channel: Option<HomebrewChannelFact>,
    pub region: Option<RegionFact>,
    pub drive_date: Option<String>,
    pub markers: MarkerSet,
}

/// Extracts slot ids, singleton facts and markers from one line.
pub fn extract(line: &str) -> ExtractedFacts<'_> {
    let patterns = &*PATTERNS;

    let slot_id = capture(&patterns.slot_id, line, 1).and_then(|raw| raw.parse().ok());

    let system_menu = capture(&patterns.system_menu, line, 1).map(ToOwned::to_owned);

    let homebrew_channel = patterns.homebrew_channel.captures(line).and_then(|caps| {
        let version = caps.get(1)?.as_str().trim().to_string();
        let slot_id = caps.get(2)?.as_str().parse().ok()?;
        Some(HomebrewChannelFact { version, slot_id })
    });

    let region = capture(&patterns.region, line, 1).map(|current| RegionFact {
        current: current.to_string(),
        original: capture(&patterns.original_region, line, 1).map(ToOwned::to_owned),
    });

    let drive_date = capture(&patterns.drive_date, line, 1)
        .map(str::trim)
        .filter(|date| !date.is_empty())
        .map(ToOwned::to_owned);

    ExtractedFacts {
        line,
        slot_id,
        system_menu,
        homebrew_channel,
        region,
        drive_date,
        markers: MarkerSet::from_line(line),
    }
}

fn capture<'a>(regex: &regex::Regex, line: &'a str, group: usize) -> Option<&'a str> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
}
