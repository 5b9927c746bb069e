//! Slot classification.
//!
//! Decides which [`FirmwareVariant`] a slot belongs to from the markers on
//! one line. Stub and "No Patches" are terminal; the retail `USB 2.0` case
//! on the base slot is only tentative and is superseded by a custom-firmware
//! patch on the same line; a BootMii marker on its reserved slot overrides
//! everything before it.

use syscheck_core::{D2xDetail, FirmwareVariant, ReleaseChannel, SlotEntry};
use tracing::{debug, warn};

use crate::catalog::{self, PATTERNS};
use crate::error::{AnalyzeError, Result};
use crate::extract::ExtractedFacts;

/// Classifies `slot_id` from the facts of one line.
///
/// Returns `Ok(None)` when the line mentions the slot without any marker
/// that classifies it.
///
/// # Errors
///
/// [`AnalyzeError::UnsupportedInput`] when the line carries the vIOS marker,
/// and [`AnalyzeError::MalformedMarker`] when a custom-firmware family is
/// recognized but its metadata sub-pattern is missing.
pub fn classify(slot_id: u16, facts: &ExtractedFacts<'_>) -> Result<Option<SlotEntry>> {
    let markers = &facts.markers;

    if markers.vios {
        return Err(AnalyzeError::UnsupportedInput);
    }
    if markers.stub {
        return Ok(Some(SlotEntry::new(slot_id, FirmwareVariant::Stub)));
    }
    if markers.no_patches {
        return Ok(Some(SlotEntry::new(slot_id, FirmwareVariant::Active)));
    }

    let mut variant = None;
    if markers.usb_2_0 && slot_id == catalog::BASE_SLOT_ID {
        variant = Some(FirmwareVariant::Active);
    }
    if markers.has_custom_patch(slot_id) {
        variant = Some(detect_family(slot_id, facts)?);
    }
    if markers.bootmii && slot_id == catalog::BOOTMII_SLOT_ID {
        variant = Some(FirmwareVariant::BootloaderInstall);
    }

    if let Some(variant) = &variant {
        debug!(slot_id, variant = variant.label(), "Classified slot");
    }
    Ok(variant.map(|variant| SlotEntry::new(slot_id, variant)))
}

fn detect_family(slot_id: u16, facts: &ExtractedFacts<'_>) -> Result<FirmwareVariant> {
    let markers = &facts.markers;
    if markers.d2x {
        return parse_d2x(slot_id, facts.line).map(FirmwareVariant::CustomD2x);
    }
    if markers.hermes {
        let info = parse_info(slot_id, facts.line)?;
        return Ok(FirmwareVariant::CustomHermes { info });
    }
    if markers.wanikoko {
        let info = parse_info(slot_id, facts.line)?;
        return Ok(FirmwareVariant::CustomWanikoko { info });
    }
    Ok(FirmwareVariant::CustomUnknown {
        info: catalog::GENERIC_CUSTOM_INFO.to_string(),
    })
}

fn parse_d2x(slot_id: u16, line: &str) -> Result<D2xDetail> {
    let base_slot_id = PATTERNS
        .custom_base
        .captures(line)
        .and_then(|caps| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| malformed(slot_id, "base IOS", line))?;

    let caps = PATTERNS
        .d2x_version
        .captures(line)
        .ok_or_else(|| malformed(slot_id, "d2x version", line))?;
    let version = caps
        .get(1)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| malformed(slot_id, "d2x version", line))?;
    let release_channel = caps
        .get(2)
        .and_then(|m| ReleaseChannel::from_token(m.as_str()));
    let beta_suffix = caps
        .get(3)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Ok(D2xDetail {
        base_slot_id,
        version,
        release_channel,
        beta_suffix,
    })
}

fn parse_info(slot_id: u16, line: &str) -> Result<String> {
    PATTERNS
        .info
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| malformed(slot_id, "Info payload", line))
}

fn malformed(slot_id: u16, pattern: &'static str, line: &str) -> AnalyzeError {
    warn!(slot_id, pattern, "Custom IOS line is missing its metadata");
    AnalyzeError::MalformedMarker {
        slot_id,
        pattern,
        line: line.to_string(),
    }
}
