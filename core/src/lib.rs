//! Core types for classified sysCheck firmware inventories.
//!
//! This crate defines the data model shared by the analyzer and its front
//! ends:
//!
//! - [`FirmwareVariant`] — the closed taxonomy a firmware slot (an IOS title)
//!   is classified into, carrying variant-specific metadata.
//! - [`SlotEntry`] — one classified slot id plus its variant.
//! - [`ReportResult`] — the full inventory of one report: classified slots
//!   plus singleton facts (System Menu, Homebrew Channel, region, drive date).
//! - [`SlotStatistics`] — raw aggregate counts derived from a result.
//!
//! # Example
//!
//! ```
//! use syscheck_core::*;
//!
//! let mut result = ReportResult::default();
//! result.insert(SlotEntry::new(249, FirmwareVariant::Active));
//! result.insert(SlotEntry::new(250, FirmwareVariant::Stub));
//!
//! let stats = result.statistics();
//! assert_eq!(stats.total, 2);
//! assert_eq!(stats.stubs, 1);
//! assert_eq!(stats.non_stub(), 1);
//! assert_eq!(result.system_menu_version, UNKNOWN);
//! ```

mod types;

pub use types::*;
