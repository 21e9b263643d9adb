//! Item profiles sourced from the external item master
//!
//! The item master itself (pricing screens, CSV import, editing) lives
//! outside this system; a run only ever sees immutable snapshots of the
//! items it was asked to sell.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ItemCode, Milliliters};

/// Regulatory liquor-flag distinguishing the top-level item families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquorMode {
    /// Indian-made foreign liquor, imports and everything sold under the
    /// foreign-liquor licence
    Foreign,
    /// Country liquor
    Country,
    /// Items outside both registers
    Other,
}

impl LiquorMode {
    /// Short code used in bill headers and store keys
    pub fn code(&self) -> &'static str {
        match self {
            LiquorMode::Foreign => "F",
            LiquorMode::Country => "C",
            LiquorMode::Other => "O",
        }
    }
}

/// A snapshot of one item as the run sees it
///
/// Immutable during a run; the item directory owns the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProfile {
    /// Unique item code
    pub code: ItemCode,
    /// Display name as printed on bills, e.g. "ROYAL CROWN 750 ML"
    pub name: String,
    /// Descriptive sub-class text the classifier inspects, e.g. "WHISKY"
    pub sub_class: String,
    /// Regulatory liquor-flag
    pub mode: LiquorMode,
    /// Pack size recorded on the sub-class record, when present
    pub volume_hint: Option<Milliliters>,
    /// Unit sale rate
    pub rate: Decimal,
}

impl ItemProfile {
    /// Creates a profile with no recorded pack size or sub-class text
    pub fn new(code: ItemCode, name: impl Into<String>, mode: LiquorMode, rate: Decimal) -> Self {
        Self {
            code,
            name: name.into(),
            sub_class: String::new(),
            mode,
            volume_hint: None,
            rate,
        }
    }

    /// Sets the descriptive sub-class text
    pub fn with_sub_class(mut self, sub_class: impl Into<String>) -> Self {
        self.sub_class = sub_class.into();
        self
    }

    /// Sets the recorded pack size
    pub fn with_volume_hint(mut self, volume: Milliliters) -> Self {
        self.volume_hint = Some(volume);
        self
    }
}
