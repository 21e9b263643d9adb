//! Category and volume classification
//!
//! Maps an item to the regulatory category its volume limit is keyed by,
//! and resolves the per-unit pack size. Classification is textual: the
//! excise registers carry free-text sub-class descriptions, so category
//! resolution is a keyword scan with per-mode fallbacks, and volume
//! resolution is an ordered chain that always produces a value.

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::Milliliters;

use crate::item::{ItemProfile, LiquorMode};

/// Regulatory sale category, the key of the per-company volume limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SaleCategory {
    /// Indian-made foreign liquor (spirits and the foreign catch-all)
    Imfl,
    /// Beer
    Beer,
    /// Wine
    Wine,
    /// Country liquor
    CountryLiquor,
}

impl SaleCategory {
    /// Label used in store keys and log lines
    pub fn label(&self) -> &'static str {
        match self {
            SaleCategory::Imfl => "IMFL",
            SaleCategory::Beer => "BEER",
            SaleCategory::Wine => "WINE",
            SaleCategory::CountryLiquor => "COUNTRY",
        }
    }
}

impl fmt::Display for SaleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Keyword tables scanned against the upper-cased sub-class text. "VS "
// keeps its trailing space: the register writes cognac grades as
// "VS 750", and a bare "VS" would also match VSOP-style tokens inside
// unrelated descriptions.
const SPIRIT_KEYWORDS: &[&str] = &["WHISKY", "WHISKEY", "BRANDY", "RUM", "GIN", "VODKA", "VS "];
const BEER_KEYWORDS: &[&str] = &["BEER"];
const WINE_KEYWORDS: &[&str] = &["WINE"];

/// Resolves the regulatory category for an item
///
/// The sub-class text is scanned for known keywords; when nothing
/// matches, the liquor-flag decides: Country-mode items fall into the
/// country register, everything else into the IMFL catch-all.
pub fn classify(profile: &ItemProfile) -> SaleCategory {
    let text = profile.sub_class.to_uppercase();

    if BEER_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return SaleCategory::Beer;
    }
    if WINE_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return SaleCategory::Wine;
    }
    if SPIRIT_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return SaleCategory::Imfl;
    }

    match profile.mode {
        LiquorMode::Country => SaleCategory::CountryLiquor,
        LiquorMode::Foreign | LiquorMode::Other => SaleCategory::Imfl,
    }
}

/// Resolves the per-unit volume for an item
///
/// The chain is ordered and total: the recorded pack size wins, then a
/// "NNN ML" marker scanned out of the display name, then the standard
/// 750 ml bottle. Classification never fails on a missing size.
pub fn resolve_volume(profile: &ItemProfile) -> Milliliters {
    profile
        .volume_hint
        .or_else(|| scan_pack_size(&profile.name))
        .unwrap_or(Milliliters::STANDARD_BOTTLE)
}

/// Extracts the first "NNN ML" marker from display text
///
/// Accepts an optional space between the digits and the unit, so both
/// "750 ML" and "180ML" resolve. The unit must end the token: "750 MLX"
/// is not a size.
fn scan_pack_size(name: &str) -> Option<Milliliters> {
    let bytes = name.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let digits = &name[digits_start..i];

        let mut j = i;
        while j < bytes.len() && bytes[j] == b' ' {
            j += 1;
        }

        let unit_matches = name[j..]
            .get(..2)
            .map(|u| u.eq_ignore_ascii_case("ML"))
            .unwrap_or(false);
        let terminated = bytes
            .get(j + 2)
            .map(|b| !b.is_ascii_alphabetic())
            .unwrap_or(true);

        if unit_matches && terminated {
            if let Ok(ml) = digits.parse::<u32>() {
                return Some(Milliliters::new(ml));
            }
        }
    }

    None
}
