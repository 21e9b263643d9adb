//! Strongly-typed identifiers for domain entities
//!
//! Newtype wrappers around the raw code strings prevent accidental mixing
//! of company, item and user identifiers, and give bill numbers a single
//! canonical parse/format implementation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while constructing or parsing identifiers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("{kind} code must not be empty")]
    Empty { kind: &'static str },

    #[error("bill number {text:?} must be \"{prefix}\" followed by digits")]
    MalformedBillNo { text: String, prefix: &'static str },

    #[error("bill number suffix in {text:?} exceeds the supported range")]
    SuffixOutOfRange { text: String },
}

macro_rules! define_code {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a code from raw text, trimming surrounding whitespace
            pub fn new(code: impl Into<String>) -> Result<Self, IdentifierError> {
                let code = code.into();
                let trimmed = code.trim();
                if trimmed.is_empty() {
                    return Err(IdentifierError::Empty { kind: $label });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the code as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the label used in diagnostics for this code type
            pub fn kind() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Company and catalogue identifiers
define_code!(CompanyId, "company");
define_code!(ItemCode, "item");
define_code!(UserId, "user");

// Financial-year label, e.g. "2324" for April 2023 through March 2024
define_code!(FinYearId, "financial year");

/// A bill number: fixed alphabetic prefix plus a zero-padded numeric suffix
///
/// Bill numbers order by their numeric suffix, not lexically, so `BL0009`
/// precedes `BL0010` and renumbering arithmetic stays in integer space.
/// Suffixes wider than the pad width render without truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BillNo(u32);

impl BillNo {
    /// Prefix shared by every bill number in the system
    pub const PREFIX: &'static str = "BL";

    /// Minimum digit count of the rendered suffix
    pub const SUFFIX_WIDTH: usize = 4;

    /// Creates a bill number from its numeric suffix
    pub const fn from_suffix(suffix: u32) -> Self {
        Self(suffix)
    }

    /// Returns the numeric suffix
    pub const fn suffix(self) -> u32 {
        self.0
    }

    /// Returns the bill number immediately after this one
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the bill number immediately before this one, if any
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl fmt::Display for BillNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:0width$}", Self::PREFIX, self.0, width = Self::SUFFIX_WIDTH)
    }
}

impl FromStr for BillNo {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let digits = text
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| IdentifierError::MalformedBillNo {
                text: text.to_string(),
                prefix: Self::PREFIX,
            })?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError::MalformedBillNo {
                text: text.to_string(),
                prefix: Self::PREFIX,
            });
        }
        let suffix = digits
            .parse::<u32>()
            .map_err(|_| IdentifierError::SuffixOutOfRange {
                text: text.to_string(),
            })?;
        Ok(Self(suffix))
    }
}

impl Serialize for BillNo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BillNo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Time-ordered identifier for a generation or deletion run
///
/// Used to correlate log lines and progress updates belonging to one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a new time-ordered identifier (v7)
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RUN-{}", self.0)
    }
}

impl FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid_str = s.strip_prefix("RUN-").unwrap_or(s);
        Ok(Self(Uuid::parse_str(uuid_str)?))
    }
}
