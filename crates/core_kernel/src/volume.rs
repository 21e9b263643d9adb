//! Pack-size volumes with overflow-safe aggregate arithmetic
//!
//! Excise rules in this domain are written in terms of bottle volume, so the
//! unit gets its own type rather than a bare integer. Aggregates (quantity
//! times volume, summed across bill lines) use a wider representation to
//! keep bulk totals out of `u32` overflow territory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Volume of a single bottle or pack, in millilitres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliliters(u32);

impl Milliliters {
    /// Standard quart bottle, the fallback when no pack size is recorded
    pub const STANDARD_BOTTLE: Milliliters = Milliliters(750);

    /// Creates a volume from a raw millilitre count
    pub const fn new(ml: u32) -> Self {
        Self(ml)
    }

    /// Returns the raw millilitre count
    pub const fn get(self) -> u32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Total volume of `qty` bottles of this size
    pub fn scaled(self, qty: u32) -> VolumeLoad {
        VolumeLoad(u64::from(self.0) * u64::from(qty))
    }
}

impl fmt::Display for Milliliters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ml", self.0)
    }
}

/// Aggregate volume across many bottles, in millilitres
///
/// This is the magnitude bulk-sale limits are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeLoad(u64);

impl VolumeLoad {
    pub const ZERO: VolumeLoad = VolumeLoad(0);

    /// Creates a load from a raw millilitre count
    pub const fn new(ml: u64) -> Self {
        Self(ml)
    }

    /// Returns the raw millilitre count
    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for VolumeLoad {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for VolumeLoad {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sum for VolumeLoad {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + v)
    }
}

impl From<Milliliters> for VolumeLoad {
    fn from(ml: Milliliters) -> Self {
        Self(u64::from(ml.get()))
    }
}

impl fmt::Display for VolumeLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ml", self.0)
    }
}
