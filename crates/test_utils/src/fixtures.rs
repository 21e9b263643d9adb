//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the stock
//! ledger system. These fixtures are designed to be consistent and
//! predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{
    BillNo, CompanyId, DateRange, DayOfMonth, FinYearId, ItemCode, Milliliters, MonthKey, UserId,
};
use domain_sales::{ItemProfile, LiquorMode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for identifier codes
pub struct CodeFixtures;

impl CodeFixtures {
    /// Standard shop company code
    pub fn company() -> CompanyId {
        CompanyId::new("UP-4021").unwrap()
    }

    /// A second shop for isolation tests
    pub fn other_company() -> CompanyId {
        CompanyId::new("UP-7350").unwrap()
    }

    /// Standard counter user
    pub fn user() -> UserId {
        UserId::new("counter-1").unwrap()
    }

    /// Standard financial year
    pub fn fin_year() -> FinYearId {
        FinYearId::new("2024-25").unwrap()
    }

    /// Standard whisky item code
    pub fn item() -> ItemCode {
        ItemCode::new("FL0750").unwrap()
    }

    /// A bill number at the given suffix
    pub fn bill_no(suffix: u32) -> BillNo {
        BillNo::from_suffix(suffix)
    }
}

/// Fixture for calendar test data
pub struct CalendarFixtures;

impl CalendarFixtures {
    /// Standard ledger month (July 2024)
    pub fn month() -> MonthKey {
        MonthKey::new(2024, 7).unwrap()
    }

    /// The month before the standard month
    pub fn prior_month() -> MonthKey {
        MonthKey::new(2024, 6).unwrap()
    }

    /// A sale date inside the standard month
    pub fn sale_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    /// Day-of-month of the standard sale date
    pub fn sale_day() -> DayOfMonth {
        DayOfMonth::new(15).unwrap()
    }

    /// The first five days of the standard month
    pub fn five_days() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
        )
        .unwrap()
    }

    /// The whole standard month as a range
    pub fn whole_month() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(),
        )
        .unwrap()
    }
}

/// Fixture for item master profiles, one per sale category
pub struct ItemFixtures;

impl ItemFixtures {
    /// A 750 ml foreign whisky
    pub fn whisky_750() -> ItemProfile {
        ItemProfile::new(
            ItemCode::new("FL0750").unwrap(),
            "HIGHLAND PRIDE 750 ML",
            LiquorMode::Foreign,
            dec!(540),
        )
        .with_sub_class("WHISKY")
        .with_volume_hint(Milliliters::new(750))
    }

    /// A 650 ml strong beer
    pub fn beer_650() -> ItemProfile {
        ItemProfile::new(
            ItemCode::new("BR0650").unwrap(),
            "KING CROWN STRONG 650 ML",
            LiquorMode::Foreign,
            dec!(160),
        )
        .with_sub_class("BEER")
        .with_volume_hint(Milliliters::new(650))
    }

    /// A 750 ml red wine
    pub fn wine_750() -> ItemProfile {
        ItemProfile::new(
            ItemCode::new("WN0750").unwrap(),
            "SUNSET VALLEY RED 750 ML",
            LiquorMode::Foreign,
            dec!(680),
        )
        .with_sub_class("WINE")
        .with_volume_hint(Milliliters::new(750))
    }

    /// A 180 ml country liquor quarter
    pub fn country_180() -> ItemProfile {
        ItemProfile::new(
            ItemCode::new("CL0180").unwrap(),
            "DESI SANTRA 180 ML",
            LiquorMode::Country,
            dec!(85),
        )
        .with_volume_hint(Milliliters::new(180))
    }

    /// The four profiles above, one for each category
    pub fn one_per_category() -> Vec<ItemProfile> {
        vec![
            Self::whisky_750(),
            Self::beer_650(),
            Self::wine_750(),
            Self::country_180(),
        ]
    }
}

/// Fixture for rate and quantity test data
pub struct RateFixtures;

impl RateFixtures {
    /// Standard whisky rate
    pub fn whisky_rate() -> Decimal {
        dec!(540)
    }

    /// Standard beer rate
    pub fn beer_rate() -> Decimal {
        dec!(160)
    }

    /// A rate with paise for rounding-sensitive tests
    pub fn fractional_rate() -> Decimal {
        dec!(152.50)
    }

    /// Standard opening balance for seeded sheets
    pub fn opening_balance() -> i64 {
        100
    }
}
