//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data that
//! maintains domain invariants, plus fake-powered helpers for display
//! fields where a plausible-looking value matters more than a
//! deterministic one.

use core_kernel::{BillNo, CompanyId, DayOfMonth, ItemCode, Milliliters, MonthKey};
use domain_ledger::LedgerCell;
use domain_sales::{BillLine, ItemProfile, LiquorMode};
use fake::faker::name::en::LastName;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid item codes
pub fn item_code_strategy() -> impl Strategy<Value = ItemCode> {
    "[A-Z]{2}[0-9]{4}".prop_map(|code| ItemCode::new(code).unwrap())
}

/// Strategy for generating valid company codes
pub fn company_strategy() -> impl Strategy<Value = CompanyId> {
    "UP-[0-9]{4}".prop_map(|code| CompanyId::new(code).unwrap())
}

/// Strategy for generating bill numbers
pub fn bill_no_strategy() -> impl Strategy<Value = BillNo> {
    (1u32..100_000u32).prop_map(BillNo::from_suffix)
}

/// Strategy for generating months across several years
pub fn month_strategy() -> impl Strategy<Value = MonthKey> {
    (2020i32..2031i32, 1u32..13u32).prop_map(|(year, month)| MonthKey::new(year, month).unwrap())
}

/// Strategy for generating days that exist in every month
pub fn day_strategy() -> impl Strategy<Value = DayOfMonth> {
    (1u32..29u32).prop_map(|day| DayOfMonth::new(day).unwrap())
}

/// Strategy for generating sale quantities
pub fn qty_strategy() -> impl Strategy<Value = u32> {
    1u32..500u32
}

/// Strategy for generating the pack sizes the trade actually stocks
pub fn volume_strategy() -> impl Strategy<Value = Milliliters> {
    prop_oneof![
        Just(Milliliters::new(180)),
        Just(Milliliters::new(375)),
        Just(Milliliters::new(500)),
        Just(Milliliters::new(650)),
        Just(Milliliters::new(750)),
        Just(Milliliters::new(1000)),
    ]
}

/// Strategy for generating unit rates with paise precision
pub fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (1_000i64..100_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

/// Strategy for generating liquor modes
pub fn mode_strategy() -> impl Strategy<Value = LiquorMode> {
    prop_oneof![
        Just(LiquorMode::Foreign),
        Just(LiquorMode::Country),
        Just(LiquorMode::Other),
    ]
}

/// Strategy for generating ledger cells that satisfy the closing equation
pub fn balanced_cell_strategy() -> impl Strategy<Value = LedgerCell> {
    (-100i64..1000i64, 0i64..200i64, 0i64..200i64, -50i64..50i64).prop_map(
        |(opening, purchase, sales, adjustment)| {
            let closing = opening + purchase - sales + adjustment;
            LedgerCell::from_parts(opening, purchase, sales, adjustment, closing)
        },
    )
}

/// Strategy for generating bill lines
pub fn bill_line_strategy() -> impl Strategy<Value = BillLine> {
    (item_code_strategy(), 1u32..20u32, rate_strategy())
        .prop_map(|(item, qty, rate)| BillLine::new(item, qty, rate))
}

/// Strategy for generating non-empty line sets
pub fn bill_lines_strategy(max_lines: usize) -> impl Strategy<Value = Vec<BillLine>> {
    proptest::collection::vec(bill_line_strategy(), 1..=max_lines)
}

/// A plausible item display name at the given pack size
pub fn fake_item_name(volume: Milliliters) -> String {
    let house: String = LastName().fake();
    format!("{} RESERVE {} ML", house.to_uppercase(), volume.get())
}

/// A whole item profile with a fake display name and a round rate
pub fn fake_item_profile(mode: LiquorMode, volume: Milliliters) -> ItemProfile {
    let serial: u32 = (100..1000).fake();
    let rate = Decimal::from((40u32..90u32).fake::<u32>() * 10);
    ItemProfile::new(
        ItemCode::new(format!("FL{serial}")).unwrap(),
        fake_item_name(volume),
        mode,
        rate,
    )
    .with_volume_hint(volume)
}
