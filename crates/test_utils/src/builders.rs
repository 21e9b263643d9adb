//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant
//! fields while using defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{BillNo, CompanyId, DayOfMonth, ItemCode, MonthKey};
use domain_ledger::{LedgerCell, MonthSheet};
use domain_sales::{Bill, BillLine, LiquorMode};
use rust_decimal::Decimal;

use crate::fixtures::{CalendarFixtures, CodeFixtures, RateFixtures};

/// Builder for constructing test bills
pub struct TestBillBuilder {
    bill_no: BillNo,
    date: NaiveDate,
    company: CompanyId,
    mode: LiquorMode,
    lines: Vec<BillLine>,
}

impl Default for TestBillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBillBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            bill_no: CodeFixtures::bill_no(1),
            date: CalendarFixtures::sale_date(),
            company: CodeFixtures::company(),
            mode: LiquorMode::Foreign,
            lines: Vec::new(),
        }
    }

    /// Sets the bill number
    pub fn with_bill_no(mut self, suffix: u32) -> Self {
        self.bill_no = BillNo::from_suffix(suffix);
        self
    }

    /// Sets the sale date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Sets the company
    pub fn with_company(mut self, company: CompanyId) -> Self {
        self.company = company;
        self
    }

    /// Sets the liquor mode
    pub fn with_mode(mut self, mode: LiquorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Appends a line
    pub fn with_line(mut self, item: ItemCode, qty: u32, rate: Decimal) -> Self {
        self.lines.push(BillLine::new(item, qty, rate));
        self
    }

    /// Builds the bill, defaulting to a single whisky line when none
    /// were added
    pub fn build(mut self) -> Bill {
        if self.lines.is_empty() {
            self.lines
                .push(BillLine::new(CodeFixtures::item(), 1, RateFixtures::whisky_rate()));
        }
        Bill::new(self.bill_no, self.date, self.company, self.mode, self.lines)
            .expect("builder supplied at least one line")
    }
}

/// Builder for constructing test month sheets
pub struct TestSheetBuilder {
    company: CompanyId,
    item: ItemCode,
    month: MonthKey,
    opening: i64,
    days: Option<Vec<u32>>,
}

impl Default for TestSheetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSheetBuilder {
    /// Creates a new builder seeding the whole standard month
    pub fn new() -> Self {
        Self {
            company: CodeFixtures::company(),
            item: CodeFixtures::item(),
            month: CalendarFixtures::month(),
            opening: RateFixtures::opening_balance(),
            days: None,
        }
    }

    /// Sets the company
    pub fn with_company(mut self, company: CompanyId) -> Self {
        self.company = company;
        self
    }

    /// Sets the item
    pub fn with_item(mut self, item: ItemCode) -> Self {
        self.item = item;
        self
    }

    /// Sets the month
    pub fn with_month(mut self, month: MonthKey) -> Self {
        self.month = month;
        self
    }

    /// Sets the opening balance every cell starts from
    pub fn with_opening(mut self, opening: i64) -> Self {
        self.opening = opening;
        self
    }

    /// Seeds only the listed days, leaving the rest of the month as gaps
    pub fn with_only_days(mut self, days: &[u32]) -> Self {
        self.days = Some(days.to_vec());
        self
    }

    /// Builds the sheet
    pub fn build(self) -> MonthSheet {
        let mut sheet = MonthSheet::new(self.company, self.item, self.month);
        match self.days {
            None => sheet.seed_month(self.opening),
            Some(days) => {
                for day in days {
                    let day = DayOfMonth::new(day).expect("builder supplied a valid day");
                    sheet
                        .insert_cell(day, LedgerCell::new(self.opening))
                        .expect("builder supplied a day inside the month");
                }
            }
        }
        sheet
    }
}
