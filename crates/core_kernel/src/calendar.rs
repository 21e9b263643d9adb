//! Calendar types for month-partitioned ledger data
//!
//! The ledger is partitioned by calendar month and addressed by day of
//! month, so those two coordinates get validated types of their own.
//! Generation runs operate over an inclusive date range that may span
//! month boundaries.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors related to calendar coordinates
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("month {month} is out of range for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("day {day} is not a valid day of month")]
    InvalidDay { day: u32 },

    #[error("day {day} does not occur in {month}")]
    DayOutOfMonth { day: u32, month: MonthKey },
}

/// A calendar month, the partitioning key of the stock ledger
///
/// Orders chronologically: the derived ordering compares year first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a month key, validating the month number
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    /// The month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding calendar month
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// First calendar date of the month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated month")
    }

    /// Number of days in the month, leap years included
    pub fn day_count(&self) -> u32 {
        let next = self.next();
        (next.first_day() - self.first_day()).num_days() as u32
    }

    /// Returns true if the date falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Iterates every day of the month in ascending order
    pub fn days(&self) -> impl Iterator<Item = DayOfMonth> {
        (1..=self.day_count()).map(DayOfMonth)
    }

    /// Resolves a day-of-month to a concrete date within this month
    pub fn date_of(&self, day: DayOfMonth) -> Result<NaiveDate, CalendarError> {
        if day.get() > self.day_count() {
            return Err(CalendarError::DayOutOfMonth {
                day: day.get(),
                month: *self,
            });
        }
        Ok(NaiveDate::from_ymd_opt(self.year, self.month, day.get()).expect("validated day"))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A one-based day of month, the row key within a month sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayOfMonth(u32);

impl DayOfMonth {
    pub const FIRST: DayOfMonth = DayOfMonth(1);

    /// Creates a day of month, validating the general 1..=31 bound
    ///
    /// Whether the day exists in a particular month is checked against
    /// [`MonthKey::date_of`] where a concrete month is in hand.
    pub fn new(day: u32) -> Result<Self, CalendarError> {
        if !(1..=31).contains(&day) {
            return Err(CalendarError::InvalidDay { day });
        }
        Ok(Self(day))
    }

    /// The day-of-month of the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.day())
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DayOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inclusive range of calendar dates
///
/// Generation spreads a month's quantity across the days of one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range; `start` and `end` are both included
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering a single day
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, inclusive of both endpoints
    pub fn day_count(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates the days of the range in ascending order
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// The calendar months the range touches, in ascending order
    pub fn months(&self) -> Vec<MonthKey> {
        let mut months = Vec::new();
        let mut key = MonthKey::from_date(self.start);
        let last = MonthKey::from_date(self.end);
        while key <= last {
            months.push(key);
            key = key.next();
        }
        months
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_key_validation() {
        assert!(MonthKey::new(2024, 13).is_err());
        assert!(MonthKey::new(2024, 0).is_err());
        assert!(MonthKey::new(2024, 12).is_ok());
    }

    #[test]
    fn test_month_key_rollover() {
        let dec = MonthKey::new(2023, 12).unwrap();
        let jan = dec.next();
        assert_eq!(jan, MonthKey::new(2024, 1).unwrap());
        assert_eq!(jan.prev(), dec);
    }

    #[test]
    fn test_day_count_handles_leap_years() {
        assert_eq!(MonthKey::new(2024, 2).unwrap().day_count(), 29);
        assert_eq!(MonthKey::new(2023, 2).unwrap().day_count(), 28);
        assert_eq!(MonthKey::new(2024, 4).unwrap().day_count(), 30);
    }

    #[test]
    fn test_days_covers_whole_month() {
        let feb = MonthKey::new(2024, 2).unwrap();
        let days: Vec<DayOfMonth> = feb.days().collect();
        assert_eq!(days.len(), 29);
        assert_eq!(days[0], DayOfMonth::FIRST);
        assert_eq!(days[28].get(), 29);
    }

    #[test]
    fn test_date_of_rejects_missing_day() {
        let feb = MonthKey::new(2023, 2).unwrap();
        let day29 = DayOfMonth::new(29).unwrap();
        assert!(matches!(
            feb.date_of(day29),
            Err(CalendarError::DayOutOfMonth { day: 29, .. })
        ));
    }

    #[test]
    fn test_range_day_count_is_inclusive() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 5)).unwrap();
        assert_eq!(range.day_count(), 5);
        assert_eq!(DateRange::single(date(2024, 3, 1)).day_count(), 1);
    }

    #[test]
    fn test_range_rejects_reversed_endpoints() {
        assert!(matches!(
            DateRange::new(date(2024, 3, 5), date(2024, 3, 1)),
            Err(CalendarError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_range_iteration_and_months() {
        let range = DateRange::new(date(2024, 2, 28), date(2024, 3, 2)).unwrap();
        let days: Vec<NaiveDate> = range.iter_days().collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[1], date(2024, 2, 29));
        assert_eq!(
            range.months(),
            vec![
                MonthKey::new(2024, 2).unwrap(),
                MonthKey::new(2024, 3).unwrap()
            ]
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn month_prev_undoes_next(year in 1900i32..3000, month in 1u32..13) {
            let key = MonthKey::new(year, month).unwrap();
            prop_assert_eq!(key.next().prev(), key);
            prop_assert_eq!(key.prev().next(), key);
        }

        #[test]
        fn every_day_of_a_month_resolves_and_round_trips(
            year in 1900i32..3000,
            month in 1u32..13
        ) {
            let key = MonthKey::new(year, month).unwrap();
            for day in key.days() {
                let date = key.date_of(day).unwrap();
                prop_assert!(key.contains(date));
                prop_assert_eq!(MonthKey::from_date(date), key);
                prop_assert_eq!(DayOfMonth::from_date(date), day);
            }
        }

        #[test]
        fn range_iteration_matches_day_count(
            start_offset in 0i64..2000,
            span in 0i64..120
        ) {
            let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
                + chrono::Duration::days(start_offset);
            let end = start + chrono::Duration::days(span);
            let range = DateRange::new(start, end).unwrap();

            prop_assert_eq!(range.day_count(), (span + 1) as u32);
            prop_assert_eq!(range.iter_days().count() as u32, range.day_count());
        }
    }
}
