//! Closed date ranges used to scope aggregation.
//!
//! # Invariants
//! - Windows are closed: both `start` and `end` are included.
//! - A window whose `end` precedes `start` is empty and yields no days.
//! - Week windows run Monday through Sunday.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Contiguous closed range `[start, end]` of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Single-day window.
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Monday–Sunday week containing `today`.
    pub fn week_of(today: NaiveDate) -> Self {
        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        Self::new(monday, monday + Duration::days(6))
    }

    /// First through last calendar day of the month containing `today`.
    pub fn month_of(today: NaiveDate) -> Self {
        let first = today - Duration::days(i64::from(today.day0()));
        let last = first
            .iter_days()
            .take_while(|day| day.month() == first.month())
            .last()
            .unwrap_or(first);
        Self::new(first, last)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered; zero when `end < start`.
    pub fn len(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates every day of the window in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len())
    }

    /// Blank calendar cells preceding the first day, with Sunday-first columns.
    pub fn leading_empty_slots(&self) -> usize {
        self.start.weekday().num_days_from_sunday() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_of_sunday_starts_on_previous_monday() {
        // 2026-10-18 is a Sunday.
        let window = DateWindow::week_of(date(2026, 10, 18));
        assert_eq!(window.start(), date(2026, 10, 12));
        assert_eq!(window.end(), date(2026, 10, 18));
        assert_eq!(window.len(), 7);
    }

    #[test]
    fn week_of_monday_starts_same_day() {
        let window = DateWindow::week_of(date(2026, 10, 12));
        assert_eq!(window.start(), date(2026, 10, 12));
    }

    #[test]
    fn month_of_handles_leap_february_and_december() {
        let feb = DateWindow::month_of(date(2028, 2, 14));
        assert_eq!(feb.start(), date(2028, 2, 1));
        assert_eq!(feb.end(), date(2028, 2, 29));
        assert_eq!(feb.len(), 29);

        let dec = DateWindow::month_of(date(2026, 12, 31));
        assert_eq!(dec.start(), date(2026, 12, 1));
        assert_eq!(dec.end(), date(2026, 12, 31));
    }

    #[test]
    fn month_starting_on_sunday_has_no_leading_slots() {
        // March 2026 starts on a Sunday and has 31 days.
        let window = DateWindow::month_of(date(2026, 3, 20));
        assert_eq!(window.len(), 31);
        assert_eq!(window.leading_empty_slots(), 0);
        // October 2026 starts on a Thursday.
        assert_eq!(DateWindow::month_of(date(2026, 10, 18)).leading_empty_slots(), 4);
    }

    #[test]
    fn reversed_window_is_empty() {
        let window = DateWindow::new(date(2026, 1, 10), date(2026, 1, 1));
        assert!(window.is_empty());
        assert_eq!(window.days().count(), 0);
    }
}
