//! Calendar-date windows and quarter arithmetic.
//!
//! Month boundaries are always derived from "first day of the following
//! month minus one day" so leap years and 30/31-day months never need
//! their own lookup table.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed calendar-date interval: both endpoints are inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// True if `date` falls within `[start, end]` inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// First day of the given month.
fn month_start(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("month is in 1..=12")
}

/// Last day of the given month: first day of the next month, minus one day.
pub fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    month_start(next_year, next_month)
        .pred_opt()
        .expect("a month start always has a predecessor")
}

/// The full calendar quarter immediately preceding the quarter that
/// contains `reference`.
///
/// Quarter numbering is `(month - 1) / 3 + 1`; the quarter before Q1 is
/// Q4 of the previous year.
pub fn last_quarter(reference: NaiveDate) -> DateWindow {
    let quarter = (reference.month() - 1) / 3 + 1;
    let (year, prev_quarter) = if quarter == 1 {
        (reference.year() - 1, 4)
    } else {
        (reference.year(), quarter - 1)
    };

    let start_month = 3 * (prev_quarter - 1) + 1;
    DateWindow {
        start: month_start(year, start_month),
        end: month_end(year, start_month + 2),
    }
}

/// Calendar-month bucket label for trend series (`YYYY-MM`).
///
/// Zero-padded so lexicographic order is chronological order.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_quarter_mid_year() {
        let window = last_quarter(date(2024, 5, 15));
        assert_eq!(window.start, date(2024, 1, 1));
        assert_eq!(window.end, date(2024, 3, 31));
    }

    #[test]
    fn test_last_quarter_wraps_to_previous_year() {
        let window = last_quarter(date(2024, 1, 15));
        assert_eq!(window.start, date(2023, 10, 1));
        assert_eq!(window.end, date(2023, 12, 31));
    }

    #[test]
    fn test_last_quarter_is_stable_within_a_quarter() {
        // Any reference date inside one quarter names the same window.
        assert_eq!(last_quarter(date(2024, 4, 1)), last_quarter(date(2024, 6, 30)));
        assert_eq!(last_quarter(date(2024, 10, 2)), last_quarter(date(2024, 12, 31)));
    }

    #[test]
    fn test_last_quarter_all_quarters() {
        assert_eq!(
            last_quarter(date(2024, 8, 10)),
            DateWindow {
                start: date(2024, 4, 1),
                end: date(2024, 6, 30),
            }
        );
        assert_eq!(
            last_quarter(date(2024, 11, 30)),
            DateWindow {
                start: date(2024, 7, 1),
                end: date(2024, 9, 30),
            }
        );
    }

    #[test]
    fn test_month_end_leap_february() {
        assert_eq!(month_end(2024, 2), date(2024, 2, 29));
        assert_eq!(month_end(2023, 2), date(2023, 2, 28));
        // Century rule: 1900 is not a leap year, 2000 is.
        assert_eq!(month_end(1900, 2), date(1900, 2, 28));
        assert_eq!(month_end(2000, 2), date(2000, 2, 29));
    }

    #[test]
    fn test_month_end_year_rollover() {
        assert_eq!(month_end(2023, 12), date(2023, 12, 31));
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = DateWindow {
            start: date(2024, 1, 1),
            end: date(2024, 3, 31),
        };
        assert!(window.contains(date(2024, 1, 1)));
        assert!(window.contains(date(2024, 3, 31)));
        assert!(window.contains(date(2024, 2, 29)));
        assert!(!window.contains(date(2023, 12, 31)));
        assert!(!window.contains(date(2024, 4, 1)));
    }

    #[test]
    fn test_month_key_zero_pads() {
        assert_eq!(month_key(date(2024, 3, 7)), "2024-03");
        assert_eq!(month_key(date(2024, 11, 30)), "2024-11");
    }
}
