//! Calendar month bounds used for the default date filters.

use time::{Date, Duration, Month};

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// The first and last day of the month containing `date`.
    pub fn month_of(date: Date) -> Self {
        let day = date.day();
        let last_day = last_day_of_month(date.year(), date.month());

        Self {
            start: date - Duration::days(i64::from(day - 1)),
            end: date + Duration::days(i64::from(last_day - day)),
        }
    }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
