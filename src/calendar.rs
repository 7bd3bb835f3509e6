use crate::models::{CalendarCell, CalendarResponse, LogRecord};
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use std::collections::HashSet;
use tracing::warn;

const DAYS_IN_WEEK: usize = 7;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The year and month currently shown by a calendar view.
///
/// Held as the first day of the month, so every cursor is a month chrono can
/// represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    /// `None` for a month outside `1..=12` or a year chrono cannot represent.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date - Duration::days(i64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// Moves by `delta` months, or `None` past the representable range. The
    /// day is pinned to the 1st, so there is no day-of-month carry.
    pub fn advance(self, delta: i32) -> Option<Self> {
        let months = Months::new(delta.unsigned_abs());
        let first = if delta < 0 {
            self.first.checked_sub_months(months)
        } else {
            self.first.checked_add_months(months)
        }?;
        Some(Self { first })
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Distance to day 1 of the following month. Only December of the last
    /// representable year has no following month.
    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next) => (next - self.first).num_days() as u32,
            None => 31,
        }
    }

    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.first.month0() as usize], self.year())
    }

    pub fn date_of(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }
}

impl Default for MonthCursor {
    fn default() -> Self {
        Self::current()
    }
}

/// Collects the calendar dates that carry at least one log.
pub fn log_date_set(logs: &[LogRecord]) -> HashSet<NaiveDate> {
    logs.iter()
        .filter_map(|log| {
            let date = log.date();
            if date.is_none() {
                warn!(id = %log.id, log_date = %log.log_date, "skipping log with malformed date");
            }
            date
        })
        .collect()
}

/// Lays out the month Sunday-first, padding the first and last weeks.
pub fn build_grid(
    cursor: MonthCursor,
    log_dates: &HashSet<NaiveDate>,
    today: NaiveDate,
) -> Vec<CalendarCell> {
    let leading = cursor.first_day().weekday().num_days_from_sunday() as usize;
    let days = cursor.days_in_month();
    let total = (leading + days as usize).div_ceil(DAYS_IN_WEEK) * DAYS_IN_WEEK;

    let mut cells = Vec::with_capacity(total);
    cells.extend(std::iter::repeat_n(CalendarCell::padding(), leading));
    for day in 1..=days {
        let date = cursor.date_of(day);
        cells.push(CalendarCell {
            day: Some(day),
            has_entry: date.is_some_and(|date| log_dates.contains(&date)),
            is_today: date == Some(today),
        });
    }
    cells.resize(total, CalendarCell::padding());
    cells
}

pub fn advance_month(cursor: MonthCursor, delta: i32) -> Option<MonthCursor> {
    cursor.advance(delta)
}

/// Padding cells yield `None`; the caller decides what a click means.
pub fn date_clicked(cursor: MonthCursor, day: Option<u32>) -> Option<NaiveDate> {
    cursor.date_of(day?)
}

pub fn build_calendar(cursor: MonthCursor, logs: &[LogRecord], today: NaiveDate) -> CalendarResponse {
    let cells = build_grid(cursor, &log_date_set(logs), today);
    CalendarResponse {
        year: cursor.year(),
        month: cursor.month(),
        title: cursor.title(),
        cells,
    }
}

impl CalendarCell {
    fn padding() -> Self {
        Self {
            day: None,
            has_entry: false,
            is_today: false,
        }
    }
}
