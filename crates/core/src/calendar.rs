//! # Slot Calendar Generator
//!
//! Builds the 6 × 7 month grid shown by the booking form. The grid always
//! starts on a Sunday: leading cells are borrowed from the previous month,
//! trailing cells from the next, so every month renders as exactly
//! [`GRID_CELLS`] days.
//!
//! Only days of the displayed month that are not in the past can be picked.

use std::cmp::Ordering;

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{MeetError, MeetResult};

/// 6 rows × 7 columns.
pub const GRID_CELLS: usize = 42;

/// Column headers, Sunday first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthRelation {
    Prev,
    Current,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub day_number: u32,
    pub month_relation: MonthRelation,
    pub date: NaiveDate,
    pub selectable: bool,
}

/// The month a calendar grid is generated for.
///
/// Only months whose full grid, including the borrowed neighbour days, lies
/// inside chrono's date range can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    first: NaiveDate,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> MeetResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| MeetError::Validation(format!("Invalid month: {}-{:02}", year, month)))?;
        Self::from_first(first)
    }

    pub fn containing(date: NaiveDate) -> MeetResult<Self> {
        Self::new(date.year(), date.month())
    }

    /// The month containing today's local date.
    pub fn current() -> MeetResult<Self> {
        Self::containing(Local::now().date_naive())
    }

    /// Parses "YYYY-MM".
    pub fn parse(value: &str) -> MeetResult<Self> {
        let invalid =
            || MeetError::Validation(format!("Invalid month (expected YYYY-MM): {}", value));
        let (year, month) = value.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    fn from_first(first: NaiveDate) -> MeetResult<Self> {
        let has_previous = first.checked_sub_months(Months::new(1)).is_some();
        let has_trailing = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.checked_add_days(Days::new(TRAILING_MAX)))
            .is_some();
        if !has_previous || !has_trailing {
            return Err(MeetError::Validation(format!(
                "{} is outside the supported calendar range",
                first.format("%Y-%m")
            )));
        }
        Ok(Self { first })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month_of(self.first)
    }

    pub fn next(&self) -> MeetResult<Self> {
        let first = self
            .first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| {
                MeetError::Validation("No month after the supported calendar range".into())
            })?;
        Self::from_first(first)
    }

    pub fn previous(&self) -> MeetResult<Self> {
        let first = self
            .first
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| {
                MeetError::Validation("No month before the supported calendar range".into())
            })?;
        Self::from_first(first)
    }

    /// e.g. "February 2024".
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn grid(&self, today: NaiveDate) -> Vec<CalendarDay> {
        generate_calendar_days(*self, today)
    }
}

/// Most cells a grid borrows from the next month (a 28-day month starting on Sunday).
const TRAILING_MAX: u64 = 14;

fn days_in_month_of(first: NaiveDate) -> u32 {
    [31, 30, 29]
        .into_iter()
        .find(|day| first.with_day(*day).is_some())
        .unwrap_or(28)
}

/// A day can be booked only if it is today or later.
pub fn is_date_disabled(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// Generates the [`GRID_CELLS`]-day grid for `month`, judged against `today`.
///
/// The grid is the run of consecutive days starting at the Sunday on or
/// before the first of the month.
pub fn generate_calendar_days(month: CalendarMonth, today: NaiveDate) -> Vec<CalendarDay> {
    let leading = u64::from(month.first_day().weekday().num_days_from_sunday());
    let start = month
        .first_day()
        .checked_sub_days(Days::new(leading))
        .unwrap_or(month.first_day());

    start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| {
            let relation = match (date.year(), date.month()).cmp(&(month.year(), month.month())) {
                Ordering::Less => MonthRelation::Prev,
                Ordering::Equal => MonthRelation::Current,
                Ordering::Greater => MonthRelation::Next,
            };
            CalendarDay {
                day_number: date.day(),
                month_relation: relation,
                date,
                selectable: relation == MonthRelation::Current && !is_date_disabled(date, today),
            }
        })
        .collect()
}
