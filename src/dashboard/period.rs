//! Calendar periods used to filter transactions for reporting.

use std::fmt::Display;

use serde::Deserialize;
use time::{Date, Duration, Month};

use crate::html::format_date;

/// The reporting period selected on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The calendar week containing the reference date.
    Week,
    /// The calendar month containing the reference date.
    #[default]
    Month,
    /// The calendar year containing the reference date.
    Year,
    /// Every transaction, regardless of date.
    All,
}

impl Period {
    /// All periods in display order.
    pub const ALL: [Period; 4] = [Period::Week, Period::Month, Period::Year, Period::All];

    /// The value used for this period in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }

    /// The human readable name of the period.
    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::Year => "This Year",
            Self::All => "All Time",
        }
    }

    /// The inclusive date range covered by the period around `reference`, or
    /// `None` for [Period::All].
    pub fn range(self, reference: Date, week_start: WeekStart) -> Option<DateRange> {
        match self {
            Self::Week => Some(week_bounds(reference, week_start)),
            Self::Month => Some(month_bounds(reference.year(), reference.month())),
            Self::Year => Some(year_bounds(reference.year())),
            Self::All => None,
        }
    }
}

/// The first day of a calendar week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Weeks run from Sunday to Saturday.
    #[default]
    Sunday,
    /// Weeks run from Monday to Sunday.
    Monday,
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls within the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            format_date(self.start),
            format_date(self.end)
        )
    }
}

fn week_bounds(reference: Date, week_start: WeekStart) -> DateRange {
    let days_into_week = match week_start {
        WeekStart::Sunday => reference.weekday().number_days_from_sunday(),
        WeekStart::Monday => reference.weekday().number_days_from_monday(),
    };
    let start = reference - Duration::days(days_into_week.into());
    let end = start + Duration::days(6);

    DateRange { start, end }
}

fn month_bounds(year: i32, month: Month) -> DateRange {
    // Day 1 and the last day of a month always exist.
    let start = Date::from_calendar_date(year, month, 1).unwrap_or(Date::MIN);
    let end = Date::from_calendar_date(year, month, month.length(year)).unwrap_or(Date::MAX);

    DateRange { start, end }
}

fn year_bounds(year: i32) -> DateRange {
    DateRange {
        start: Date::from_calendar_date(year, Month::January, 1).unwrap_or(Date::MIN),
        end: Date::from_calendar_date(year, Month::December, 31).unwrap_or(Date::MAX),
    }
}
