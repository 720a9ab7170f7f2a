//! Month and weekday filters over a [`Dataset`].

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::Serialize;
use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::model::{Dataset, month_name, weekday_name};

/// Trip tables only cover January through June.
pub const SUPPORTED_MONTHS: [&str; 6] = ["january", "february", "march", "april", "may", "june"];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(SupportedMonth),
}

/// A calendar month within January–June. Only obtainable through
/// [`MonthFilter::from_number`] or parsing a month name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedMonth(u32);

impl SupportedMonth {
    pub fn number(self) -> u32 {
        self.0
    }
}

impl MonthFilter {
    /// Builds a filter for a month number, rejecting anything outside January–June.
    pub fn from_number(month: u32) -> Result<Self> {
        if (1..=SUPPORTED_MONTHS.len() as u32).contains(&month) {
            Ok(MonthFilter::Month(SupportedMonth(month)))
        } else {
            Err(BikeshareError::InvalidFilter {
                axis: "month",
                value: month.to_string(),
            })
        }
    }

    /// The selected month number, or `None` for no constraint.
    pub fn month(self) -> Option<u32> {
        match self {
            MonthFilter::All => None,
            MonthFilter::Month(m) => Some(m.number()),
        }
    }

    fn matches(self, month: u32) -> bool {
        self.month().is_none_or(|m| m == month)
    }
}

impl FromStr for MonthFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_lowercase();
        if value == "all" {
            return Ok(MonthFilter::All);
        }
        SUPPORTED_MONTHS
            .iter()
            .position(|m| *m == value)
            .map(|idx| MonthFilter::Month(SupportedMonth(idx as u32 + 1)))
            .ok_or_else(|| BikeshareError::InvalidFilter {
                axis: "month",
                value: s.trim().to_string(),
            })
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(m) => f.write_str(month_name(m.number())),
        }
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Day(Weekday),
}

impl DayFilter {
    fn matches(self, day: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Day(d) => d == day,
        }
    }
}

impl FromStr for DayFilter {
    type Err = BikeshareError;

    /// Full weekday names, compared case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_lowercase();
        if value == "all" {
            return Ok(DayFilter::All);
        }
        WEEKDAYS
            .iter()
            .find(|d| weekday_name(**d).eq_ignore_ascii_case(&value))
            .map(|d| DayFilter::Day(*d))
            .ok_or_else(|| BikeshareError::InvalidFilter {
                axis: "day",
                value: s.trim().to_string(),
            })
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Day(d) => f.write_str(weekday_name(*d)),
        }
    }
}

impl Serialize for DayFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Returns a new dataset holding the records that match both filters, in
/// their original order. The input is left untouched.
#[tracing::instrument(skip(dataset, month, day), fields(input = dataset.len(), month = %month, day = %day))]
pub fn filter(dataset: &Dataset, month: MonthFilter, day: DayFilter) -> Dataset {
    let records = dataset
        .iter()
        .filter(|r| month.matches(r.month()) && day.matches(r.day_of_week()))
        .cloned()
        .collect::<Vec<_>>();

    debug!(output = records.len(), "Filter applied");
    Dataset::new(dataset.schema(), records)
}
