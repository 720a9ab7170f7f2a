//! Trip records and the immutable dataset they are collected into.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

/// Number of records the raw viewer shows per page.
pub const PAGE_SIZE: usize = 5;

/// A single bike trip with its calendar fields derived from `start_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Whole seconds.
    pub trip_duration: u64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    // derived once at construction
    month: u32,
    day_of_week: Weekday,
}

impl TripRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start_time: NaiveDateTime,
        end_time: Option<NaiveDateTime>,
        trip_duration: u64,
        start_station: String,
        end_station: String,
        user_type: Option<String>,
        gender: Option<String>,
        birth_year: Option<i32>,
    ) -> Self {
        TripRecord {
            month: start_time.month(),
            day_of_week: start_time.weekday(),
            start_time,
            end_time,
            trip_duration,
            start_station,
            end_station,
            user_type,
            gender,
            birth_year,
        }
    }

    /// Calendar month of the start time, 1 through 12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    /// Hour of the start time, 0 through 23.
    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }
}

/// Full English name of a weekday, e.g. "Monday".
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Full English name of a calendar month (1-based).
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Which optional columns the source table carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// Ordered, immutable collection of trips in source row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: Schema,
    records: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(schema: Schema, records: Vec<TripRecord>) -> Self {
        Dataset { schema, records }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns up to `size` records starting at `offset`.
    ///
    /// An offset past the end yields an empty slice, so callers can keep
    /// advancing by `size` until nothing comes back.
    pub fn page(&self, offset: usize, size: usize) -> &[TripRecord] {
        let start = offset.min(self.records.len());
        let end = offset.saturating_add(size).min(self.records.len());
        &self.records[start..end]
    }

    /// Consecutive pages of `size` records. `size` must be non-zero.
    pub fn pages(&self, size: usize) -> std::slice::Chunks<'_, TripRecord> {
        self.records.chunks(size)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
