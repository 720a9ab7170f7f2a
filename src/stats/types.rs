//! Result types produced by the statistics modules.

use chrono::Weekday;
use serde::{Serialize, Serializer};

use crate::model::weekday_name;

/// A most-frequent value together with how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popular<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Popular<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Popular<U> {
        Popular {
            value: f(self.value),
            count: self.count,
        }
    }
}

/// One distinct category and its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Most common month, weekday and start hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub most_common_month: Popular<u32>,
    #[serde(serialize_with = "serialize_popular_weekday")]
    pub most_common_day: Popular<Weekday>,
    pub most_common_hour: Popular<u32>,
}

fn serialize_popular_weekday<S: Serializer>(
    popular: &Popular<Weekday>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Popular {
        value: weekday_name(popular.value),
        count: popular.count,
    }
    .serialize(serializer)
}

/// An ordered (start, end) station pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Trip {
    pub start: String,
    pub end: String,
}

/// Most common start station, end station and start/end combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub most_common_start: Popular<String>,
    pub most_common_end: Popular<String>,
    pub most_common_trip: Popular<Trip>,
}

/// Whole hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HoursMinutesSeconds {
    pub hours: u128,
    pub minutes: u8,
    pub seconds: u8,
}

/// Whole minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MinutesSeconds {
    pub minutes: u64,
    pub seconds: u8,
}

/// Total and mean trip duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trip_count: usize,
    pub total_seconds: u128,
    pub mean_seconds: f64,
}

impl DurationStats {
    /// Total split by floor division into hours, minutes and seconds.
    pub fn total_breakdown(&self) -> HoursMinutesSeconds {
        let total = self.total_seconds;
        HoursMinutesSeconds {
            hours: total / 3600,
            minutes: ((total % 3600) / 60) as u8,
            seconds: (total % 60) as u8,
        }
    }

    /// Mean split into minutes and seconds, truncating any fraction.
    pub fn mean_breakdown(&self) -> MinutesSeconds {
        let mean = self.mean_seconds;
        MinutesSeconds {
            minutes: (mean / 60.0).floor() as u64,
            seconds: (mean % 60.0).floor() as u8,
        }
    }
}

/// Earliest, most recent and most common rider birth year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: Popular<i32>,
}

/// Rider demographics.
///
/// `genders` and `birth_years` are `None` when the source table has no such
/// column, which is distinct from a column whose values are all blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<ValueCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genders: Option<Vec<ValueCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_years: Option<BirthYearStats>,
}
