//! CSV parser for bike-share trip tables.

use std::io::Read;

use chrono::NaiveDateTime;
use csv::StringRecord;
use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::model::{Dataset, Schema, TripRecord};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Column positions resolved from the header row.
struct Columns {
    start_time: usize,
    end_time: Option<usize>,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require =
            |name: &str| find(name).ok_or_else(|| BikeshareError::MissingColumn(name.to_string()));

        Ok(Columns {
            start_time: require(START_TIME)?,
            end_time: find(END_TIME),
            trip_duration: require(TRIP_DURATION)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: require(USER_TYPE)?,
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn schema(&self) -> Schema {
        Schema {
            has_gender: self.gender.is_some(),
            has_birth_year: self.birth_year.is_some(),
        }
    }
}

/// Parses a whole trip table into a [`Dataset`].
///
/// # Errors
///
/// Fails on the first row whose required fields do not parse; no partial
/// dataset is ever returned.
pub fn parse_trips<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::resolve(rdr.headers()?)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let raw = result?;
        records.push(parse_row(&raw, &columns, row)?);
    }

    debug!(rows = records.len(), "Trip table parsed");
    Ok(Dataset::new(columns.schema(), records))
}

fn parse_row(raw: &StringRecord, columns: &Columns, row: usize) -> Result<TripRecord> {
    let field = |idx: usize| raw.get(idx).unwrap_or("").trim();
    let optional = |idx: Option<usize>| {
        idx.map(field)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let start_time = parse_timestamp(field(columns.start_time))
        .ok_or_else(|| malformed_value(row, START_TIME, field(columns.start_time)))?;

    let end_time = match columns.end_time.map(field).filter(|v| !v.is_empty()) {
        Some(value) => {
            Some(parse_timestamp(value).ok_or_else(|| malformed_value(row, END_TIME, value))?)
        }
        None => None,
    };

    let trip_duration = parse_duration(field(columns.trip_duration))
        .ok_or_else(|| malformed_value(row, TRIP_DURATION, field(columns.trip_duration)))?;

    let start_station = required_text(field(columns.start_station), row, START_STATION)?;
    let end_station = required_text(field(columns.end_station), row, END_STATION)?;

    let birth_year = match columns.birth_year.map(field).filter(|v| !v.is_empty()) {
        Some(value) => {
            Some(parse_birth_year(value).ok_or_else(|| malformed_value(row, BIRTH_YEAR, value))?)
        }
        None => None,
    };

    Ok(TripRecord::new(
        start_time,
        end_time,
        trip_duration,
        start_station,
        end_station,
        optional(Some(columns.user_type)),
        optional(columns.gender),
        birth_year,
    ))
}

fn malformed_value(row: usize, column: &str, value: &str) -> BikeshareError {
    BikeshareError::malformed(row, column, format!("cannot parse '{value}'"))
}

fn required_text(value: &str, row: usize, column: &str) -> Result<String> {
    if value.is_empty() {
        return Err(BikeshareError::malformed(row, column, "value is empty"));
    }
    Ok(value.to_string())
}

/// Parses a timestamp in any of the layouts found in published trip tables.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Whole seconds; decimal values such as `1039.7` are floored.
fn parse_duration(value: &str) -> Option<u64> {
    if let Ok(secs) = value.parse::<u64>() {
        return Some(secs);
    }
    let secs = value.parse::<f64>().ok()?;
    if secs.is_finite() && secs >= 0.0 && secs <= u64::MAX as f64 {
        Some(secs.floor() as u64)
    } else {
        None
    }
}

/// Accepts `1989` as well as the float-typed `1989.0`.
fn parse_birth_year(value: &str) -> Option<i32> {
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    let year = value.parse::<f64>().ok()?;
    if year.is_finite() && year.fract() == 0.0 && year.abs() <= i32::MAX as f64 {
        Some(year as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Weekday};

    const CHICAGO_LIKE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Customer,,
";

    const WASHINGTON_LIKE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
482740,2017-03-11 10:40:00,2017-03-11 10:46:00,402.549,Yuma St & Tenley Circle NW,Connecticut Ave & Yuma St NW,Subscriber
";

    #[test]
    fn test_parse_chicago_like_table() {
        let dataset = parse_trips(CHICAGO_LIKE.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(
            dataset.schema(),
            Schema {
                has_gender: true,
                has_birth_year: true
            }
        );

        let first = &dataset.records()[0];
        assert_eq!(first.month(), 6);
        assert_eq!(first.day_of_week(), Weekday::Fri);
        assert_eq!(first.hour(), 15);
        assert_eq!(first.trip_duration, 321);
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.birth_year, Some(1992));
        assert_eq!(first.end_time.map(|t| t.minute()), Some(14));

        let last = &dataset.records()[2];
        assert_eq!(last.gender, None);
        assert_eq!(last.birth_year, None);
        assert_eq!(last.user_type.as_deref(), Some("Customer"));
    }

    #[test]
    fn test_parse_washington_like_table_has_no_optional_columns() {
        let dataset = parse_trips(WASHINGTON_LIKE.as_bytes()).unwrap();

        assert_eq!(dataset.schema(), Schema::default());
        assert_eq!(dataset.records()[0].trip_duration, 489);
        assert_eq!(dataset.records()[1].start_time.month(), 3);
    }

    #[test]
    fn test_bad_start_time_fails_whole_load() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:07:57,100,A,B,Subscriber
not-a-date,100,A,B,Subscriber
";
        let err = parse_trips(csv.as_bytes()).unwrap_err();
        match err {
            BikeshareError::MalformedRecord { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, START_TIME);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_duration_rejected() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:07:57,-5,A,B,Subscriber
";
        assert!(matches!(
            parse_trips(csv.as_bytes()),
            Err(BikeshareError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_empty_station_rejected() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:07:57,60,,B,Subscriber
";
        let err = parse_trips(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            BikeshareError::MalformedRecord { ref column, .. } if column == START_STATION
        ));
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Start Time,Start Station,End Station,User Type\n";
        assert!(matches!(
            parse_trips(csv.as_bytes()),
            Err(BikeshareError::MissingColumn(name)) if name == TRIP_DURATION
        ));
    }

    #[test]
    fn test_empty_table_is_valid() {
        let csv = "Start Time,Trip Duration,Start Station,End Station,User Type\n";
        let dataset = parse_trips(csv.as_bytes()).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_timestamp_layouts() {
        assert!(parse_timestamp("2017-01-01 09:07:57").is_some());
        assert!(parse_timestamp("2017-01-01 09:07:57.250").is_some());
        assert!(parse_timestamp("2017-01-01T09:07:57").is_some());
        assert!(parse_timestamp("2017-01-01 09:07").is_some());
        assert!(parse_timestamp("2017-02-30 09:07:57").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_duration_and_birth_year_parsing() {
        assert_eq!(parse_duration("360"), Some(360));
        assert_eq!(parse_duration("1039.9"), Some(1039));
        assert_eq!(parse_duration("NaN"), None);
        assert_eq!(parse_duration("abc"), None);

        assert_eq!(parse_birth_year("1989"), Some(1989));
        assert_eq!(parse_birth_year("1989.0"), Some(1989));
        assert_eq!(parse_birth_year("1989.5"), None);
    }
}
