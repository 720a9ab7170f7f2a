use crate::error::{BikeshareError, Result};
use crate::model::Dataset;
use crate::stats::types::TimeStats;
use crate::stats::utility::mode;

/// Most common month, weekday and start hour of a dataset.
///
/// Ties go to the value seen first in dataset order. The hour is taken from
/// each record's start time here rather than stored on the record.
pub fn compute(dataset: &Dataset) -> Result<TimeStats> {
    let most_common_month = mode(dataset.iter().map(|r| r.month()))
        .ok_or_else(|| BikeshareError::empty("most common month"))?;
    let most_common_day = mode(dataset.iter().map(|r| r.day_of_week()))
        .ok_or_else(|| BikeshareError::empty("most common day"))?;
    let most_common_hour = mode(dataset.iter().map(|r| r.hour()))
        .ok_or_else(|| BikeshareError::empty("most common hour"))?;

    Ok(TimeStats {
        most_common_month,
        most_common_day,
        most_common_hour,
    })
}
