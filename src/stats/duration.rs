use crate::error::{BikeshareError, Result};
use crate::model::Dataset;
use crate::stats::types::DurationStats;
use crate::stats::utility::mean;

/// Total and mean trip duration in seconds.
pub fn compute(dataset: &Dataset) -> Result<DurationStats> {
    let durations: Vec<u64> = dataset.iter().map(|r| r.trip_duration).collect();
    let mean_seconds = mean(&durations).ok_or_else(|| BikeshareError::empty("mean trip duration"))?;
    let total_seconds = durations.iter().map(|d| u128::from(*d)).sum();

    Ok(DurationStats {
        trip_count: durations.len(),
        total_seconds,
        mean_seconds,
    })
}
