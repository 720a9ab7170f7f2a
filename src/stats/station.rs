use crate::error::{BikeshareError, Result};
use crate::model::Dataset;
use crate::stats::types::{StationStats, Trip};
use crate::stats::utility::mode;

/// Most popular start station, end station and start/end pair.
///
/// Ties go to the station (or pair) that appears first in the dataset.
pub fn compute(dataset: &Dataset) -> Result<StationStats> {
    let most_common_start = mode(dataset.iter().map(|r| r.start_station.as_str()))
        .ok_or_else(|| BikeshareError::empty("most common start station"))?
        .map(str::to_string);
    let most_common_end = mode(dataset.iter().map(|r| r.end_station.as_str()))
        .ok_or_else(|| BikeshareError::empty("most common end station"))?
        .map(str::to_string);
    let most_common_trip = mode(
        dataset
            .iter()
            .map(|r| (r.start_station.as_str(), r.end_station.as_str())),
    )
    .ok_or_else(|| BikeshareError::empty("most common trip"))?
    .map(|(start, end)| Trip {
        start: start.to_string(),
        end: end.to_string(),
    });

    Ok(StationStats {
        most_common_start,
        most_common_end,
        most_common_trip,
    })
}
