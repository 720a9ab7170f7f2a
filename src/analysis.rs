//! One analysis request end to end: load, filter, aggregate.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::CityId;
use crate::error::{BikeshareError, Result};
use crate::filter::{DayFilter, MonthFilter, filter};
use crate::loader::RecordLoader;
use crate::model::Dataset;
use crate::stats::types::{DurationStats, StationStats, TimeStats, UserStats};
use crate::stats::{duration, station, time, user};

/// `EmptyDataset` statistic reported when the filters match no trips at all.
pub const NO_MATCHING_TRIPS: &str = "trip statistics";

/// City and filters selected for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub city: CityId,
    pub month: MonthFilter,
    pub day: DayFilter,
}

/// All statistics for one filtered dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub request: AnalysisRequest,
    pub trip_count: usize,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

impl Report {
    /// Runs every statistics module over an already filtered dataset.
    pub fn compute(request: AnalysisRequest, dataset: &Dataset) -> Result<Self> {
        if dataset.is_empty() {
            return Err(BikeshareError::empty(NO_MATCHING_TRIPS));
        }

        Ok(Report {
            request,
            trip_count: dataset.len(),
            time: time::compute(dataset)?,
            stations: station::compute(dataset)?,
            durations: duration::compute(dataset)?,
            users: user::compute(dataset)?,
        })
    }
}

/// The filtered trips, kept for paging, and the report computed from them.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub dataset: Dataset,
    pub report: Report,
}

/// Loads the requested city, applies the filters and computes the report.
///
/// # Errors
///
/// Load errors pass through unchanged; a filter that matches no trips
/// yields `EmptyDataset`.
#[tracing::instrument(skip(loader, request), fields(city = %request.city, month = %request.month, day = %request.day))]
pub fn analyze(loader: &RecordLoader, request: &AnalysisRequest) -> Result<Analysis> {
    let full = loader.load(request.city)?;
    let dataset = filter(&full, request.month, request.day);
    info!(
        loaded = full.len(),
        matched = dataset.len(),
        "Filters applied"
    );

    let report = Report::compute(*request, &dataset)?;
    debug!("{:#?}", report);

    Ok(Analysis { dataset, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CityCatalog;
    use std::env;
    use std::fs;

    fn loader_with(name: &str, contents: &str) -> (RecordLoader, std::path::PathBuf) {
        let path = env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        let loader = RecordLoader::new(CityCatalog::from_entries([(CityId::Washington, path.clone())]));
        (loader, path)
    }

    const TABLE: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-03-06 08:00:00,2017-03-06 08:01:00,60,A,B,Subscriber
2017-03-07 08:00:00,2017-03-07 08:02:00,120,A,B,Subscriber
2017-04-03 17:00:00,2017-04-03 17:03:00,180,A,C,Customer
";

    #[test]
    fn test_analyze_full_pipeline() {
        let (loader, path) = loader_with("bikeshare_analysis_test_full.csv", TABLE);
        let request = AnalysisRequest {
            city: CityId::Washington,
            month: MonthFilter::All,
            day: DayFilter::All,
        };

        let analysis = analyze(&loader, &request).unwrap();
        let report = &analysis.report;
        assert_eq!(report.trip_count, 3);
        assert_eq!(report.time.most_common_month.value, 3);
        assert_eq!(report.time.most_common_hour.value, 8);
        assert_eq!(report.stations.most_common_trip.count, 2);
        assert_eq!(report.durations.total_seconds, 360);
        assert!(report.users.genders.is_none());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_analyze_with_filters() {
        let (loader, path) = loader_with("bikeshare_analysis_test_filtered.csv", TABLE);
        let request = AnalysisRequest {
            city: CityId::Washington,
            month: "april".parse().unwrap(),
            day: "monday".parse().unwrap(),
        };

        let analysis = analyze(&loader, &request).unwrap();
        assert_eq!(analysis.dataset.len(), 1);
        assert_eq!(analysis.report.stations.most_common_end.value, "C");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_analyze_no_matches_is_empty_dataset() {
        let (loader, path) = loader_with("bikeshare_analysis_test_empty.csv", TABLE);
        let request = AnalysisRequest {
            city: CityId::Washington,
            month: MonthFilter::from_number(6).unwrap(),
            day: DayFilter::All,
        };

        assert!(matches!(
            analyze(&loader, &request),
            Err(BikeshareError::EmptyDataset {
                statistic: NO_MATCHING_TRIPS
            })
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_report_serializes_request_inline() {
        let (loader, path) = loader_with("bikeshare_analysis_test_json.csv", TABLE);
        let request = AnalysisRequest {
            city: CityId::Washington,
            month: MonthFilter::from_number(3).unwrap(),
            day: DayFilter::All,
        };

        let analysis = analyze(&loader, &request).unwrap();
        let json = serde_json::to_value(&analysis.report).unwrap();
        assert_eq!(json["city"], "washington");
        assert_eq!(json["month"], "March");
        assert_eq!(json["day"], "all");
        assert_eq!(json["trip_count"], 2);

        fs::remove_file(&path).unwrap();
    }
}
