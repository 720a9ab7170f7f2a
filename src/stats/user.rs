use crate::error::{BikeshareError, Result};
use crate::model::Dataset;
use crate::stats::types::{BirthYearStats, UserStats, ValueCount};
use crate::stats::utility::{mode, value_counts};

/// Rider type, gender and birth-year breakdowns.
///
/// Blank user-type and gender cells are left out of the counts. Gender and
/// birth-year results are only produced when the source table has those
/// columns; birth-year stats are also absent when none of the trips carry a
/// birth year.
pub fn compute(dataset: &Dataset) -> Result<UserStats> {
    let schema = dataset.schema();

    let user_types = counts(dataset.iter().filter_map(|r| r.user_type.as_deref()));

    let genders = schema
        .has_gender
        .then(|| counts(dataset.iter().filter_map(|r| r.gender.as_deref())));

    let years: Vec<i32> = if schema.has_birth_year {
        dataset.iter().filter_map(|r| r.birth_year).collect()
    } else {
        Vec::new()
    };
    let birth_years = if years.is_empty() {
        None
    } else {
        Some(birth_year_stats(&years)?)
    };

    Ok(UserStats {
        user_types,
        genders,
        birth_years,
    })
}

fn counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<ValueCount> {
    value_counts(values)
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

/// Earliest, most recent and most common year.
///
/// # Errors
///
/// `EmptyDataset` when `years` is empty.
pub fn birth_year_stats(years: &[i32]) -> Result<BirthYearStats> {
    let statistic = "birth year statistics";
    let earliest = *years.iter().min().ok_or_else(|| BikeshareError::empty(statistic))?;
    let most_recent = *years.iter().max().ok_or_else(|| BikeshareError::empty(statistic))?;
    let most_common = mode(years.iter().copied()).ok_or_else(|| BikeshareError::empty(statistic))?;

    Ok(BirthYearStats {
        earliest,
        most_recent,
        most_common,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn rider(user_type: Option<&str>, gender: Option<&str>, birth_year: Option<i32>) -> TripRecord {
        let t = NaiveDate::from_ymd_opt(2017, 6, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        TripRecord::new(
            t,
            None,
            60,
            "A".into(),
            "B".into(),
            user_type.map(String::from),
            gender.map(String::from),
            birth_year,
        )
    }

    const FULL: Schema = Schema {
        has_gender: true,
        has_birth_year: true,
    };

    #[test]
    fn test_user_type_counts_in_descending_order() {
        let dataset = Dataset::new(
            Schema::default(),
            vec![
                rider(Some("Customer"), None, None),
                rider(Some("Subscriber"), None, None),
                rider(Some("Subscriber"), None, None),
            ],
        );
        let stats = compute(&dataset).unwrap();

        assert_eq!(
            stats.user_types,
            vec![
                ValueCount {
                    value: "Subscriber".into(),
                    count: 2
                },
                ValueCount {
                    value: "Customer".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_schema_without_gender_omits_section() {
        let dataset = Dataset::new(Schema::default(), vec![rider(Some("Subscriber"), None, None)]);
        let stats = compute(&dataset).unwrap();
        assert!(stats.genders.is_none());
        assert!(stats.birth_years.is_none());
    }

    #[test]
    fn test_gender_and_birth_years() {
        let dataset = Dataset::new(
            FULL,
            vec![
                rider(Some("Subscriber"), Some("Male"), Some(1985)),
                rider(Some("Subscriber"), Some("Female"), Some(1992)),
                rider(Some("Customer"), None, None),
                rider(Some("Subscriber"), Some("Female"), Some(1992)),
                rider(Some("Subscriber"), Some("Male"), Some(1960)),
            ],
        );
        let stats = compute(&dataset).unwrap();

        let genders = stats.genders.unwrap();
        assert_eq!(genders.len(), 2);
        // Male seen first, tie at two each
        assert_eq!(genders[0].value, "Male");
        assert_eq!(genders[0].count, 2);

        let years = stats.birth_years.unwrap();
        assert_eq!(years.earliest, 1960);
        assert_eq!(years.most_recent, 1992);
        assert_eq!(years.most_common.value, 1992);
        assert_eq!(years.most_common.count, 2);
    }

    #[test]
    fn test_blank_user_types_are_skipped() {
        let dataset = Dataset::new(
            Schema::default(),
            vec![rider(None, None, None), rider(Some("Customer"), None, None)],
        );
        let stats = compute(&dataset).unwrap();
        assert_eq!(stats.user_types.len(), 1);
    }

    #[test]
    fn test_empty_dataset_without_birth_years_is_tolerated() {
        let dataset = Dataset::new(
            Schema {
                has_gender: true,
                has_birth_year: false,
            },
            vec![],
        );
        let stats = compute(&dataset).unwrap();
        assert!(stats.user_types.is_empty());
        assert_eq!(stats.genders, Some(vec![]));
    }

    #[test]
    fn test_birth_year_column_with_no_values_omits_section() {
        let dataset = Dataset::new(FULL, vec![rider(Some("Customer"), None, None)]);
        let stats = compute(&dataset).unwrap();

        assert!(stats.birth_years.is_none());
        assert_eq!(stats.genders, Some(vec![]));
        assert_eq!(
            stats.user_types,
            vec![ValueCount {
                value: "Customer".into(),
                count: 1
            }]
        );
    }

    #[test]
    fn test_empty_dataset_with_full_schema_is_tolerated() {
        let stats = compute(&Dataset::new(FULL, vec![])).unwrap();
        assert!(stats.user_types.is_empty());
        assert_eq!(stats.genders, Some(vec![]));
        assert!(stats.birth_years.is_none());
    }

    #[test]
    fn test_birth_year_stats_on_no_years_fails() {
        assert!(matches!(
            birth_year_stats(&[]),
            Err(BikeshareError::EmptyDataset {
                statistic: "birth year statistics"
            })
        ));
    }
}
