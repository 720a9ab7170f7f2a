//! Descriptive statistics over a filtered [`Dataset`](crate::model::Dataset).
//!
//! The four modules are independent of each other: each reads the dataset
//! and returns its own result type from [`types`]. Any statistic built on a
//! mode or mean fails with `EmptyDataset` rather than inventing a value.

pub mod duration;
pub mod station;
pub mod time;
pub mod types;
pub mod user;
pub mod utility;
