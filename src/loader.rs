//! Loads a city's trip table from the configured catalog.

use std::fs::File;
use std::io::BufReader;

use tracing::info;

use crate::config::{CityCatalog, CityId};
use crate::error::{BikeshareError, Result};
use crate::model::Dataset;
use crate::parser::parse_trips;

/// Reads trip tables for the cities listed in its catalog.
///
/// Every call reads the source again; nothing is cached between loads.
#[derive(Debug, Clone)]
pub struct RecordLoader {
    catalog: CityCatalog,
}

impl RecordLoader {
    pub fn new(catalog: CityCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    /// Loads and parses the full table for `city`.
    #[tracing::instrument(skip(self, city), fields(city = %city))]
    pub fn load(&self, city: CityId) -> Result<Dataset> {
        let path = self.catalog.source_for(city)?;
        info!(path = %path.display(), "Loading trip data");

        let file = File::open(path).map_err(|source| BikeshareError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = parse_trips(BufReader::new(file))?;

        info!(records = dataset.len(), "Trip data loaded");
        Ok(dataset)
    }

    /// Same as [`RecordLoader::load`] for a city given by name.
    pub fn load_named(&self, city: &str) -> Result<Dataset> {
        self.load(city.parse()?)
    }
}
