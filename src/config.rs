//! Supported cities and the catalog mapping each one to its trip table.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::error::{BikeshareError, Result};

/// One of the cities with published trip data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CityId {
    Chicago,
    NewYorkCity,
    Washington,
}

impl CityId {
    pub const ALL: [CityId; 3] = [CityId::Chicago, CityId::NewYorkCity, CityId::Washington];

    /// Lower-case name as typed by users and used as catalog keys.
    pub fn as_str(self) -> &'static str {
        match self {
            CityId::Chicago => "chicago",
            CityId::NewYorkCity => "new york city",
            CityId::Washington => "washington",
        }
    }

    /// File name of the city's table inside the data directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            CityId::Chicago => "chicago.csv",
            CityId::NewYorkCity => "new_york_city.csv",
            CityId::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CityId::Chicago => "Chicago",
            CityId::NewYorkCity => "New York City",
            CityId::Washington => "Washington",
        };
        f.write_str(name)
    }
}

impl FromStr for CityId {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "chicago" => Ok(CityId::Chicago),
            "new york city" | "new_york_city" | "nyc" => Ok(CityId::NewYorkCity),
            "washington" => Ok(CityId::Washington),
            _ => Err(BikeshareError::UnknownCity(s.trim().to_string())),
        }
    }
}

/// Immutable mapping from city to the CSV file holding its trips.
///
/// The default catalog resolves the standard file names against a data
/// directory. A JSON override has the shape:
/// ```json
/// {
///   "chicago": "/data/chicago.csv",
///   "washington": "dc/washington.csv"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CityCatalog {
    entries: BTreeMap<CityId, PathBuf>,
}

impl CityCatalog {
    /// Every supported city, using its standard file name under `data_dir`.
    pub fn from_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let entries = CityId::ALL
            .iter()
            .map(|city| (*city, data_dir.join(city.default_file_name())))
            .collect();
        Self { entries }
    }

    /// Builds a catalog from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (CityId, PathBuf)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Loads the catalog from a JSON file at `path`.
    ///
    /// Relative table paths resolve against the directory holding the JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BikeshareError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| BikeshareError::Config(format!("{}: {e}", path.display())))?;

        let base = path.parent().unwrap_or(Path::new("."));
        let mut entries = BTreeMap::new();
        for (name, table) in raw {
            let city: CityId = name.parse()?;
            let table = PathBuf::from(table);
            let table = if table.is_relative() {
                base.join(table)
            } else {
                table
            };
            entries.insert(city, table);
        }

        if entries.is_empty() {
            return Err(BikeshareError::Config(format!(
                "{} lists no cities",
                path.display()
            )));
        }

        Ok(Self { entries })
    }

    /// Returns the table path for `city`, failing if it is not configured.
    pub fn source_for(&self, city: CityId) -> Result<&Path> {
        self.entries
            .get(&city)
            .map(PathBuf::as_path)
            .ok_or_else(|| BikeshareError::UnknownCity(city.as_str().to_string()))
    }

    /// Iterates over all `(city, path)` pairs in city order.
    pub fn iter(&self) -> impl Iterator<Item = (CityId, &Path)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_path()))
    }
}
