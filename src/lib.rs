pub mod analysis;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod output;
pub mod parser;
pub mod stats;

pub use analysis::{Analysis, AnalysisRequest, Report, analyze};
pub use error::{BikeshareError, Result};
