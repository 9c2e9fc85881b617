//! Tract-level LODES employment tables for one state.
//!
//! Raw WAC/RAC/OD files are fetched through a [`fetch::SourceFiles`], reduced
//! to census tracts, materialised as parquet under the data directory and
//! optionally re-aggregated to NTAs or PUMAs.

pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod geo;
pub mod lodes;
pub mod output;
pub mod params;
pub mod process;
pub mod schema;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use dataset::{Dataset, Request};
pub use error::ValidationError;
pub use lodes::Lodes;
pub use params::{Characteristics, JobType, Level, OdKind};
pub use process::{CountTable, GeoRow};
