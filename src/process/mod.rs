// src/process/mod.rs

pub mod aggregate;
pub mod group;
pub mod longform;
pub mod raw_table;
pub mod summary;
pub mod table;
pub mod utils;

pub use raw_table::RawTable;
pub use summary::Residency;
pub use table::{CountTable, GeoRow};
