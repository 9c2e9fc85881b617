pub mod aggregate;
pub mod crosswalk;
pub mod tracts;

pub use aggregate::{aggregate_count_data, GroupMember};
pub use crosswalk::{Crosswalk, CrosswalkEntry, CrosswalkFiles, MemoryCrosswalk};
pub use tracts::{MemoryTracts, Tract, TractFiles, TractReference};
