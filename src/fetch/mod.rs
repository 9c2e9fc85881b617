// src/fetch/mod.rs

use anyhow::Result;
use std::sync::Arc;

use crate::process::RawTable;

pub mod http;
pub mod local;
pub mod memory;
pub mod mirror;
pub mod names;

pub use http::HttpSource;
pub use local::LocalSource;
pub use memory::MemorySource;

/// Read-only access to LODES source files by id (e.g. `od/pa_od_main_JT00_2017.csv.gz`).
///
/// Fetch and parse failures are returned as-is; nothing here retries.
pub trait SourceFiles {
    fn fetch(&self, id: &str) -> Result<RawTable>;
}

impl<T: SourceFiles + ?Sized> SourceFiles for &T {
    fn fetch(&self, id: &str) -> Result<RawTable> {
        (**self).fetch(id)
    }
}

impl<T: SourceFiles + ?Sized> SourceFiles for Box<T> {
    fn fetch(&self, id: &str) -> Result<RawTable> {
        (**self).fetch(id)
    }
}

impl<T: SourceFiles + ?Sized> SourceFiles for Arc<T> {
    fn fetch(&self, id: &str) -> Result<RawTable> {
        (**self).fetch(id)
    }
}
