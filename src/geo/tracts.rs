// src/geo/tracts.rs

use anyhow::{Context, Result};
use std::{
    collections::HashMap,
    fs::File,
    path::PathBuf,
};
use tracing::debug;

use crate::process::{utils::{normalize_geocode, TRACT_WIDTH}, RawTable};

/// A census tract from the authoritative reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tract {
    pub geo_id: String,
    pub geo_name: Option<String>,
    pub geometry: Option<String>,
}

impl Tract {
    pub fn new(geo_id: impl Into<String>, geo_name: impl Into<String>) -> Self {
        Self {
            geo_id: geo_id.into(),
            geo_name: Some(geo_name.into()),
            geometry: None,
        }
    }
}

/// The set of in-scope tracts for a year. Defines which output rows exist.
pub trait TractReference {
    fn tracts(&self, year: u16) -> Result<Vec<Tract>>;
}

impl<T: TractReference + ?Sized> TractReference for &T {
    fn tracts(&self, year: u16) -> Result<Vec<Tract>> {
        (**self).tracts(year)
    }
}

impl<T: TractReference + ?Sized> TractReference for Box<T> {
    fn tracts(&self, year: u16) -> Result<Vec<Tract>> {
        (**self).tracts(year)
    }
}

/// Reads `<dir>/tracts/<year>.csv` with columns `geo_id`, and optionally
/// `geo_name` and `geometry`.
#[derive(Debug, Clone)]
pub struct TractFiles {
    dir: PathBuf,
}

impl TractFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, year: u16) -> PathBuf {
        self.dir.join("tracts").join(format!("{}.csv", year))
    }
}

impl TractReference for TractFiles {
    fn tracts(&self, year: u16) -> Result<Vec<Tract>> {
        let path = self.path_for(year);
        let file =
            File::open(&path).with_context(|| format!("opening tracts {}", path.display()))?;
        let raw = RawTable::from_csv(&path.display().to_string(), file)?;
        let tracts = tracts_from_raw(&raw)
            .with_context(|| format!("reading tracts {}", path.display()))?;
        debug!(year, tracts = tracts.len(), "loaded tract reference");
        Ok(tracts)
    }
}

fn tracts_from_raw(raw: &RawTable) -> Result<Vec<Tract>> {
    let id = raw.require_column("geo_id")?;
    let name = raw.column_index("geo_name");
    let geometry = raw.column_index("geometry");

    Ok(raw
        .rows
        .iter()
        .map(|row| Tract {
            geo_id: normalize_geocode(&row[id], TRACT_WIDTH),
            geo_name: name.map(|i| row[i].clone()),
            geometry: geometry.map(|i| row[i].clone()).filter(|g| !g.is_empty()),
        })
        .collect())
}

/// Fixed tracts per year, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryTracts {
    by_year: HashMap<u16, Vec<Tract>>,
}

impl MemoryTracts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: u16, tracts: Vec<Tract>) -> Self {
        self.by_year.insert(year, tracts);
        self
    }
}

impl TractReference for MemoryTracts {
    fn tracts(&self, year: u16) -> Result<Vec<Tract>> {
        self.by_year
            .get(&year)
            .cloned()
            .with_context(|| format!("no tract reference for {}", year))
    }
}
