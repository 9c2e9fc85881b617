// src/geo/crosswalk.rs

use anyhow::{bail, Context, Result};
use std::{collections::HashMap, fs::File, path::PathBuf};
use tracing::debug;

use crate::params::Level;
use crate::process::{
    utils::{normalize_geocode, TRACT_WIDTH},
    RawTable,
};

/// One tract's membership in a coarser unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrosswalkEntry {
    pub geo_id_tract: String,
    pub geo_id: String,
    pub geo_name: String,
}

impl CrosswalkEntry {
    pub fn new(tract: &str, unit: &str, unit_name: &str) -> Self {
        Self {
            geo_id_tract: tract.to_string(),
            geo_id: unit.to_string(),
            geo_name: unit_name.to_string(),
        }
    }
}

/// Tract → NTA / PUMA lookups for a year.
pub trait Crosswalk {
    /// Entries for `level`. `Level::Tract` has no crosswalk.
    fn tracts_to(&self, level: Level, year: u16) -> Result<Vec<CrosswalkEntry>>;

    fn tracts_to_ntas(&self, year: u16) -> Result<Vec<CrosswalkEntry>> {
        self.tracts_to(Level::Nta, year)
    }

    fn tracts_to_pumas(&self, year: u16) -> Result<Vec<CrosswalkEntry>> {
        self.tracts_to(Level::Puma, year)
    }
}

impl<T: Crosswalk + ?Sized> Crosswalk for &T {
    fn tracts_to(&self, level: Level, year: u16) -> Result<Vec<CrosswalkEntry>> {
        (**self).tracts_to(level, year)
    }
}

impl<T: Crosswalk + ?Sized> Crosswalk for Box<T> {
    fn tracts_to(&self, level: Level, year: u16) -> Result<Vec<CrosswalkEntry>> {
        (**self).tracts_to(level, year)
    }
}

/// Reads `<dir>/crosswalks/tracts_to_<level>_<year>.csv` with columns
/// `geo_id_tract`, `geo_id_<level>`, `geo_name_<level>`.
#[derive(Debug, Clone)]
pub struct CrosswalkFiles {
    dir: PathBuf,
}

impl CrosswalkFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, level: Level, year: u16) -> PathBuf {
        self.dir
            .join("crosswalks")
            .join(format!("tracts_to_{}_{}.csv", level, year))
    }
}

impl Crosswalk for CrosswalkFiles {
    fn tracts_to(&self, level: Level, year: u16) -> Result<Vec<CrosswalkEntry>> {
        if level == Level::Tract {
            bail!("tracts have no crosswalk to themselves");
        }
        let path = self.path_for(level, year);
        let file =
            File::open(&path).with_context(|| format!("opening crosswalk {}", path.display()))?;
        let raw = RawTable::from_csv(&path.display().to_string(), file)?;
        let entries = entries_from_raw(&raw, level)
            .with_context(|| format!("reading crosswalk {}", path.display()))?;
        debug!(%level, year, entries = entries.len(), "loaded crosswalk");
        Ok(entries)
    }
}

fn entries_from_raw(raw: &RawTable, level: Level) -> Result<Vec<CrosswalkEntry>> {
    let tract = raw.require_column("geo_id_tract")?;
    let unit = raw.require_column(&format!("geo_id_{}", level))?;
    let name = raw.require_column(&format!("geo_name_{}", level))?;

    Ok(raw
        .rows
        .iter()
        .map(|row| CrosswalkEntry {
            geo_id_tract: normalize_geocode(&row[tract], TRACT_WIDTH),
            geo_id: row[unit].trim().to_string(),
            geo_name: row[name].trim().to_string(),
        })
        .collect())
}

/// Fixed crosswalks, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryCrosswalk {
    entries: HashMap<(Level, u16), Vec<CrosswalkEntry>>,
}

impl MemoryCrosswalk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, level: Level, year: u16, entries: Vec<CrosswalkEntry>) -> Self {
        self.entries.insert((level, year), entries);
        self
    }
}

impl Crosswalk for MemoryCrosswalk {
    fn tracts_to(&self, level: Level, year: u16) -> Result<Vec<CrosswalkEntry>> {
        self.entries
            .get(&(level, year))
            .cloned()
            .with_context(|| format!("no {} crosswalk for {}", level, year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_level_specific_columns() -> Result<()> {
        let dir = tempdir()?;
        let files = CrosswalkFiles::new(dir.path());
        let path = files.path_for(Level::Puma, 2017);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(
            &path,
            "geo_id_tract,geo_id_puma,geo_name_puma\n42101000100,4203201,Center City\n",
        )?;

        let entries = files.tracts_to_pumas(2017)?;
        assert_eq!(
            entries,
            vec![CrosswalkEntry::new("42101000100", "4203201", "Center City")]
        );
        assert!(files.tracts_to_ntas(2017).is_err());
        assert!(files.tracts_to(Level::Tract, 2017).is_err());
        Ok(())
    }

    #[test]
    fn wrong_level_columns_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let files = CrosswalkFiles::new(dir.path());
        let path = files.path_for(Level::Nta, 2017);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, "geo_id_tract,geo_id_puma,geo_name_puma\n1,2,3\n")?;
        assert!(files.tracts_to_ntas(2017).is_err());
        Ok(())
    }
}
