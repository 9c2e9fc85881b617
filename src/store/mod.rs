// src/store/mod.rs

use anyhow::{Context, Result};
use parquet::arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter};
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    dataset::Request,
    process::CountTable,
    schema::{count_columns, extend_from_record_batch, to_record_batch},
};

const FILE_NAME: &str = "data.parquet";

/// Materialised tract-level tables, one parquet file per request.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, request: &Request) -> PathBuf {
        request.storage_dir(&self.root).join(FILE_NAME)
    }

    pub fn exists(&self, request: &Request) -> bool {
        self.path(request).is_file()
    }

    /// Overwrite the materialised table for `request`. Writes to a temp file
    /// and renames, so readers never see a partial file.
    pub fn save(&self, request: &Request, table: &CountTable) -> Result<PathBuf> {
        let path = self.path(request);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let batch = to_record_batch(table)?;
        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(ZstdLevel::default()))
            .build();

        let tmp = path.with_extension("tmp");
        let file = File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
            .context("creating parquet writer")?;
        writer.write(&batch).context("writing table batch")?;
        writer.close().context("closing parquet writer")?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;

        info!(path = %path.display(), rows = table.len(), "materialised");
        Ok(path)
    }

    pub fn load(&self, request: &Request) -> Result<CountTable> {
        let path = self.path(request);
        let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .with_context(|| format!("reading parquet metadata {}", path.display()))?;
        // a table with no rows is written without batches; the schema still
        // carries its columns
        let mut table = CountTable::new(count_columns(builder.schema()));
        let reader = builder.build()?;

        for batch in reader {
            let batch = batch.with_context(|| format!("reading batch from {}", path.display()))?;
            extend_from_record_batch(&mut table, &batch)?;
        }
        debug!(path = %path.display(), rows = table.len(), "loaded materialised table");
        Ok(table)
    }

    /// Return the stored table, or build and store it when `fresh` is set or
    /// nothing is stored yet.
    pub fn get_or_build<F>(&self, request: &Request, fresh: bool, build: F) -> Result<CountTable>
    where
        F: FnOnce() -> Result<CountTable>,
    {
        if !fresh && self.exists(request) {
            return self.load(request);
        }
        let table = build()?;
        self.save(request, &table)?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        params::{Characteristics, JobType, OdKind},
        process::GeoRow,
    };
    use std::cell::Cell;
    use tempfile::tempdir;

    fn table(jobs: i64) -> CountTable {
        let mut t = CountTable::new(vec!["total_jobs".into(), "manufacturing".into()]);
        t.push(GeoRow {
            geo_id: "42101000100".into(),
            geo_name: Some("Tract 1".into()),
            geometry: None,
            counts: vec![jobs, 2],
        })
        .unwrap();
        t
    }

    #[test]
    fn save_then_load_preserves_table() -> Result<()> {
        let dir = tempdir()?;
        let store = DatasetStore::new(dir.path());
        let req = Request::longform(Characteristics::Residence, 2015, JobType::Primary)?;

        let path = store.save(&req, &table(5))?;
        assert_eq!(
            path,
            dir.path().join("home_longform/2015/primary/data.parquet")
        );
        assert_eq!(store.load(&req)?, table(5));
        Ok(())
    }

    #[test]
    fn get_or_build_only_rebuilds_when_fresh_or_missing() -> Result<()> {
        let dir = tempdir()?;
        let store = DatasetStore::new(dir.path());
        let req = Request::longform(Characteristics::Work, 2017, JobType::All)?;
        let builds = Cell::new(0);
        let build = |jobs| {
            builds.set(builds.get() + 1);
            Ok(table(jobs))
        };

        assert_eq!(store.get_or_build(&req, false, || build(1))?, table(1));
        assert_eq!(store.get_or_build(&req, false, || build(2))?, table(1));
        assert_eq!(builds.get(), 1);

        // refresh overwrites the stored copy
        assert_eq!(store.get_or_build(&req, true, || build(3))?, table(3));
        assert_eq!(store.load(&req)?, table(3));
        assert_eq!(builds.get(), 2);
        Ok(())
    }

    #[test]
    fn empty_table_keeps_its_columns() -> Result<()> {
        let dir = tempdir()?;
        let store = DatasetStore::new(dir.path());
        let req = Request::summary(OdKind::Work, 2017, JobType::All)?;
        let empty = CountTable::new(vec![
            "resident_total".into(),
            "nonresident_total".into(),
            "total".into(),
        ]);

        store.save(&req, &empty)?;
        let back = store.load(&req)?;
        assert!(back.is_empty());
        assert_eq!(back, empty);

        // served from the store, same shape as a fresh build
        assert_eq!(
            store.get_or_build(&req, false, || anyhow::bail!("should not rebuild"))?,
            empty
        );
        Ok(())
    }

    #[test]
    fn failed_build_stores_nothing() -> Result<()> {
        let dir = tempdir()?;
        let store = DatasetStore::new(dir.path());
        let req = Request::longform(Characteristics::Work, 2017, JobType::All)?;
        assert!(store
            .get_or_build(&req, false, || anyhow::bail!("no network"))
            .is_err());
        assert!(!store.exists(&req));
        Ok(())
    }
}
