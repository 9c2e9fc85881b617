use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use tracing::debug;

use super::SourceFiles;
use crate::process::RawTable;

/// Source files mirrored under a local directory, same layout as the remote.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_of(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }
}

impl SourceFiles for LocalSource {
    #[tracing::instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    fn fetch(&self, id: &str) -> Result<RawTable> {
        let path = self.path_of(id);
        let bytes =
            fs::read(&path).with_context(|| format!("reading source file {}", path.display()))?;
        let table = RawTable::from_bytes(id, &bytes)?;
        debug!(rows = table.len(), "loaded");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn reads_nested_gzip_file() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("wac"))?;
        let mut enc = GzEncoder::new(Vec::new(), Compression::fast());
        enc.write_all(b"w_geocode,C000\n421010001001000,4\n")?;
        fs::write(
            dir.path().join("wac/pa_wac_S000_JT00_2017.csv.gz"),
            enc.finish()?,
        )?;

        let src = LocalSource::new(dir.path());
        let t = src.fetch("wac/pa_wac_S000_JT00_2017.csv.gz")?;
        assert_eq!(t.headers, vec!["w_geocode", "C000"]);
        assert_eq!(t.rows, vec![vec!["421010001001000".to_string(), "4".to_string()]]);
        Ok(())
    }

    #[test]
    fn missing_file_names_the_path() {
        let src = LocalSource::new("/nonexistent/lodes");
        let err = src.fetch("pa_xwalk.csv.gz").unwrap_err();
        assert!(format!("{:#}", err).contains("pa_xwalk.csv.gz"));
    }
}
