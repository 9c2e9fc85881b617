use anyhow::{anyhow, Result};
use std::{
    collections::HashMap,
    sync::Mutex,
};

use super::SourceFiles;
use crate::process::RawTable;

/// In-memory source files keyed by id. Records every requested id, which is
/// how callers check that validation happened before any I/O.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
    requested: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file as raw (plain or gzipped) CSV bytes.
    pub fn with_file(mut self, id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(id.into(), bytes.into());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl SourceFiles for MemorySource {
    fn fetch(&self, id: &str) -> Result<RawTable> {
        if let Ok(mut r) = self.requested.lock() {
            r.push(id.to_string());
        }
        let bytes = self
            .files
            .get(id)
            .ok_or_else(|| anyhow!("no such source file: {}", id))?;
        RawTable::from_bytes(id, bytes)
    }
}
