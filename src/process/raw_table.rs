// src/process/raw_table.rs

use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::io::{Cursor, Read};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// One LODES CSV held in memory: the header row plus every data row as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Parse CSV bytes, transparently gunzipping when the gzip magic is present.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self> {
        if bytes.starts_with(&GZIP_MAGIC) {
            let mut text = Vec::with_capacity(bytes.len() * 4);
            GzDecoder::new(bytes)
                .read_to_end(&mut text)
                .with_context(|| format!("gunzipping {}", name))?;
            Self::from_csv(name, Cursor::new(text))
        } else {
            Self::from_csv(name, Cursor::new(bytes))
        }
    }

    pub fn from_csv<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .with_context(|| format!("reading header row of {}", name))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record =
                result.with_context(|| format!("CSV parse error in {} at record {}", name, idx))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| anyhow!("missing column `{}` (have: {})", name, self.headers.join(",")))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
