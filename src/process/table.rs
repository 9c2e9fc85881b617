// src/process/table.rs

use anyhow::{bail, Result};
use serde::Serialize;

/// One output row: a geography plus its counts, aligned with
/// [`CountTable::columns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoRow {
    pub geo_id: String,
    pub geo_name: Option<String>,
    /// Opaque geometry text carried through from the tract reference.
    pub geometry: Option<String>,
    pub counts: Vec<i64>,
}

/// Table of named count columns keyed by geography. Row position is the
/// (dense, zero-based) row index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountTable {
    pub columns: Vec<String>,
    pub rows: Vec<GeoRow>,
}

impl CountTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn push(&mut self, row: GeoRow) -> Result<()> {
        if row.counts.len() != self.columns.len() {
            bail!(
                "row {} has {} counts, table has {} columns",
                row.geo_id,
                row.counts.len(),
                self.columns.len()
            );
        }
        self.rows.push(row);
        Ok(())
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<i64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r.counts[idx]).collect())
    }

    pub fn column_sum(&self, name: &str) -> Option<i64> {
        self.column(name).map(|v| v.iter().sum())
    }

    pub fn row(&self, geo_id: &str) -> Option<&GeoRow> {
        self.rows.iter().find(|r| r.geo_id == geo_id)
    }

    /// Value at (`geo_id`, `column`).
    pub fn get(&self, geo_id: &str, column: &str) -> Option<i64> {
        let idx = self.column_index(column)?;
        self.row(geo_id).map(|r| r.counts[idx])
    }

    /// Append a column computed from each row.
    pub fn add_column<F>(&mut self, name: impl Into<String>, mut f: F)
    where
        F: FnMut(&GeoRow) -> i64,
    {
        for row in &mut self.rows {
            let v = f(row);
            row.counts.push(v);
        }
        self.columns.push(name.into());
    }

    /// Remove every column that is zero in every row, returning the dropped
    /// names. With no rows, every column is vacuously zero and is dropped.
    pub fn drop_zero_columns(&mut self) -> Vec<String> {
        let keep: Vec<bool> = (0..self.columns.len())
            .map(|i| self.rows.iter().any(|r| r.counts[i] != 0))
            .collect();
        if keep.iter().all(|k| *k) {
            return Vec::new();
        }

        let dropped = self
            .columns
            .iter()
            .zip(&keep)
            .filter(|(_, k)| !**k)
            .map(|(c, _)| c.clone())
            .collect();
        self.columns = retain_by_mask(std::mem::take(&mut self.columns), &keep);
        for row in &mut self.rows {
            row.counts = retain_by_mask(std::mem::take(&mut row.counts), &keep);
        }
        dropped
    }

    /// Sort ascending by `geo_id`.
    pub fn sort_by_geo_id(&mut self) {
        self.rows.sort_by(|a, b| a.geo_id.cmp(&b.geo_id));
    }

    pub fn is_sorted_by_geo_id(&self) -> bool {
        self.rows.windows(2).all(|w| w[0].geo_id <= w[1].geo_id)
    }
}

fn retain_by_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter(|(_, k)| **k)
        .map(|(v, _)| v)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, counts: Vec<i64>) -> GeoRow {
        GeoRow {
            geo_id: id.into(),
            geo_name: None,
            geometry: None,
            counts,
        }
    }

    fn sample() -> CountTable {
        let mut t = CountTable::new(vec!["a".into(), "b".into(), "c".into()]);
        t.push(row("2", vec![1, 0, 3])).unwrap();
        t.push(row("1", vec![0, 0, 4])).unwrap();
        t
    }

    #[test]
    fn push_rejects_misaligned_rows() {
        let mut t = CountTable::new(vec!["a".into()]);
        assert!(t.push(row("1", vec![1, 2])).is_err());
    }

    #[test]
    fn zero_columns_are_dropped_and_pruning_is_idempotent() {
        let mut t = sample();
        let dropped = t.drop_zero_columns();
        assert_eq!(dropped, vec!["b".to_string()]);
        assert_eq!(t.columns, vec!["a", "c"]);
        assert_eq!(t.rows[0].counts, vec![1, 3]);

        let snapshot = t.clone();
        assert!(t.drop_zero_columns().is_empty());
        assert_eq!(t, snapshot);
    }

    #[test]
    fn sort_and_lookup() {
        let mut t = sample();
        assert!(!t.is_sorted_by_geo_id());
        t.sort_by_geo_id();
        assert!(t.is_sorted_by_geo_id());
        assert_eq!(t.rows[0].geo_id, "1");
        assert_eq!(t.get("2", "c"), Some(3));
        assert_eq!(t.column_sum("c"), Some(7));
        assert_eq!(t.column("missing"), None);
    }

    #[test]
    fn computed_column_is_appended() {
        let mut t = sample();
        t.add_column("a_plus_c", |r| r.counts[0] + r.counts[2]);
        assert_eq!(t.columns.last().map(String::as_str), Some("a_plus_c"));
        assert_eq!(t.column("a_plus_c"), Some(vec![4, 4]));
    }
}
