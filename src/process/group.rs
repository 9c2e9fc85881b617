use anyhow::{Context, Result};
use std::collections::BTreeMap;

use super::{utils::parse_count, RawTable};

/// Add the `cols` counts of every row into `sums`, keyed by `key(row)`.
/// Rows whose key is `None` are skipped.
pub fn group_sum<K, F>(
    raw: &RawTable,
    cols: &[usize],
    sums: &mut BTreeMap<K, Vec<i64>>,
    mut key: F,
) -> Result<()>
where
    K: Ord,
    F: FnMut(&[String]) -> Option<K>,
{
    for (row_idx, row) in raw.rows.iter().enumerate() {
        let Some(k) = key(row.as_slice()) else {
            continue;
        };
        let acc = sums.entry(k).or_insert_with(|| vec![0; cols.len()]);
        for (slot, &col) in acc.iter_mut().zip(cols) {
            let cell = row.get(col).map(String::as_str).unwrap_or("");
            *slot += parse_count(cell).with_context(|| {
                format!("row {} column `{}`", row_idx, raw.headers[col])
            })?;
        }
    }
    Ok(())
}
