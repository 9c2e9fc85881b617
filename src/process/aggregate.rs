// src/process/aggregate.rs

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{debug, info};

use super::CountTable;
use crate::{
    geo::{aggregate_count_data, Crosswalk, GroupMember},
    params::Level,
};

/// Re-express a tract-level table at `level`.
///
/// Every unit in the crosswalk appears in the output; a unit none of whose
/// tracts has data gets zeros. Geometry is not carried above tract level.
#[tracing::instrument(level = "info", skip(table, crosswalk), fields(rows = table.len()))]
pub fn to_level(
    table: CountTable,
    level: Level,
    crosswalk: &dyn Crosswalk,
    year: u16,
) -> Result<CountTable> {
    let xwalk = match level {
        Level::Tract => return Ok(table),
        Level::Nta => crosswalk.tracts_to_ntas(year),
        Level::Puma => crosswalk.tracts_to_pumas(year),
    }
    .with_context(|| format!("loading tract to {} crosswalk for {}", level, year))?;
    debug!(entries = xwalk.len(), "crosswalk loaded");

    // left join: crosswalk -> tract data
    let by_tract: HashMap<&str, &[i64]> = table
        .rows
        .iter()
        .map(|r| (r.geo_id.as_str(), r.counts.as_slice()))
        .collect();
    let members = xwalk.iter().map(|e| GroupMember {
        group_id: &e.geo_id,
        group_name: &e.geo_name,
        counts: by_tract.get(e.geo_id_tract.as_str()).copied(),
    });

    let mut out = aggregate_count_data(&table.columns, members);
    out.sort_by_geo_id();
    info!(units = out.len(), "aggregated");
    Ok(out)
}
