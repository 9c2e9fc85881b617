// src/process/summary.rs
//
// Origin-destination summary: jobs per tract, split by whether the worker
// lives inside the region.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

use super::{
    group::group_sum,
    utils::{normalize_geocode, tract_of, BLOCK_WIDTH, TRACT_WIDTH},
    CountTable, GeoRow, RawTable,
};
use crate::{
    fetch::{
        names::{od_files, xwalk_file},
        SourceFiles,
    },
    geo::TractReference,
    params::{validate_year, JobType, OdKind},
    schema::fields::{OD_COUNT_PREFIX, OD_FIELDS},
};

const HOME_GEOCODE: &str = "h_geocode";
const XWALK_BLOCK: &str = "tabblk2010";
const XWALK_TRACT: &str = "trct";

/// Whether a job's worker lives in a reference tract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Residency {
    Resident,
    Nonresident,
}

impl Residency {
    pub fn tag(&self) -> &'static str {
        match self {
            Residency::Resident => "resident",
            Residency::Nonresident => "nonresident",
        }
    }

    /// Classes present in a summary of `kind`. Home-anchored data is all resident.
    pub fn for_kind(kind: OdKind) -> &'static [Residency] {
        match kind {
            OdKind::Work => &[Residency::Resident, Residency::Nonresident],
            OdKind::Home => &[Residency::Resident],
        }
    }
}

/// Name of the combined column for an OD catalog name.
fn total_column(name: &str) -> String {
    if name == "total" {
        name.to_string()
    } else {
        format!("total_{}", name)
    }
}

/// Build the tract-level OD summary anchored on `kind`.
///
/// A tract appears only when it is in the reference and has data for every
/// residency class of `kind`. For `OdKind::Work` the table also carries
/// `total` and `total_<group>` columns, each `resident + nonresident`.
#[tracing::instrument(level = "info", skip(sources, tracts))]
pub fn download(
    sources: &dyn SourceFiles,
    tracts: &dyn TractReference,
    state: &str,
    year: u16,
    kind: OdKind,
    job_type: JobType,
) -> Result<CountTable> {
    let year = validate_year(year)?;

    let xwalk_id = xwalk_file(state);
    let xwalk = load_block_crosswalk(sources, &xwalk_id)?;
    debug!(blocks = xwalk.len(), "loaded block crosswalk");

    let mut parts = Vec::new();
    for id in od_files(state, kind, job_type, year) {
        let raw = sources
            .fetch(&id)
            .with_context(|| format!("fetching {}", id))?;
        debug!(file = %id, rows = raw.len(), "fetched");
        parts.push((id, raw));
    }

    let reference = tracts.tracts(year)?;
    let in_region: HashSet<&str> = reference.iter().map(|t| t.geo_id.as_str()).collect();

    // Union of count columns across the concatenated files, first-seen order.
    let mut count_columns: Vec<String> = Vec::new();
    for (_, raw) in &parts {
        for h in &raw.headers {
            if h.starts_with(OD_COUNT_PREFIX) && !count_columns.contains(h) {
                count_columns.push(h.clone());
            }
        }
    }

    // Sum by (anchor block, residency).
    let mut by_block: BTreeMap<(String, Residency), Vec<i64>> = BTreeMap::new();
    for (id, raw) in &parts {
        let anchor = raw.require_column(kind.anchor_column())?;
        let home = raw.require_column(HOME_GEOCODE)?;
        let (cols, slots): (Vec<usize>, Vec<usize>) = count_columns
            .iter()
            .enumerate()
            .filter_map(|(slot, name)| raw.column_index(name).map(|col| (col, slot)))
            .unzip();

        let mut part_sums: BTreeMap<(String, Residency), Vec<i64>> = BTreeMap::new();
        group_sum(raw, &cols, &mut part_sums, |row| {
            let residency = if in_region.contains(tract_of(&row[home]).as_str()) {
                Residency::Resident
            } else {
                Residency::Nonresident
            };
            Some((normalize_geocode(&row[anchor], BLOCK_WIDTH), residency))
        })
        .with_context(|| format!("summing {}", id))?;

        for (key, counts) in part_sums {
            let acc = by_block
                .entry(key)
                .or_insert_with(|| vec![0; count_columns.len()]);
            for (v, &slot) in counts.iter().zip(&slots) {
                acc[slot] += v;
            }
        }
    }
    debug!(groups = by_block.len(), "summed by anchor block");

    // Blocks → tracts; blocks missing from the crosswalk drop out.
    let mut by_tract: HashMap<(String, Residency), Vec<i64>> = HashMap::new();
    let mut unmapped = 0usize;
    for ((block, residency), counts) in by_block {
        let Some(tract) = xwalk.get(&block) else {
            unmapped += 1;
            continue;
        };
        let acc = by_tract
            .entry((tract.clone(), residency))
            .or_insert_with(|| vec![0; count_columns.len()]);
        for (a, v) in acc.iter_mut().zip(&counts) {
            *a += v;
        }
    }
    debug!(groups = by_tract.len(), unmapped, "summed by tract");

    let classes = Residency::for_kind(kind);
    let fields: Vec<(usize, &str)> = OD_FIELDS
        .iter()
        .filter_map(|(code, name)| {
            count_columns
                .iter()
                .position(|c| c == code)
                .map(|slot| (slot, *name))
        })
        .collect();

    let columns: Vec<String> = classes
        .iter()
        .flat_map(|class| {
            fields
                .iter()
                .map(move |(_, name)| format!("{}_{}", class.tag(), name))
        })
        .collect();

    let mut out = CountTable::new(columns);
    let mut seen = HashSet::new();
    for tract in reference.iter() {
        if !seen.insert(tract.geo_id.as_str()) {
            continue;
        }
        let per_class: Option<Vec<&Vec<i64>>> = classes
            .iter()
            .map(|class| by_tract.get(&(tract.geo_id.clone(), *class)))
            .collect();
        let Some(per_class) = per_class else {
            continue;
        };

        let counts: Vec<i64> = per_class
            .iter()
            .flat_map(|sums| fields.iter().map(move |(slot, _)| sums[*slot]))
            .collect();

        out.push(GeoRow {
            geo_id: tract.geo_id.clone(),
            geo_name: tract.geo_name.clone(),
            geometry: tract.geometry.clone(),
            counts,
        })?;
    }

    // total_<g> = resident_<g> + nonresident_<g>; class blocks are laid out
    // in `classes` order, one column per field.
    if kind == OdKind::Work {
        let width = fields.len();
        for (i, (_, name)) in fields.iter().enumerate() {
            out.add_column(total_column(name), |row| {
                (0..classes.len()).map(|c| row.counts[c * width + i]).sum()
            });
        }
    }

    out.sort_by_geo_id();
    info!(rows = out.len(), columns = out.columns.len(), "summary table built");
    Ok(out)
}

/// Block id → tract id from the state crosswalk.
fn load_block_crosswalk(sources: &dyn SourceFiles, id: &str) -> Result<HashMap<String, String>> {
    let raw: RawTable = sources
        .fetch(id)
        .with_context(|| format!("fetching {}", id))?;
    let block = raw.require_column(XWALK_BLOCK)?;
    let tract = raw.require_column(XWALK_TRACT)?;
    Ok(raw
        .rows
        .iter()
        .map(|row| {
            (
                normalize_geocode(&row[block], BLOCK_WIDTH),
                normalize_geocode(&row[tract], TRACT_WIDTH),
            )
        })
        .collect())
}
