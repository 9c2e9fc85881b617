// src/process/longform.rs
//
// Workplace / residence area characteristics, summed to census tracts.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

use super::{group::group_sum, utils::tract_of, CountTable, GeoRow};
use crate::{
    fetch::{names::characteristics_file, SourceFiles},
    geo::TractReference,
    params::{validate_year, Characteristics, JobType},
    schema::fields::{resolve, LONGFORM_FIELDS},
};

/// Either geocode column is accepted as the row's location.
const GEOCODE_COLUMNS: [&str; 2] = ["w_geocode", "h_geocode"];

/// Build the tract-level characteristics table for `key`.
///
/// Only tracts present in both the reference and the source file appear.
/// Columns that are zero for every tract are dropped, on the reading that a
/// field of all zeros was not reported that year. A field that really is
/// zero everywhere is indistinguishable and is dropped too.
#[tracing::instrument(level = "info", skip(sources, tracts))]
pub fn download(
    sources: &dyn SourceFiles,
    tracts: &dyn TractReference,
    state: &str,
    key: Characteristics,
    year: u16,
    job_type: JobType,
) -> Result<CountTable> {
    let year = validate_year(year)?;

    let id = characteristics_file(state, key, job_type, year);
    let raw = sources
        .fetch(&id)
        .with_context(|| format!("fetching {}", id))?;
    debug!(file = %id, rows = raw.len(), "fetched");

    let geo_col = raw
        .column_index(key.geocode_column())
        .or_else(|| GEOCODE_COLUMNS.iter().find_map(|c| raw.column_index(c)))
        .with_context(|| format!("{} has no geocode column", id))?;

    let fields = resolve(LONGFORM_FIELDS, &raw.headers);
    let cols: Vec<usize> = fields
        .iter()
        .filter_map(|(code, _)| raw.column_index(code))
        .collect();
    debug!(recognised = fields.len(), of = raw.headers.len(), "resolved columns");

    let mut sums: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    group_sum(&raw, &cols, &mut sums, |row| Some(tract_of(&row[geo_col])))
        .with_context(|| format!("summing {}", id))?;
    debug!(tracts = sums.len(), "summed blocks to tracts");

    let reference = tracts.tracts(year)?;
    let mut out = CountTable::new(fields.iter().map(|(_, name)| name.to_string()).collect());
    let mut seen = HashSet::new();
    for tract in reference {
        if !seen.insert(tract.geo_id.clone()) {
            continue;
        }
        if let Some(counts) = sums.remove(&tract.geo_id) {
            out.push(GeoRow {
                geo_id: tract.geo_id,
                geo_name: tract.geo_name,
                geometry: tract.geometry,
                counts,
            })?;
        }
    }
    if !sums.is_empty() {
        debug!(unmatched = sums.len(), "source tracts outside the reference dropped");
    }

    let dropped = out.drop_zero_columns();
    if !dropped.is_empty() {
        warn!(columns = ?dropped, "dropping all-zero columns");
    }

    out.sort_by_geo_id();
    info!(rows = out.len(), columns = out.columns.len(), "longform table built");
    Ok(out)
}

/// Characteristics by the tract where the job is located.
pub fn download_work(
    sources: &dyn SourceFiles,
    tracts: &dyn TractReference,
    state: &str,
    year: u16,
    job_type: JobType,
) -> Result<CountTable> {
    download(sources, tracts, state, Characteristics::Work, year, job_type)
}

/// Characteristics by the tract where the worker lives.
pub fn download_home(
    sources: &dyn SourceFiles,
    tracts: &dyn TractReference,
    state: &str,
    year: u16,
    job_type: JobType,
) -> Result<CountTable> {
    download(sources, tracts, state, Characteristics::Residence, year, job_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ValidationError,
        fetch::MemorySource,
        geo::{MemoryTracts, Tract},
        test_support::init_test_logging,
    };

    const WAC: &str = "\
w_geocode,C000,CA01,CA02,CA03,CNS05,CR07,CZZ99,createdate
421010001001000,10,2,5,3,4,0,9,20190101
421010001001001,5,1,4,0,1,0,9,20190101
421010002002000,7,7,0,0,0,0,9,20190101
421019999991000,50,10,20,20,5,0,9,20190101
";

    fn tracts() -> MemoryTracts {
        MemoryTracts::new().with_year(
            2017,
            vec![
                Tract::new("42101000200", "Tract 2"),
                Tract::new("42101000100", "Tract 1"),
                Tract::new("42101000300", "Tract 3"),
            ],
        )
    }

    #[test]
    fn work_longform_sums_blocks_into_reference_tracts() -> Result<()> {
        init_test_logging();
        let src = MemorySource::new().with_file("wac/pa_wac_S000_JT00_2017.csv.gz", WAC);
        let out = download_work(&src, &tracts(), "pa", 2017, JobType::All)?;

        assert_eq!(src.requested(), vec!["wac/pa_wac_S000_JT00_2017.csv.gz"]);
        // tract 3 has no data and tract 99999 is outside the reference
        let ids: Vec<&str> = out.rows.iter().map(|r| r.geo_id.as_str()).collect();
        assert_eq!(ids, vec!["42101000100", "42101000200"]);
        assert!(out.rows.iter().all(|r| r.geo_id.len() == 11));

        // catalog order, unknown columns ignored, all-zero CR07 dropped
        assert_eq!(
            out.columns,
            vec![
                "total_jobs",
                "age_29_or_younger",
                "age_30_to_54",
                "age_55_or_older",
                "manufacturing"
            ]
        );
        assert_eq!(out.get("42101000100", "total_jobs"), Some(15));
        assert_eq!(out.get("42101000100", "age_55_or_older"), Some(3));
        assert_eq!(out.get("42101000200", "age_29_or_younger"), Some(7));
        assert_eq!(out.rows[0].geo_name.as_deref(), Some("Tract 1"));
        Ok(())
    }

    #[test]
    fn home_longform_reads_rac_by_home_geocode() -> Result<()> {
        let rac = "h_geocode,C000,CS01,CS02\n421010001001000,4,1,3\n421010003001000,6,6,0\n";
        let src = MemorySource::new().with_file("rac/pa_rac_S000_JT02_2017.csv.gz", rac);
        let out = download_home(&src, &tracts(), "pa", 2017, JobType::Private)?;

        assert_eq!(out.columns, vec!["total_jobs", "total_jobs_male", "total_jobs_female"]);
        assert_eq!(out.len(), 2);
        assert_eq!(out.get("42101000300", "total_jobs_male"), Some(6));
        assert!(out.is_sorted_by_geo_id());
        Ok(())
    }

    #[test]
    fn bad_year_fails_before_any_fetch() {
        let src = MemorySource::new();
        let err = download_work(&src, &tracts(), "pa", 2019, JobType::All).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::Year { year: 2019, .. })
        ));
        assert!(src.requested().is_empty());
    }

    #[test]
    fn missing_geocode_column_is_an_error() {
        let src = MemorySource::new()
            .with_file("wac/pa_wac_S000_JT00_2017.csv.gz", "block,C000\n1,2\n");
        assert!(download_work(&src, &tracts(), "pa", 2017, JobType::All).is_err());
    }
}
