// src/fetch/names.rs
//
// Source file ids, relative to the state's LODES directory.

use crate::params::{Characteristics, JobType, OdKind};

/// `wac/pa_wac_S000_JT00_2017.csv.gz`
pub fn characteristics_file(
    state: &str,
    key: Characteristics,
    job_type: JobType,
    year: u16,
) -> String {
    let key = key.key();
    format!(
        "{key}/{state}_{key}_S000_{}_{year}.csv.gz",
        job_type.code()
    )
}

/// `od/pa_od_main_JT00_2017.csv.gz`
pub fn od_main_file(state: &str, job_type: JobType, year: u16) -> String {
    format!("od/{state}_od_main_{}_{year}.csv.gz", job_type.code())
}

/// `od/pa_od_aux_JT00_2017.csv.gz`
pub fn od_aux_file(state: &str, job_type: JobType, year: u16) -> String {
    format!("od/{state}_od_aux_{}_{year}.csv.gz", job_type.code())
}

/// `pa_xwalk.csv.gz`
pub fn xwalk_file(state: &str) -> String {
    format!("{state}_xwalk.csv.gz")
}

/// OD files a summary of `kind` reads, main first.
pub fn od_files(state: &str, kind: OdKind, job_type: JobType, year: u16) -> Vec<String> {
    let mut files = vec![od_main_file(state, job_type, year)];
    if kind == OdKind::Work {
        files.push(od_aux_file(state, job_type, year));
    }
    files
}

/// Every file the pipelines may read for one year and job type, the state
/// crosswalk included.
pub fn all_files(state: &str, job_type: JobType, year: u16) -> Vec<String> {
    let mut files: Vec<String> = Characteristics::ALL
        .iter()
        .map(|k| characteristics_file(state, *k, job_type, year))
        .collect();
    files.extend(od_files(state, OdKind::Work, job_type, year));
    files.push(xwalk_file(state));
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_ids_follow_lodes_layout() {
        assert_eq!(
            characteristics_file("pa", Characteristics::Work, JobType::All, 2017),
            "wac/pa_wac_S000_JT00_2017.csv.gz"
        );
        assert_eq!(
            characteristics_file("pa", Characteristics::Residence, JobType::PrivatePrimary, 2004),
            "rac/pa_rac_S000_JT03_2004.csv.gz"
        );
        assert_eq!(
            od_main_file("pa", JobType::Primary, 2010),
            "od/pa_od_main_JT01_2010.csv.gz"
        );
        assert_eq!(
            od_aux_file("pa", JobType::Private, 2010),
            "od/pa_od_aux_JT02_2010.csv.gz"
        );
        assert_eq!(xwalk_file("pa"), "pa_xwalk.csv.gz");
    }

    #[test]
    fn home_summary_skips_aux() {
        assert_eq!(od_files("pa", OdKind::Home, JobType::All, 2015).len(), 1);
        assert_eq!(od_files("pa", OdKind::Work, JobType::All, 2015).len(), 2);
    }

    #[test]
    fn all_files_covers_every_pipeline_input() {
        let files = all_files("pa", JobType::All, 2015);
        assert_eq!(files.len(), 5);
        for needed in [
            characteristics_file("pa", Characteristics::Work, JobType::All, 2015),
            characteristics_file("pa", Characteristics::Residence, JobType::All, 2015),
            od_main_file("pa", JobType::All, 2015),
            od_aux_file("pa", JobType::All, 2015),
            xwalk_file("pa"),
        ] {
            assert!(files.contains(&needed), "missing {needed}");
        }
    }
}
