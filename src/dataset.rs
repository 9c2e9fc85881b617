// src/dataset.rs

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    error::ValidationError,
    params::{validate_year, Characteristics, JobType, OdKind},
};

/// The three tables this crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    WorkLongform,
    HomeLongform,
    OdSummary(OdKind),
}

impl Dataset {
    pub const NAMES: [&'static str; 3] = ["work_longform", "home_longform", "od_summary"];

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::WorkLongform => "work_longform",
            Dataset::HomeLongform => "home_longform",
            Dataset::OdSummary(_) => "od_summary",
        }
    }

    pub fn longform(key: Characteristics) -> Self {
        match key {
            Characteristics::Work => Dataset::WorkLongform,
            Characteristics::Residence => Dataset::HomeLongform,
        }
    }

    /// Parse a dataset name. `kind` is required for (and only read by) `od_summary`.
    pub fn parse(name: &str, kind: Option<&str>) -> Result<Self, ValidationError> {
        match name {
            "work_longform" => Ok(Dataset::WorkLongform),
            "home_longform" => Ok(Dataset::HomeLongform),
            "od_summary" => Ok(Dataset::OdSummary(
                kind.unwrap_or(OdKind::Work.as_str()).parse()?,
            )),
            other => Err(ValidationError::Dataset {
                value: other.to_string(),
                allowed: Dataset::NAMES.join(", "),
            }),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::OdSummary(kind) => write!(f, "{}({})", self.name(), kind),
            _ => f.write_str(self.name()),
        }
    }
}

/// A fully validated request for one tract-level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Request {
    pub dataset: Dataset,
    pub year: u16,
    pub job_type: JobType,
}

impl Request {
    pub fn new(dataset: Dataset, year: u16, job_type: JobType) -> Result<Self, ValidationError> {
        Ok(Self {
            dataset,
            year: validate_year(year)?,
            job_type,
        })
    }

    pub fn longform(key: Characteristics, year: u16, job_type: JobType) -> Result<Self, ValidationError> {
        Self::new(Dataset::longform(key), year, job_type)
    }

    pub fn summary(kind: OdKind, year: u16, job_type: JobType) -> Result<Self, ValidationError> {
        Self::new(Dataset::OdSummary(kind), year, job_type)
    }

    /// Validate every string-typed parameter before anything touches I/O.
    pub fn parse(
        dataset: &str,
        year: u16,
        job_type: &str,
        kind: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let dataset = Dataset::parse(dataset, kind)?;
        let job_type = JobType::from_str(job_type)?;
        Self::new(dataset, year, job_type)
    }

    /// Directory this request materialises into, relative to `root`:
    /// `<dataset>/[<kind>/]<year>/<job_type>`.
    pub fn storage_dir(&self, root: &Path) -> PathBuf {
        let mut dir = root.join(self.dataset.name());
        if let Dataset::OdSummary(kind) = self.dataset {
            dir.push(kind.as_str());
        }
        dir.join(self.year.to_string()).join(self.job_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_paths_are_deterministic() {
        let root = Path::new("data");
        let work = Request::longform(Characteristics::Work, 2017, JobType::All).unwrap();
        assert_eq!(
            work.storage_dir(root),
            PathBuf::from("data/work_longform/2017/all")
        );
        let od = Request::summary(OdKind::Home, 2010, JobType::PrivatePrimary).unwrap();
        assert_eq!(
            od.storage_dir(root),
            PathBuf::from("data/od_summary/home/2010/private_primary")
        );
    }

    #[test]
    fn parse_validates_every_parameter() {
        assert!(Request::parse("home_longform", 2012, "primary", None).is_ok());
        assert_eq!(
            Request::parse("od_summary", 2012, "all", Some("home")).unwrap().dataset,
            Dataset::OdSummary(OdKind::Home)
        );
        assert!(matches!(
            Request::parse("work_longform", 2012, "seasonal", None),
            Err(ValidationError::JobType { .. })
        ));
        assert!(matches!(
            Request::parse("od_summary", 2012, "all", Some("school")),
            Err(ValidationError::Kind { .. })
        ));
        assert!(matches!(
            Request::parse("wac", 2012, "all", None),
            Err(ValidationError::Dataset { .. })
        ));
        assert!(matches!(
            Request::parse("work_longform", 2001, "all", None),
            Err(ValidationError::Year { .. })
        ));
    }
}
