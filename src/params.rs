// src/params.rs
//
// Request parameters. Every string-facing parser fails with a `ValidationError`
// that enumerates the allowed set.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Years published in this LODES generation.
pub const YEARS: RangeInclusive<u16> = 2002..=2017;

/// Reject years outside [`YEARS`].
pub fn validate_year(year: u16) -> Result<u16, ValidationError> {
    if YEARS.contains(&year) {
        Ok(year)
    } else {
        Err(ValidationError::Year {
            year,
            first: *YEARS.start(),
            last: *YEARS.end(),
        })
    }
}

fn allowed<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Job category filter, encoded as `JTxx` in source file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    All,
    Primary,
    Private,
    PrivatePrimary,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::All,
        JobType::Primary,
        JobType::Private,
        JobType::PrivatePrimary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::All => "all",
            JobType::Primary => "primary",
            JobType::Private => "private",
            JobType::PrivatePrimary => "private_primary",
        }
    }

    /// Code used inside LODES file names.
    pub fn code(&self) -> &'static str {
        match self {
            JobType::All => "JT00",
            JobType::Primary => "JT01",
            JobType::Private => "JT02",
            JobType::PrivatePrimary => "JT03",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|jt| jt.as_str() == s)
            .ok_or_else(|| ValidationError::JobType {
                value: s.to_string(),
                allowed: allowed(&JobType::ALL),
            })
    }
}

/// Which characteristics file a longform table is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristics {
    /// Workplace area characteristics (`wac`).
    Work,
    /// Residence area characteristics (`rac`).
    Residence,
}

impl Characteristics {
    pub const ALL: [Characteristics; 2] = [Characteristics::Work, Characteristics::Residence];

    pub fn key(&self) -> &'static str {
        match self {
            Characteristics::Work => "wac",
            Characteristics::Residence => "rac",
        }
    }

    /// Name of the geocode column in the raw file.
    pub fn geocode_column(&self) -> &'static str {
        match self {
            Characteristics::Work => "w_geocode",
            Characteristics::Residence => "h_geocode",
        }
    }
}

impl fmt::Display for Characteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Characteristics {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Characteristics::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| ValidationError::Key {
                value: s.to_string(),
                allowed: allowed(&Characteristics::ALL),
            })
    }
}

/// Which end of an origin-destination pair anchors the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OdKind {
    Work,
    Home,
}

impl OdKind {
    pub const ALL: [OdKind; 2] = [OdKind::Work, OdKind::Home];

    pub fn as_str(&self) -> &'static str {
        match self {
            OdKind::Work => "work",
            OdKind::Home => "home",
        }
    }

    /// Geocode column whose block defines the output tract.
    pub fn anchor_column(&self) -> &'static str {
        match self {
            OdKind::Work => "w_geocode",
            OdKind::Home => "h_geocode",
        }
    }
}

impl fmt::Display for OdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OdKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OdKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::Kind {
                value: s.to_string(),
                allowed: allowed(&OdKind::ALL),
            })
    }
}

/// Output geography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    #[default]
    Tract,
    Nta,
    Puma,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Tract, Level::Nta, Level::Puma];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Tract => "tract",
            Level::Nta => "nta",
            Level::Puma => "puma",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ValidationError::Level {
                value: s.to_string(),
                allowed: allowed(&Level::ALL),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn job_type_codes_are_total_and_injective() {
        let codes: Vec<&str> = JobType::ALL.iter().map(|jt| jt.code()).collect();
        assert_eq!(codes, vec!["JT00", "JT01", "JT02", "JT03"]);
        let unique: HashSet<&str> = codes.iter().copied().collect();
        assert_eq!(unique.len(), JobType::ALL.len());

        for jt in JobType::ALL {
            assert_eq!(jt.as_str().parse::<JobType>().unwrap(), jt);
        }
    }

    #[test]
    fn unknown_job_type_lists_allowed_values() {
        let err = "seasonal".parse::<JobType>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("seasonal"));
        assert!(msg.contains("all, primary, private, private_primary"));
    }

    #[test]
    fn year_range_bounds() {
        assert_eq!(validate_year(2002), Ok(2002));
        assert_eq!(validate_year(2017), Ok(2017));
        assert!(validate_year(2001).is_err());
        let err = validate_year(2018).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Year {
                year: 2018,
                first: 2002,
                last: 2017
            }
        );
        assert!(err.to_string().contains("2002..=2017"));
    }

    #[test]
    fn keys_kinds_and_levels_parse() {
        assert_eq!("wac".parse::<Characteristics>(), Ok(Characteristics::Work));
        assert_eq!("rac".parse::<Characteristics>(), Ok(Characteristics::Residence));
        assert!(matches!(
            "od".parse::<Characteristics>(),
            Err(ValidationError::Key { .. })
        ));

        assert_eq!("work".parse::<OdKind>(), Ok(OdKind::Work));
        assert_eq!(OdKind::Home.anchor_column(), "h_geocode");
        assert!(matches!(
            "commute".parse::<OdKind>(),
            Err(ValidationError::Kind { .. })
        ));

        assert_eq!("puma".parse::<Level>(), Ok(Level::Puma));
        let err = "county".parse::<Level>().unwrap_err();
        assert!(err.to_string().contains("tract, nta, puma"));
    }
}
