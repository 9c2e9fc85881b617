// src/error.rs

use thiserror::Error;

/// Pre-flight parameter failures. Raised before any file is requested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported year {year}; valid years are {first}..={last}")]
    Year { year: u16, first: u16, last: u16 },

    #[error("unsupported job_type {value:?}; allowed values for 'job_type': {allowed}")]
    JobType { value: String, allowed: String },

    #[error("unsupported key {value:?}; allowed values for 'key': {allowed}")]
    Key { value: String, allowed: String },

    #[error("unsupported kind {value:?}; allowed values for 'kind': {allowed}")]
    Kind { value: String, allowed: String },

    #[error("unsupported level {value:?}; allowed values for 'level': {allowed}")]
    Level { value: String, allowed: String },

    #[error("unknown dataset {value:?}; allowed values: {allowed}")]
    Dataset { value: String, allowed: String },
}
