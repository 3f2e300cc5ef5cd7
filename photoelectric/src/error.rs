//! Error taxonomy for the simulation core

use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, PhotoError>;

#[derive(Debug, Error)]
pub enum PhotoError {
    /// Material key not present in the fixed catalog
    #[error("unknown target material '{0}' (expected one of sodium, zinc, calcium, copper, platinum)")]
    InvalidMaterial(String),

    /// Parameter outside its declared domain
    #[error("{parameter} = {value} is outside [{min}, {max}]")]
    DomainViolation {
        parameter: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
