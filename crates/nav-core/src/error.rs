//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `NavError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::GeoPoint;

/// The base error type for `nav-core` and a common variant for sub-crates.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid coordinate {0}")]
    InvalidCoordinate(GeoPoint),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `nav-*` crates.
pub type NavResult<T> = Result<T, NavError>;
