/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 02/03/2026
Last Modified: 28/08/2026
License: MIT
*/

//! Error types for the boundary tools.

use thiserror::Error;

/// Main error type for boundary tool operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A run was started against a store or selection that cannot be processed.
    #[error("{0}")]
    Precondition(String),

    /// Input data that parses but does not describe valid features.
    #[error("Invalid GeoJSON: {0}")]
    Format(String),

    #[error("Coordinate transform failed: {0}")]
    Transform(String),

    #[error("Snap operation failed: {0}")]
    Snap(String),

    #[error("Edit command error: {0}")]
    Edit(String),

    #[error("Cannot close an empty ring")]
    EmptyRing,

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn invalid_parameter(name: &'static str, value: f64, reason: &str) -> Error {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        use std::io::ErrorKind;
        match e {
            Error::Io(err) => err,
            Error::InvalidParameter { .. } => std::io::Error::new(ErrorKind::InvalidInput, e.to_string()),
            Error::Json(_) | Error::Format(_) => std::io::Error::new(ErrorKind::InvalidData, e.to_string()),
            other => std::io::Error::new(ErrorKind::Other, other.to_string()),
        }
    }
}

/// Result type alias for boundary tool operations
pub type Result<T> = std::result::Result<T, Error>;
