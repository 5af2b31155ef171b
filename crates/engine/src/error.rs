//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`MissingArguments`] thrown when a command carries fewer tokens than needed.
//! - [`InvalidAmount`] thrown when the amount token is not a positive integer.
//! - [`UnknownBank`] thrown when an alias is not in the bank registry.
//!
//!  [`MissingArguments`]: EngineError::MissingArguments
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`UnknownBank`]: EngineError::UnknownBank
use std::{io, path::PathBuf};

use thiserror::Error;

use crate::BillKind;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Missing arguments for {0} command")]
    MissingArguments(BillKind),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid head count: {0}")]
    InvalidHeadCount(String),
    #[error("\"{0}\" bank not found!")]
    UnknownBank(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to read bank registry {path}: {source}")]
    Registry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingArguments(a), Self::MissingArguments(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidHeadCount(a), Self::InvalidHeadCount(b)) => a == b,
            (Self::UnknownBank(a), Self::UnknownBank(b)) => a == b,
            (Self::InvalidConfig(a), Self::InvalidConfig(b)) => a == b,
            (Self::Registry { path: a, source: x }, Self::Registry { path: b, source: y }) => {
                a == b && x.kind() == y.kind()
            }
            _ => false,
        }
    }
}
