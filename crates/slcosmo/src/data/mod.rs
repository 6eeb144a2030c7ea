//! Lens data files.
//!
//! This module is the parsing collaborator for the core: it turns TDC2
//! time-delay sample files into validated [`LensEnsemble`] values and writes
//! them back out. The core itself never opens files.
//!
//! # File format
//!
//! A header of `#` lines carrying the Fermat potential measurements, followed
//! by one whitespace-separated row of time delays (days) per posterior sample:
//!
//! ```text
//! # Nim: 2
//! # Q: 401234.5
//! # DeltaFP_AB: 885.602408386
//! # DeltaFP_AB_err: 34.0959154248
//! # dt_AB
//! 20.31
//! 19.87
//! ```
//!
//! Header lines without a `key: value` shape are treated as comments.

mod tdc2;

pub use tdc2::{parse_tdc2, read_tdc2_file, read_tdc2_files, write_tdc2, write_tdc2_file};

use std::path::PathBuf;

use slcosmo_core::{InferenceError, LensEnsemble};
use thiserror::Error;

/// Errors that can occur while reading or writing lens data.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed line.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// Line number (1-indexed).
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A required header field was absent.
    #[error("missing header field '{0}'")]
    MissingField(String),

    /// A value that should be numeric was not.
    #[error("invalid numeric value at line {line}: '{value}'")]
    InvalidValue {
        /// Line number (1-indexed).
        line: usize,
        /// The offending text.
        value: String,
    },

    /// The parsed data failed lens validation.
    #[error("invalid lens data: {0}")]
    Invalid(#[from] InferenceError),
}

/// A lens ensemble together with where it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Tdc2Ensemble {
    /// The validated lens data.
    pub lens: LensEnsemble,
    /// File the ensemble was read from, if any.
    pub source: Option<PathBuf>,
}

impl Tdc2Ensemble {
    /// Hand the lens over to the core, dropping the source path.
    pub fn into_lens(self) -> LensEnsemble {
        self.lens
    }
}
