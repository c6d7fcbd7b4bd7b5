//! Typed errors surfaced by [`Pipeline::run`](crate::Pipeline::run).
//!
//! Callers either receive a complete [`CountResult`](crate::CountResult) or one of
//! these errors. No stage swallows a failure, and no partial result is returned.

use std::fmt;
use thiserror::Error;

/// The pipeline stage an error or cancellation was observed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Tokenize,
    Map,
    Shuffle,
    Reduce,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Tokenize => "tokenize",
            Stage::Map => "map",
            Stage::Shuffle => "shuffle",
            Stage::Reduce => "reduce",
        };
        f.write_str(name)
    }
}

/// Errors produced by the counting pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The input text was missing, empty, or yielded no tokens.
    #[error("input error: {reason}")]
    Input { reason: String },

    /// A single map or reduce work unit failed; the whole run was aborted.
    #[error("{stage} work unit failed for key `{key}`: {message}")]
    Pipeline {
        stage: Stage,
        key: String,
        message: String,
    },

    /// The run was cancelled (explicitly or by timeout) before it completed.
    #[error("run cancelled during {stage} stage")]
    Cancelled { stage: Stage },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid token pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn input<S: Into<String>>(reason: S) -> Self {
        Error::Input {
            reason: reason.into(),
        }
    }

    /// True for [`Error::Input`].
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self, Error::Input { .. })
    }

    /// The offending token/key of a failed work unit, if any.
    #[must_use]
    pub fn failed_key(&self) -> Option<&str> {
        match self {
            Error::Pipeline { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
