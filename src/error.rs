//! Failure modes that can stop spelldrill before a session starts.
//!
//! Mismatched keystrokes and failed definition lookups are not errors: the
//! former are a state transition, the latter collapse to
//! [`DefinitionResult::Unavailable`](crate::definition::DefinitionResult).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpellError {
    #[error("word list {} is unavailable: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid word {0:?}: words must be non-empty and fit on one line")]
    InvalidWord(String),
}

impl SpellError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SpellError::StorageUnavailable {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpellError>;
