//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! document they persist.

use crate::model::Notice;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// The harvested document: an array of notices, each embedding its lots,
/// each embedding its detail rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub notices: Vec<Notice>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

/// Persists a harvested document
pub trait OutputHandler {
    fn write(&self, document: &Document) -> OutputResult<()>;
}
