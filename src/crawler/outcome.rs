//! Per-node fetch outcomes
//!
//! Every node of the hierarchy ends in an [`Outcome`]: either the records it
//! produced, or an empty/partial result together with the cause. The owning
//! node turns a failed outcome into an empty child sequence and records the
//! cause in the crawl report.

use crate::{BrowserError, ExtractError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a node produced no (or only some) records
#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Listing still had a next page after {limit} pages")]
    PageLimit { limit: u32 },
}

/// Result of fetching the children of one node
#[derive(Debug)]
pub enum Outcome<T> {
    /// Every record was fetched
    Complete(Vec<T>),

    /// The node has nothing to fetch; no resource was acquired
    Skipped,

    /// Fetching stopped early; `items` holds what was gathered before the failure
    Partial { items: Vec<T>, cause: NodeError },

    /// Nothing could be fetched
    Failed(NodeError),
}

impl<T> Outcome<T> {
    /// Builds the outcome of an interrupted fetch from what was gathered so far
    pub fn interrupted(items: Vec<T>, cause: NodeError) -> Self {
        if items.is_empty() {
            Self::Failed(cause)
        } else {
            Self::Partial { items, cause }
        }
    }

    /// Records gathered, whatever the status
    pub fn items(&self) -> &[T] {
        match self {
            Self::Complete(items) | Self::Partial { items, .. } => items,
            Self::Skipped | Self::Failed(_) => &[],
        }
    }

    /// Returns the failure cause, if any
    pub fn cause(&self) -> Option<&NodeError> {
        match self {
            Self::Partial { cause, .. } | Self::Failed(cause) => Some(cause),
            Self::Complete(_) | Self::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Splits into the gathered records and the failure cause
    pub fn into_parts(self) -> (Vec<T>, Option<NodeError>) {
        match self {
            Self::Complete(items) => (items, None),
            Self::Skipped => (Vec::new(), None),
            Self::Partial { items, cause } => (items, Some(cause)),
            Self::Failed(cause) => (Vec::new(), Some(cause)),
        }
    }
}

/// Level of the hierarchy a node belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeLevel {
    NoticeListing,
    LotListing,
    LotDetail,
}

impl fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoticeListing => "notice listing",
            Self::LotListing => "lot listing",
            Self::LotDetail => "lot detail",
        };
        f.write_str(name)
    }
}

/// A node whose children could not be fully fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeFailure {
    pub level: NodeLevel,

    /// Locator of the failed node
    pub locator: String,

    /// Records kept despite the failure
    pub kept: usize,

    pub cause: String,
}

impl NodeFailure {
    pub fn new(level: NodeLevel, locator: &str, kept: usize, cause: &NodeError) -> Self {
        Self {
            level,
            locator: locator.to_string(),
            kept,
            cause: cause.to_string(),
        }
    }
}
