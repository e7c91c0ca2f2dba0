// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::platform::PlatformError;

/// Errors raised while resolving run results.
#[derive(Error, Debug)]
pub enum ResultError {
    /// Unnamed access needs exactly one terminal node.
    #[error(
        "pipeline has {} terminal nodes ({}); use named access to pick one",
        terminals.len(),
        terminals.join(", ")
    )]
    AmbiguousTerminal { terminals: Vec<String> },

    /// `file()` needs a collection with exactly one document.
    #[error("collection '{collection}' holds {count} documents, expected exactly one file document")]
    AmbiguousFileResult { collection: String, count: usize },

    /// The single document carries no `path` field to download from.
    #[error("document in collection '{collection}' has no 'path' field")]
    MissingPathField { collection: String },

    /// The node name is not part of the pipeline's results mapping.
    #[error("node '{node}' has no declared result collection")]
    UnknownNode { node: String },

    /// The operation is not available on this backend.
    #[error("{operation} is not supported on the {backend} backend")]
    Unsupported {
        operation: &'static str,
        backend: &'static str,
    },

    /// A fetched document was not valid JSON.
    #[error("failed to decode document in collection '{collection}': {source}")]
    Decode {
        collection: String,
        source: serde_json::Error,
    },

    /// Collaborator failure while fetching documents or object bytes.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Filesystem failure while reading local results.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
