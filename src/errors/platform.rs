// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Error surface of the platform API and local executor collaborators.
///
/// `NotFound` and `AlreadyExists` are structural: the upsert sequence
/// swallows a `NotFound` on its initial fetch to drive create-then-refetch,
/// and treats `AlreadyExists` on creation as success so racing upserts of
/// an identical graph need no client-side locking.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The addressed resource does not exist on the platform.
    #[error("platform resource '{id}' not found")]
    NotFound { id: String },

    /// The resource was already registered under this id.
    #[error("platform resource '{id}' already exists")]
    AlreadyExists { id: String },

    /// Any other failure reported by the collaborator.
    #[error("platform API error: {0}")]
    Api(String),

    /// I/O failure inside an embedded collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
