// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::graph::GraphError;
use super::platform::PlatformError;
use super::reference::ReferenceError;

/// Errors raised across the operation and run lifecycle.
///
/// Preparation failures (`Prepare`, `PipelineBinding`) are distinct from
/// submission failures (`Submit`) so callers can tell "never got an
/// executable operation" from "ran but failed".
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// No pipeline is registered under this identity.
    #[error("pipeline '{id}' not found")]
    PipelineNotFound { id: String },

    /// The operation is not bound to the expected pipeline identity, or
    /// the binding round-trip query itself failed.
    #[error("operation '{operation_id}' is not bound to pipeline '{pipeline_id}'")]
    PipelineBinding {
        operation_id: String,
        pipeline_id: String,
    },

    /// The platform reported a run status string this core does not map.
    #[error("unexpected run status '{status}' for run '{run_id}'")]
    UnexpectedStatus { run_id: String, status: String },

    /// Failed before an executable operation was obtained.
    #[error("operation preparation failed for pipeline '{pipeline_id}': {source}")]
    Prepare {
        pipeline_id: String,
        source: PlatformError,
    },

    /// Failed while submitting or driving a run of a prepared operation.
    #[error("run submission failed for operation '{operation_id}': {source}")]
    Submit {
        operation_id: String,
        source: PlatformError,
    },

    /// Collaborator failure outside preparation or submission.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Reference parsing failure inside a combined submit call.
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Graph construction failure inside a combined submit call.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Local working-area failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
