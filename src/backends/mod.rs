// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Execution backends.
//!
//! A closed set of two backends implements one execution contract: the
//! remote compute platform and an embedded local executor. The caller
//! selects the backend explicitly at call time; nothing here inspects
//! types at runtime to pick a code path.

pub mod local;
pub mod remote;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{ExecutionError, ResultError};
use crate::graph::Pipeline;
use crate::run::{Operation, Run, RunConfig, RunStatus};

pub use local::LocalBackend;
pub use remote::RemoteBackend;

/// Which backend a run was submitted through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Remote,
    Local,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Remote => "remote",
            BackendKind::Local => "local",
        }
    }
}

/// The execution contract both backends fulfill.
///
/// This core performs no internal parallel scheduling and defines no
/// cancellation or timeout primitive: a remote run is observed only by
/// repeated `status` polling, and a local run is fully synchronous
/// inside `submit`.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Obtains an executable operation for the pipeline, reusing an
    /// already-active one where the backend supports it. Idempotent
    /// under reuse.
    async fn prepare(
        &self,
        pipeline: &Pipeline,
        config: &RunConfig,
    ) -> Result<Operation, ExecutionError>;

    /// Materializes the pipeline's literal payloads and submits one run.
    async fn submit(
        &self,
        operation: &Operation,
        pipeline: &Pipeline,
        config: &RunConfig,
    ) -> Result<Run, ExecutionError>;

    async fn status(&self, run: &Run) -> Result<RunStatus, ExecutionError>;

    /// Decoded documents of one output collection of the run.
    async fn documents(&self, run: &Run, collection: &str) -> Result<Vec<Value>, ResultError>;

    /// Raw object bytes behind a document path. Unsupported locally.
    async fn object_bytes(&self, path: &str) -> Result<Vec<u8>, ResultError>;
}
