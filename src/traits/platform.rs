// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Remote platform API collaborator contract.
//!
//! This core never talks to the network itself; callers hand it an
//! implementation of this trait. Calls are ordinary blocking-style
//! awaits, individually safe to issue concurrently across independent
//! pipelines, operations and runs; conflict resolution for concurrent
//! writes to the same remote resource is the platform's responsibility.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::PlatformError;
use crate::graph::PipelineSpec;
use crate::run::RunConfig;

#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Fetches a registered pipeline by identity.
    /// Must report `PlatformError::NotFound` for unknown identities.
    async fn get_pipeline(&self, id: &str) -> Result<PipelineSpec, PlatformError>;

    /// Registers a pipeline under its identity.
    /// Must report `PlatformError::AlreadyExists` rather than failing when
    /// the identity is already taken.
    async fn create_pipeline(&self, spec: &PipelineSpec) -> Result<(), PlatformError>;

    /// Operation ids currently active for a pipeline identity.
    async fn list_active_operations(&self, pipeline_id: &str) -> Result<Vec<String>, PlatformError>;

    /// Materializes a fresh operation for the pipeline.
    async fn prepare_operation(
        &self,
        pipeline_id: &str,
        config: &RunConfig,
    ) -> Result<String, PlatformError>;

    /// The pipeline identity an operation is bound to. Used to verify a
    /// reused operation before trusting it.
    async fn operation_pipeline(&self, operation_id: &str) -> Result<String, PlatformError>;

    /// Submits one run of an operation. `collections` maps collection
    /// names to platform document references (`#<documentId>`).
    async fn submit_run(
        &self,
        operation_id: &str,
        config: &RunConfig,
        collections: &BTreeMap<String, String>,
    ) -> Result<String, PlatformError>;

    /// Raw platform status string for a run.
    async fn run_status(&self, operation_id: &str, run_id: &str) -> Result<String, PlatformError>;

    /// Ordered documents of one output collection of a run.
    async fn fetch_collection_documents(
        &self,
        collection: &str,
        operation_id: &str,
        run_id: &str,
    ) -> Result<Vec<Value>, PlatformError>;

    /// Raw bytes behind a document's `path` field.
    async fn fetch_collection_object_bytes(&self, path: &str) -> Result<Vec<u8>, PlatformError>;

    /// Creates a platform document holding a literal payload.
    async fn create_document(&self, payload: &Value) -> Result<String, PlatformError>;
}
