// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Embedded local executor collaborator contract.
//!
//! The executor runs one pipeline at a time, strictly sequentially
//! (`prepare` then `run` then `stop`), against a working area it shares
//! with the local backend. Results must be written to
//! `<results_dir>/<operation_id>/<run_id>/<collection>/<n>.json` so the
//! backend can read them straight off the filesystem.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::PlatformError;

/// Argument binding in the executor's native representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalArgument {
    Collection(String),
    Upstream(String),
}

/// One processor node translated for the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalProcessor {
    pub name: String,
    pub processor_id: String,
    pub image: String,
    pub cfg: String,
    pub arguments: BTreeMap<String, LocalArgument>,
}

/// A frozen pipeline translated for the executor, including the
/// output-collection name of each node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPipeline {
    pub pipeline_id: String,
    pub processors: Vec<LocalProcessor>,
    pub results: BTreeMap<String, String>,
}

/// Per-run configuration translated for the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalRunConfig {
    pub app_config: Value,
    /// Collection name to local storage reference (`#<localId>`).
    pub collections: BTreeMap<String, String>,
    pub results_dir: PathBuf,
    pub mount_dir: PathBuf,
    pub object_mount_dir: PathBuf,
}

#[async_trait]
pub trait LocalExecutor: Send + Sync {
    /// Loads a translated pipeline and returns an operation id.
    async fn prepare(
        &self,
        pipeline: &LocalPipeline,
        config: &LocalRunConfig,
    ) -> Result<String, PlatformError>;

    /// Executes one run synchronously; returns once the run is terminal.
    async fn run(
        &self,
        operation_id: &str,
        run_id: &str,
        config: &LocalRunConfig,
    ) -> Result<(), PlatformError>;

    /// Releases executor resources held for the run.
    async fn stop(&self, operation_id: &str, run_id: &str) -> Result<(), PlatformError>;

    /// Stores a literal payload in the executor's content-addressed local
    /// storage, no network round-trip.
    async fn store_literal(&self, data: &Value) -> Result<String, PlatformError>;
}
