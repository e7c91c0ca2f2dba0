// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Embedded local executor backend.
//!
//! Runs a pipeline through an in-process executor against a fixed
//! working area (results directory plus two mount directories) created
//! on demand. Execution is strictly sequential: `prepare`, `run`,
//! `stop`, synchronously, one run at a time per executor instance.
//! Concurrent runs sharing one home directory are not synchronized
//! internally; that is a caller obligation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::backends::{BackendKind, ExecutionBackend};
use crate::errors::{ExecutionError, ResultError};
use crate::graph::{ArgumentBinding, Pipeline};
use crate::run::{getid, Operation, Run, RunConfig, RunStatus};
use crate::traits::{LocalArgument, LocalExecutor, LocalPipeline, LocalProcessor, LocalRunConfig};

const RESULTS_DIR: &str = "results";
const MOUNT_DIR: &str = "mnt";
const OBJECT_MOUNT_DIR: &str = "mnt_obj";

/// Drives operations and runs through an embedded local executor.
pub struct LocalBackend<'a> {
    executor: &'a dyn LocalExecutor,
    home: PathBuf,
}

impl<'a> LocalBackend<'a> {
    pub fn new(executor: &'a dyn LocalExecutor, home: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            home: home.into(),
        }
    }

    /// Backend rooted at `~/.gantry`.
    pub fn with_default_home(executor: &'a dyn LocalExecutor) -> Self {
        let home = dirs_next::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gantry");
        Self::new(executor, home)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.home.join(RESULTS_DIR)
    }

    fn ensure_workspace(&self) -> std::io::Result<()> {
        for dir in [RESULTS_DIR, MOUNT_DIR, OBJECT_MOUNT_DIR] {
            std::fs::create_dir_all(self.home.join(dir))?;
        }
        Ok(())
    }

    /// Translates a frozen pipeline into the executor's native
    /// representation, keeping the insertion-independent sorted order of
    /// the frozen node map.
    fn translate(pipeline: &Pipeline) -> LocalPipeline {
        let processors = pipeline
            .processors()
            .iter()
            .map(|(name, spec)| LocalProcessor {
                name: name.clone(),
                processor_id: spec.processor_id.clone(),
                image: spec.image.reference.clone(),
                cfg: spec.cfg.clone(),
                arguments: spec
                    .arguments
                    .iter()
                    .map(|(argument, binding)| {
                        let translated = match binding {
                            ArgumentBinding::Collection { collection_name } => {
                                LocalArgument::Collection(collection_name.clone())
                            }
                            ArgumentBinding::Upstream { id } => LocalArgument::Upstream(id.clone()),
                        };
                        (argument.clone(), translated)
                    })
                    .collect(),
            })
            .collect();

        let results = pipeline
            .results()
            .iter()
            .filter_map(|(name, specs)| {
                specs.first().map(|spec| (name.clone(), spec.name.clone()))
            })
            .collect();

        LocalPipeline {
            pipeline_id: pipeline.identity().to_string(),
            processors,
            results,
        }
    }

    fn run_config(&self, config: &RunConfig, collections: BTreeMap<String, String>) -> LocalRunConfig {
        LocalRunConfig {
            app_config: Value::Object(config.0.clone()),
            collections,
            results_dir: self.home.join(RESULTS_DIR),
            mount_dir: self.home.join(MOUNT_DIR),
            object_mount_dir: self.home.join(OBJECT_MOUNT_DIR),
        }
    }
}

/// Reads every `<n>.json` document of a collection directory in
/// ascending numeric order.
fn read_collection_documents(dir: &Path, collection: &str) -> Result<Vec<Value>, ResultError> {
    let mut numbered: Vec<(u64, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let ordinal = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<u64>().ok());
        if let (Some(ordinal), Some("json")) =
            (ordinal, path.extension().and_then(|ext| ext.to_str()))
        {
            numbered.push((ordinal, path));
        }
    }
    numbered.sort_by_key(|(ordinal, _)| *ordinal);

    let mut documents = Vec::with_capacity(numbered.len());
    for (_, path) in numbered {
        let raw = std::fs::read(&path)?;
        let document =
            serde_json::from_slice(&raw).map_err(|source| ResultError::Decode {
                collection: collection.to_string(),
                source,
            })?;
        documents.push(document);
    }
    Ok(documents)
}

#[async_trait]
impl ExecutionBackend for LocalBackend<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn prepare(
        &self,
        pipeline: &Pipeline,
        config: &RunConfig,
    ) -> Result<Operation, ExecutionError> {
        self.ensure_workspace()?;

        let translated = Self::translate(pipeline);
        let operation_id = self
            .executor
            .prepare(&translated, &self.run_config(config, BTreeMap::new()))
            .await
            .map_err(|source| ExecutionError::Prepare {
                pipeline_id: pipeline.identity().to_string(),
                source,
            })?;

        debug!(pipeline = %pipeline.identity(), operation = %operation_id, "local operation prepared");
        Ok(Operation {
            id: operation_id,
            pipeline_id: Some(pipeline.identity().to_string()),
        })
    }

    async fn submit(
        &self,
        operation: &Operation,
        pipeline: &Pipeline,
        config: &RunConfig,
    ) -> Result<Run, ExecutionError> {
        // Literals go through the executor's content-addressed local
        // storage, no network document store involved.
        let mut collections = BTreeMap::new();
        for literal in pipeline.literals() {
            let local_id = self.executor.store_literal(&literal.data).await.map_err(
                |source| ExecutionError::Submit {
                    operation_id: operation.id.clone(),
                    source,
                },
            )?;
            collections.insert(literal.collection_name.clone(), format!("#{local_id}"));
        }

        let run_id = getid("run");
        let run_config = self.run_config(config, collections);

        let outcome = self
            .executor
            .run(&operation.id, &run_id, &run_config)
            .await;
        // The run is over either way; release executor resources before
        // reporting the outcome.
        let stopped = self.executor.stop(&operation.id, &run_id).await;
        outcome
            .and(stopped)
            .map_err(|source| ExecutionError::Submit {
                operation_id: operation.id.clone(),
                source,
            })?;

        debug!(operation = %operation.id, run = %run_id, "local run completed");
        Ok(Run {
            id: run_id,
            operation_id: operation.id.clone(),
            pipeline_id: operation.pipeline_id.clone(),
            backend: BackendKind::Local,
        })
    }

    async fn status(&self, _run: &Run) -> Result<RunStatus, ExecutionError> {
        // Local runs are fully synchronous: a Run value only exists once
        // the executor has finished it.
        Ok(RunStatus::Completed)
    }

    async fn documents(&self, run: &Run, collection: &str) -> Result<Vec<Value>, ResultError> {
        let dir = self
            .results_dir()
            .join(&run.operation_id)
            .join(&run.id)
            .join(collection);
        read_collection_documents(&dir, collection)
    }

    async fn object_bytes(&self, _path: &str) -> Result<Vec<u8>, ResultError> {
        Err(ResultError::Unsupported {
            operation: "file()",
            backend: BackendKind::Local.as_str(),
        })
    }
}
