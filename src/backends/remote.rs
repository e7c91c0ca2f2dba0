// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Remote platform backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::backends::{BackendKind, ExecutionBackend};
use crate::errors::{ExecutionError, ResultError};
use crate::graph::{ArgumentBinding, Pipeline};
use crate::run::run::map_status;
use crate::run::{Operation, Run, RunConfig, RunStatus};
use crate::traits::PlatformApi;

/// Drives operations and runs through the remote platform collaborator.
pub struct RemoteBackend<'a> {
    api: &'a dyn PlatformApi,
}

impl<'a> RemoteBackend<'a> {
    pub fn new(api: &'a dyn PlatformApi) -> Self {
        Self { api }
    }

    /// The collection name a literal group materializes under. The
    /// platform may have renormalized the build-time name during upsert,
    /// so the node's argument binding in the upserted pipeline is truth;
    /// the build-time name is only a fallback.
    fn resolved_collection<'p>(
        pipeline: &'p Pipeline,
        node: &str,
        group: &str,
        fallback: &'p str,
    ) -> &'p str {
        pipeline
            .node(node)
            .and_then(|spec| spec.arguments.get(group))
            .and_then(|binding| match binding {
                ArgumentBinding::Collection { collection_name } => Some(collection_name.as_str()),
                ArgumentBinding::Upstream { .. } => None,
            })
            .unwrap_or(fallback)
    }
}

#[async_trait]
impl ExecutionBackend for RemoteBackend<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn prepare(
        &self,
        pipeline: &Pipeline,
        config: &RunConfig,
    ) -> Result<Operation, ExecutionError> {
        let pipeline_id = pipeline.identity();

        let active = self
            .api
            .list_active_operations(pipeline_id)
            .await
            .map_err(|source| ExecutionError::Prepare {
                pipeline_id: pipeline_id.to_string(),
                source,
            })?;

        let operation_id = match active.into_iter().next() {
            Some(id) => {
                debug!(pipeline = %pipeline_id, operation = %id, "reusing active operation");
                id
            }
            None => {
                let id = self
                    .api
                    .prepare_operation(pipeline_id, config)
                    .await
                    .map_err(|source| ExecutionError::Prepare {
                        pipeline_id: pipeline_id.to_string(),
                        source,
                    })?;
                debug!(pipeline = %pipeline_id, operation = %id, "prepared fresh operation");
                id
            }
        };

        let mut operation = Operation::new(operation_id);
        operation.bind_pipeline(self.api, pipeline_id, true).await?;
        Ok(operation)
    }

    async fn submit(
        &self,
        operation: &Operation,
        pipeline: &Pipeline,
        config: &RunConfig,
    ) -> Result<Run, ExecutionError> {
        // Literal payloads become platform documents just-in-time; each
        // group maps to one collection reference.
        let mut collections = BTreeMap::new();
        for literal in pipeline.literals() {
            let collection = Self::resolved_collection(
                pipeline,
                &literal.node,
                &literal.group,
                &literal.collection_name,
            );
            let document_id = self.api.create_document(&literal.data).await.map_err(
                |source| ExecutionError::Submit {
                    operation_id: operation.id.clone(),
                    source,
                },
            )?;
            collections.insert(collection.to_string(), format!("#{document_id}"));
        }

        let run_id = self
            .api
            .submit_run(&operation.id, config, &collections)
            .await
            .map_err(|source| ExecutionError::Submit {
                operation_id: operation.id.clone(),
                source,
            })?;

        debug!(operation = %operation.id, run = %run_id, "run submitted");
        Ok(Run {
            id: run_id,
            operation_id: operation.id.clone(),
            pipeline_id: operation.pipeline_id.clone(),
            backend: BackendKind::Remote,
        })
    }

    async fn status(&self, run: &Run) -> Result<RunStatus, ExecutionError> {
        let raw = self.api.run_status(&run.operation_id, &run.id).await?;
        map_status(&run.id, &raw)
    }

    async fn documents(&self, run: &Run, collection: &str) -> Result<Vec<Value>, ResultError> {
        Ok(self
            .api
            .fetch_collection_documents(collection, &run.operation_id, &run.id)
            .await?)
    }

    async fn object_bytes(&self, path: &str) -> Result<Vec<u8>, ResultError> {
        Ok(self.api.fetch_collection_object_bytes(path).await?)
    }
}
