// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

use tracing::debug;

use crate::errors::ExecutionError;
use crate::traits::PlatformApi;

/// A platform-materialized, runnable instance of one pipeline identity.
/// May be reused across multiple runs; persists remotely until torn down
/// outside this core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub id: String,
    pub pipeline_id: Option<String>,
}

impl Operation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pipeline_id: None,
        }
    }

    /// Records the pipeline this operation belongs to, optionally
    /// verifying the binding by a round-trip query.
    ///
    /// A mismatch, or failure of the query itself, is
    /// [`ExecutionError::PipelineBinding`] — the guard against silently
    /// accepting a stale or foreign operation id.
    pub async fn bind_pipeline(
        &mut self,
        api: &dyn PlatformApi,
        pipeline_id: &str,
        verify: bool,
    ) -> Result<(), ExecutionError> {
        if verify {
            let bound = api.operation_pipeline(&self.id).await.map_err(|err| {
                debug!(operation = %self.id, error = %err, "binding query failed");
                ExecutionError::PipelineBinding {
                    operation_id: self.id.clone(),
                    pipeline_id: pipeline_id.to_string(),
                }
            })?;
            if bound != pipeline_id {
                return Err(ExecutionError::PipelineBinding {
                    operation_id: self.id.clone(),
                    pipeline_id: pipeline_id.to_string(),
                });
            }
        }
        self.pipeline_id = Some(pipeline_id.to_string());
        Ok(())
    }
}
