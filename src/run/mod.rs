// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Operation and run lifecycle.
//!
//! The lifecycle `Unprepared -> Prepared -> Executing -> Terminal` is
//! expressed through types: a frozen [`Pipeline`](crate::graph::Pipeline)
//! is unprepared, obtaining an [`Operation`] is preparation, a [`Run`]
//! is executing, and a terminal [`RunStatus`] ends it. No transition
//! skips a state; failures surface immediately without retry.

pub mod operation;
#[allow(clippy::module_inception)]
pub mod run;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use operation::Operation;
pub use run::{Run, RunStatus};

use crate::backends::{ExecutionBackend, RemoteBackend};
use crate::errors::ExecutionError;
use crate::graph::{GraphBuilder, Group, Pipeline};
use crate::resolver::{self, CredentialStore};
use crate::traits::PlatformApi;

/// Opaque per-run configuration object handed to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig(pub Map<String, Value>);

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<Map<String, Value>> for RunConfig {
    fn from(values: Map<String, Value>) -> Self {
        Self(values)
    }
}

/// Generates a prefixed, collision-resistant id (`<prefix>_<hex>`).
pub(crate) fn getid(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Node name used when a single function is wrapped into a pipeline.
pub const MAIN_NODE: &str = "__main__";

/// One-call convenience: wraps a single function reference into a
/// `__main__` pipeline, upserts it, prepares an operation (reusing an
/// active one when possible) and submits a run with the given literal
/// input groups. Returns the run together with the upserted pipeline the
/// results mapping came from.
pub async fn submit_function(
    api: &dyn PlatformApi,
    credentials: &dyn CredentialStore,
    reference: &str,
    config: Option<Value>,
    groups: Vec<Group>,
    data: Option<Value>,
) -> Result<(Run, Pipeline), ExecutionError> {
    let function = resolver::resolve(reference, credentials)?;

    let mut builder = GraphBuilder::new();
    builder.start_with(MAIN_NODE, groups, function, config.clone(), data)?;
    let pipeline = builder.build().upsert(api).await?;

    let run_config = match config {
        Some(Value::Object(values)) => RunConfig(values),
        _ => RunConfig::new(),
    };

    let backend = RemoteBackend::new(api);
    let operation = backend.prepare(&pipeline, &run_config).await?;
    let run = backend.submit(&operation, &pipeline, &run_config).await?;
    Ok((run, pipeline))
}
