// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Frozen, content-addressed pipelines.
//!
//! Pipeline identity is the SHA-256 digest of the deterministic,
//! key-sorted serialization of every node spec, argument bindings
//! included, so topology is part of the identity. Two structurally
//! identical graphs hash to the same identity no matter how they were
//! assembled; any node-spec difference changes it.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::errors::{ExecutionError, PlatformError};
use crate::graph::node::{ArgumentBinding, LiteralGroup, PipelineSpec, ProcessorSpec, ResultSpec};
use crate::traits::PlatformApi;

/// An immutable pipeline value: identity, node specs, results mapping,
/// and the literal payloads staged at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    identity: String,
    processors: BTreeMap<String, ProcessorSpec>,
    results: BTreeMap<String, Vec<ResultSpec>>,
    literals: Vec<LiteralGroup>,
}

impl Pipeline {
    /// Freezes builder output: computes the identity and generates
    /// locally unique result-collection names (`<identity>_<node>`).
    /// The platform may replace those names; the upsert re-fetch is what
    /// makes its renormalization visible.
    pub(crate) fn freeze(nodes: Vec<(String, ProcessorSpec)>, literals: Vec<LiteralGroup>) -> Self {
        let processors: BTreeMap<String, ProcessorSpec> = nodes.into_iter().collect();
        let identity = Self::digest(&processors);
        let results = processors
            .keys()
            .map(|name| {
                (
                    name.clone(),
                    vec![ResultSpec {
                        name: format!("{identity}_{name}"),
                    }],
                )
            })
            .collect();
        Self {
            identity,
            processors,
            results,
            literals,
        }
    }

    fn digest(processors: &BTreeMap<String, ProcessorSpec>) -> String {
        let canonical = serde_json::to_vec(processors).expect("processor specs serialize");
        hex::encode(Sha256::digest(&canonical))
    }

    fn from_spec(spec: PipelineSpec, literals: Vec<LiteralGroup>) -> Self {
        Self {
            identity: spec.pipeline_id,
            processors: spec.processors,
            results: spec.results,
            literals,
        }
    }

    /// Content-addressed identity; never changes after `build`.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn node(&self, name: &str) -> Option<&ProcessorSpec> {
        self.processors.get(name)
    }

    pub fn processors(&self) -> &BTreeMap<String, ProcessorSpec> {
        &self.processors
    }

    pub fn results(&self) -> &BTreeMap<String, Vec<ResultSpec>> {
        &self.results
    }

    pub fn literals(&self) -> &[LiteralGroup] {
        &self.literals
    }

    /// The wire shape sent to the platform collaborator.
    pub fn spec(&self) -> PipelineSpec {
        PipelineSpec {
            pipeline_id: self.identity.clone(),
            processors: self.processors.clone(),
            results: self.results.clone(),
        }
    }

    /// Nodes never referenced as an upstream source in any other node's
    /// bindings.
    pub fn terminals(&self) -> Vec<&str> {
        self.processors
            .keys()
            .filter(|name| {
                !self.processors.values().any(|spec| {
                    spec.arguments.values().any(|binding| {
                        matches!(binding, ArgumentBinding::Upstream { id } if id == *name)
                    })
                })
            })
            .map(String::as_str)
            .collect()
    }

    /// Fetches a registered pipeline by identity.
    pub async fn fetch(api: &dyn PlatformApi, id: &str) -> Result<Self, ExecutionError> {
        match api.get_pipeline(id).await {
            Ok(spec) => Ok(Self::from_spec(spec, Vec::new())),
            Err(PlatformError::NotFound { .. }) => Err(ExecutionError::PipelineNotFound {
                id: id.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Registers this pipeline under its identity unless one already
    /// exists, then re-fetches.
    ///
    /// The re-fetch is mandatory even on the creating path: the platform
    /// may renormalize collection names, and the locally computed
    /// structure is never treated as final truth for results. A racing
    /// creation of the identical graph is tolerated by treating
    /// `AlreadyExists` as success.
    pub async fn upsert(&self, api: &dyn PlatformApi) -> Result<Self, ExecutionError> {
        match api.get_pipeline(&self.identity).await {
            Ok(spec) => {
                debug!(pipeline = %self.identity, "pipeline already registered");
                return Ok(Self::from_spec(spec, self.literals.clone()));
            }
            // The one internally swallowed failure: drives create-then-refetch.
            Err(PlatformError::NotFound { .. }) => {}
            Err(err) => return Err(err.into()),
        }

        match api.create_pipeline(&self.spec()).await {
            Ok(()) => debug!(pipeline = %self.identity, "pipeline registered"),
            Err(PlatformError::AlreadyExists { .. }) => {
                debug!(pipeline = %self.identity, "pipeline registered concurrently")
            }
            Err(err) => return Err(err.into()),
        }

        match api.get_pipeline(&self.identity).await {
            Ok(spec) => Ok(Self::from_spec(spec, self.literals.clone())),
            Err(PlatformError::NotFound { .. }) => Err(ExecutionError::PipelineNotFound {
                id: self.identity.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}
