// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Wire-level types shared between the graph model and the platform
//! collaborator.
//!
//! Everything that participates in the pipeline identity digest lives
//! here and serializes deterministically: maps are `BTreeMap` (key-sorted)
//! and struct fields have a fixed declaration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resolver::FunctionReference;

/// One argument binding of a processor node. Exactly one of: a literal
/// data collection generated at build time, or an upstream node's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentBinding {
    Collection {
        #[serde(rename = "collectionName")]
        collection_name: String,
    },
    Upstream {
        id: String,
    },
}

/// A frozen processor node spec. `cfg` is the canonical JSON encoding of
/// the node's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorSpec {
    #[serde(rename = "processorId")]
    pub processor_id: String,
    pub image: FunctionReference,
    pub cfg: String,
    pub arguments: BTreeMap<String, ArgumentBinding>,
}

/// One output-collection descriptor of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSpec {
    pub name: String,
}

/// The pipeline shape exchanged with the platform collaborator.
///
/// The platform may renormalize collection names in `processors` and
/// `results`; whatever it returns is treated as truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSpec {
    #[serde(rename = "pipelineId")]
    pub pipeline_id: String,
    pub processors: BTreeMap<String, ProcessorSpec>,
    pub results: BTreeMap<String, Vec<ResultSpec>>,
}

/// A named group of literal input data for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub data: Value,
}

impl Group {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// A literal payload staged at build time, materialized just-in-time at
/// run submission. Not part of the pipeline identity.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralGroup {
    /// Node the group belongs to.
    pub node: String,
    /// Group name as declared by the caller (argument name on the node).
    pub group: String,
    /// Generated, per-builder-unique collection name.
    pub collection_name: String,
    pub data: Value,
}
