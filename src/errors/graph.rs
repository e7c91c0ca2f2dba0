// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised eagerly during pipeline graph construction.
///
/// Construction violations surface at the builder call that caused them,
/// never deferred to execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node with this name already exists in the graph.
    #[error("node '{name}' already exists in the graph")]
    DuplicateNode { name: String },

    /// The (node, argument) pair already has a binding, either from
    /// literal data assigned at `start_with` or from a prior `add_flow`.
    #[error("node '{node}' already has a binding for argument '{argument}'")]
    DuplicateBinding { node: String, argument: String },
}
