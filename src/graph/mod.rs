// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

pub mod builder;
pub mod node;
pub mod pipeline;

pub use builder::{GraphBuilder, NodeRef};
pub use node::{ArgumentBinding, Group, LiteralGroup, PipelineSpec, ProcessorSpec, ResultSpec};
pub use pipeline::Pipeline;

/// Group key for literal data passed outside any named group.
pub const DEFAULT_GROUP: &str = "__input__";
