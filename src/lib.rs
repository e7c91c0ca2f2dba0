// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

pub mod backends;   // execution backends (remote platform, embedded local)
pub mod errors;     // error handling
pub mod graph;      // pipeline graph model
pub mod resolver;   // function reference resolver + credentials
pub mod results;    // run result resolution
pub mod run;        // operation & run lifecycle
pub mod traits;     // collaborator contracts


pub use backends::{BackendKind, ExecutionBackend, LocalBackend, RemoteBackend};
pub use graph::{GraphBuilder, Group, NodeRef, Pipeline};
pub use resolver::FunctionReference;
pub use results::{ResultFile, ResultHandle, RunResults};
pub use run::{Operation, Run, RunConfig, RunStatus};
