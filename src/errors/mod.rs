// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

mod execution;
mod graph;
mod platform;
mod reference;
mod results;

pub use execution::ExecutionError;
pub use graph::GraphError;
pub use platform::PlatformError;
pub use reference::ReferenceError;
pub use results::ResultError;
