// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

pub mod executor;
pub mod platform;

pub use executor::{LocalArgument, LocalExecutor, LocalPipeline, LocalProcessor, LocalRunConfig};
pub use platform::PlatformApi;
