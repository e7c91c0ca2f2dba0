// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

pub mod credentials;
pub mod reference;

pub use credentials::{CoreLogin, CredentialStore, EnvOverrides, ImageLogin, MemoryStore};
pub use reference::{parse, resolve, FunctionReference};
