// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while parsing a function reference string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The input matched none of the supported reference forms.
    #[error("invalid function reference: '{input}'")]
    InvalidFormat { input: String },
}
