// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

use crate::backends::BackendKind;
use crate::errors::ExecutionError;

/// Coalesced run status. The platform reports finer-grained sub-states;
/// this core maps `running` and `waiting` to `InProgress` and treats any
/// unrecognized status string as fatal rather than assuming a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    InProgress,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

/// Maps a raw platform status string onto [`RunStatus`].
pub(crate) fn map_status(run_id: &str, raw: &str) -> Result<RunStatus, ExecutionError> {
    match raw {
        "in_progress" | "running" | "waiting" => Ok(RunStatus::InProgress),
        "completed" => Ok(RunStatus::Completed),
        "failed" => Ok(RunStatus::Failed),
        other => Err(ExecutionError::UnexpectedStatus {
            run_id: run_id.to_string(),
            status: other.to_string(),
        }),
    }
}

/// One execution attempt of an operation. Once terminal it is never
/// reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub id: String,
    pub operation_id: String,
    pub pipeline_id: Option<String>,
    pub backend: BackendKind,
}
