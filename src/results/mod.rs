// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Result resolution over a completed run.
//!
//! Named access addresses one node's declared output collection.
//! Unnamed access resolves to the named access of the pipeline's single
//! terminal node; the discovered terminal is computed once and cached,
//! since a frozen pipeline's results mapping cannot change afterwards.

use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::backends::{BackendKind, ExecutionBackend};
use crate::errors::ResultError;
use crate::graph::Pipeline;
use crate::run::Run;

/// Read-only view over the output collections of one run.
pub struct RunResults<'a> {
    backend: &'a dyn ExecutionBackend,
    run: &'a Run,
    pipeline: &'a Pipeline,
    terminal: OnceLock<String>,
}

impl<'a> RunResults<'a> {
    pub fn new(backend: &'a dyn ExecutionBackend, run: &'a Run, pipeline: &'a Pipeline) -> Self {
        Self {
            backend,
            run,
            pipeline,
            terminal: OnceLock::new(),
        }
    }

    /// Handle over `node`'s declared output collection.
    pub fn named(&self, node: &str) -> Result<ResultHandle<'a>, ResultError> {
        let collection = self
            .pipeline
            .results()
            .get(node)
            .and_then(|specs| specs.first())
            .ok_or_else(|| ResultError::UnknownNode {
                node: node.to_string(),
            })?;
        Ok(ResultHandle {
            backend: self.backend,
            run: self.run,
            collection: collection.name.clone(),
        })
    }

    /// The single terminal node, cached for the lifetime of this view.
    fn terminal(&self) -> Result<&str, ResultError> {
        if let Some(name) = self.terminal.get() {
            return Ok(name.as_str());
        }
        let terminals = self.pipeline.terminals();
        if terminals.len() != 1 {
            return Err(ResultError::AmbiguousTerminal {
                terminals: terminals.into_iter().map(str::to_string).collect(),
            });
        }
        Ok(self
            .terminal
            .get_or_init(|| terminals[0].to_string())
            .as_str())
    }

    /// Documents of the single terminal node.
    pub async fn docs(&self) -> Result<Vec<Value>, ResultError> {
        self.named(self.terminal()?)?.docs().await
    }

    /// Downloadable file of the single terminal node.
    pub async fn file(&self) -> Result<ResultFile, ResultError> {
        self.named(self.terminal()?)?.file().await
    }
}

/// Read-only view over one node's output collection.
pub struct ResultHandle<'a> {
    backend: &'a dyn ExecutionBackend,
    run: &'a Run,
    collection: String,
}

impl ResultHandle<'_> {
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Every document in the collection, decoded as JSON.
    pub async fn docs(&self) -> Result<Vec<Value>, ResultError> {
        self.backend.documents(self.run, &self.collection).await
    }

    /// Downloads the collection's single file document.
    ///
    /// Requires exactly one document carrying a `path` field; the bytes
    /// behind it are staged into a scoped temporary file.
    pub async fn file(&self) -> Result<ResultFile, ResultError> {
        // No networked object store exists behind the local backend.
        if self.backend.kind() == BackendKind::Local {
            return Err(ResultError::Unsupported {
                operation: "file()",
                backend: BackendKind::Local.as_str(),
            });
        }

        let docs = self.docs().await?;
        if docs.len() != 1 {
            return Err(ResultError::AmbiguousFileResult {
                collection: self.collection.clone(),
                count: docs.len(),
            });
        }
        let path = docs[0]
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| ResultError::MissingPathField {
                collection: self.collection.clone(),
            })?;

        let bytes = self.backend.object_bytes(path).await?;
        ResultFile::stage(path, &bytes)
    }
}

/// A downloaded result object staged in a temporary file.
///
/// The backing file is removed when the handle drops, on every exit
/// path, independent of any collection timing.
#[derive(Debug)]
pub struct ResultFile {
    remote_path: String,
    staged: NamedTempFile,
}

impl ResultFile {
    fn stage(remote_path: &str, bytes: &[u8]) -> Result<Self, ResultError> {
        let mut staged = NamedTempFile::new()?;
        staged.write_all(bytes)?;
        staged.flush()?;
        Ok(Self {
            remote_path: remote_path.to_string(),
            staged,
        })
    }

    /// The platform-side path the object was fetched from.
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    /// Local path of the staged copy, valid until this handle drops.
    pub fn path(&self) -> &Path {
        self.staged.path()
    }

    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.staged.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_file_staging_and_cleanup() {
        let file = ResultFile::stage("objects/report.bin", b"payload").unwrap();
        assert_eq!(file.remote_path(), "objects/report.bin");
        assert_eq!(file.read().unwrap(), b"payload");

        let staged_path = file.path().to_path_buf();
        assert!(staged_path.exists());
        drop(file);
        assert!(!staged_path.exists());
    }
}
