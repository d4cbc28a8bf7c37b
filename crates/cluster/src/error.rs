// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the cluster-facing operations, plus exit-code
//! classification of exec failures.

use crate::lister::GroupKind;
use kx_core::ExitCode;
use thiserror::Error;

/// Failure modes of a single remote exec stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The remote process ran to completion and exited non-zero.
    ///
    /// Not a transport failure — the gateway reports it as a classified
    /// outcome rather than an error.
    #[error("command terminated with exit code {code}")]
    NonZeroExit { code: i32 },
    /// The stream could not be established (auth, network, malformed request).
    #[error("failed to establish exec stream: {0}")]
    Connect(String),
    /// The stream broke down after establishment.
    #[error("exec stream failed: {0}")]
    Stream(String),
    /// The stream closed without reporting a termination status.
    #[error("exec stream closed without a termination status")]
    MissingStatus,
}

impl ExecError {
    /// Classify a failure into an exit code and its description.
    ///
    /// A non-zero process exit yields its code and the documented text, or
    /// a "description not found" fallback for undocumented codes. Any other
    /// failure carries no exit code at all and classifies as
    /// `(INTERNAL_APP_ERROR, "")` — callers must not conflate that empty
    /// description with an undocumented-but-present code.
    pub fn classify(&self) -> (ExitCode, String) {
        match self {
            ExecError::NonZeroExit { code } => {
                let code = ExitCode::from(*code);
                let description = code.describe();
                if description.is_empty() {
                    (code, format!("Exit code {} description not found!", code.code()))
                } else {
                    (code, description.to_string())
                }
            }
            _ => (ExitCode::INTERNAL_APP_ERROR, String::new()),
        }
    }
}

/// Failure listing resources in the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// Enumerating the replica groups of one kind failed.
    #[error("listing {kind} groups failed: {message}")]
    Groups { kind: GroupKind, message: String },
    /// Listing pods failed.
    #[error("listing pods failed: {message}")]
    Pods { message: String },
}

/// All read attempts against a file inside a container failed.
///
/// Carries the exit code and error text of the last attempt in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not read {path}: {message}")]
pub struct ProbeError {
    pub path: String,
    pub ret_code: ExitCode,
    pub message: String,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
