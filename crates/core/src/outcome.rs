// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution outcome record.
//!
//! One record per remote command invocation, created exactly once by the
//! gateway and immutable from then on. The serialized field names (`Pod`,
//! `Container`, `RetCode`, ...) are the wire shape existing consumers parse.

use crate::exit::ExitCode;
use serde::{Deserialize, Serialize};

/// Result of running one command inside a pod's container.
///
/// The three text fields hold captured text split on `\n`. An empty capture
/// yields a single empty-string element rather than an empty vector, and a
/// trailing newline yields a trailing empty element. Consumers depend on
/// that split shape; [`stdout_text`](Self::stdout_text) reverses it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    #[serde(rename = "Pod")]
    pub pod: String,
    #[serde(rename = "Container")]
    pub container: String,
    #[serde(rename = "RetCode")]
    pub ret_code: ExitCode,
    #[serde(rename = "Error")]
    pub error: Vec<String>,
    #[serde(rename = "Stdout")]
    pub stdout: Vec<String>,
    #[serde(rename = "Stderr")]
    pub stderr: Vec<String>,
}

impl ExecutionOutcome {
    pub fn new(
        pod: &str,
        container: &str,
        ret_code: ExitCode,
        error: &str,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        Self {
            pod: pod.to_string(),
            container: container.to_string(),
            ret_code,
            error: split_lines(error),
            stdout: split_lines(stdout),
            stderr: split_lines(stderr),
        }
    }

    pub fn is_success(&self) -> bool {
        self.ret_code.is_success()
    }

    /// Captured stdout reassembled into the original text.
    pub fn stdout_text(&self) -> String {
        self.stdout.join("\n")
    }

    /// Captured stderr reassembled into the original text.
    pub fn stderr_text(&self) -> String {
        self.stderr.join("\n")
    }

    /// Error description reassembled into the original text.
    pub fn error_text(&self) -> String {
        self.error.join("\n")
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
