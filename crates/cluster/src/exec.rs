// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming execution gateway.
//!
//! Turns one remote command invocation into a classified
//! [`ExecutionOutcome`]. No retries — a failed attempt is reported as-is
//! and retry policy stays with the caller.

use crate::channel::ExecChannel;
use crate::error::ExecError;
use kx_core::{ExecutionOutcome, ExitCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Gateway for running commands inside pod containers.
///
/// Generic over the [`ExecChannel`] collaborator; cheap to clone.
#[derive(Clone)]
pub struct Executor {
    channel: Arc<dyn ExecChannel>,
}

impl Executor {
    pub fn new(channel: Arc<dyn ExecChannel>) -> Self {
        Self { channel }
    }

    /// Run `command` with a gateway-owned deadline.
    ///
    /// On deadline expiry the outcome carries
    /// [`ExitCode::EXECUTION_TIMED_OUT`] along with whatever partial
    /// stdout/stderr the stream had written. This entry point cannot be
    /// cancelled early; use [`execute_with_cancel`](Self::execute_with_cancel)
    /// to compose with an outer cancellation scope.
    pub async fn execute(
        &self,
        pod: &str,
        container: &str,
        command: &[String],
        stdin: Option<&[u8]>,
        deadline: Duration,
    ) -> ExecutionOutcome {
        let started = Instant::now();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let result = tokio::time::timeout(
            deadline,
            self.channel.exec(pod, container, command, stdin, &mut stdout, &mut stderr),
        )
        .await;

        let outcome = match result {
            Ok(result) => classify(pod, container, result, &stdout, &stderr),
            Err(_) => ExecutionOutcome::new(
                pod,
                container,
                ExitCode::EXECUTION_TIMED_OUT,
                &format!("deadline of {}ms exceeded", deadline.as_millis()),
                &String::from_utf8_lossy(&stdout),
                &String::from_utf8_lossy(&stderr),
            ),
        };
        trace_finished(pod, container, &outcome, started);
        outcome
    }

    /// Run `command` under a caller-supplied cancellation token.
    ///
    /// Cancellation drops the in-flight stream, tearing the connection
    /// down; the outcome carries the timeout sentinel and the output
    /// captured so far.
    pub async fn execute_with_cancel(
        &self,
        cancel: &CancellationToken,
        pod: &str,
        container: &str,
        command: &[String],
        stdin: Option<&[u8]>,
    ) -> ExecutionOutcome {
        let started = Instant::now();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let result = {
            let exec = self.channel.exec(pod, container, command, stdin, &mut stdout, &mut stderr);
            tokio::pin!(exec);
            tokio::select! {
                result = &mut exec => Some(result),
                _ = cancel.cancelled() => None,
            }
        };

        let outcome = match result {
            Some(result) => classify(pod, container, result, &stdout, &stderr),
            None => ExecutionOutcome::new(
                pod,
                container,
                ExitCode::EXECUTION_TIMED_OUT,
                "execution cancelled by caller",
                &String::from_utf8_lossy(&stdout),
                &String::from_utf8_lossy(&stderr),
            ),
        };
        trace_finished(pod, container, &outcome, started);
        outcome
    }
}

fn classify(
    pod: &str,
    container: &str,
    result: Result<(), ExecError>,
    stdout: &[u8],
    stderr: &[u8],
) -> ExecutionOutcome {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    match result {
        Ok(()) => ExecutionOutcome::new(pod, container, ExitCode::SUCCESS, "", &stdout, &stderr),
        Err(err) => {
            let (ret_code, _description) = err.classify();
            if ret_code == ExitCode::INTERNAL_APP_ERROR {
                tracing::warn!(%pod, %container, error = %err, "exec stream failed");
            }
            ExecutionOutcome::new(pod, container, ret_code, &err.to_string(), &stdout, &stderr)
        }
    }
}

fn trace_finished(pod: &str, container: &str, outcome: &ExecutionOutcome, started: Instant) {
    tracing::debug!(
        %pod,
        %container,
        ret_code = outcome.ret_code.code(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "exec finished"
    );
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
