// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote exec channel boundary.
//!
//! # Architecture
//!
//! One [`ExecChannel::exec`] call is one multiplexed bidirectional stream
//! carrying stdin, stdout, stderr, and the final termination status for a
//! single remote command. The channel writes captured output incrementally
//! into caller-owned buffers, so partial output survives when the caller
//! drops the in-flight future on deadline expiry or cancellation.
//!
//! [`KubeChannel`] is the production implementation: a websocket exec
//! stream against the pod's `exec` subresource via `kube-rs`. Cluster
//! connectivity is the caller's concern — the constructor takes an
//! already-configured [`kube::Client`].

use crate::error::ExecError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use kube::api::{Api, AttachParams};
use kube::Client;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

/// A single-invocation remote command stream.
#[async_trait]
pub trait ExecChannel: Send + Sync {
    /// Run `command` in `container` of `pod`, wiring `stdin` if present and
    /// capturing output into the caller-owned buffers.
    ///
    /// Returns `Ok(())` only when the remote process exits 0; a non-zero
    /// exit surfaces as [`ExecError::NonZeroExit`]. Cancellation is
    /// cooperative: dropping the returned future tears the stream down.
    async fn exec(
        &self,
        pod: &str,
        container: &str,
        command: &[String],
        stdin: Option<&[u8]>,
        stdout: &mut Vec<u8>,
        stderr: &mut Vec<u8>,
    ) -> Result<(), ExecError>;
}

/// Exec channel backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeChannel {
    pods: Api<Pod>,
}

impl KubeChannel {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self { pods: Api::namespaced(client, namespace) }
    }
}

#[async_trait]
impl ExecChannel for KubeChannel {
    async fn exec(
        &self,
        pod: &str,
        container: &str,
        command: &[String],
        stdin: Option<&[u8]>,
        stdout: &mut Vec<u8>,
        stderr: &mut Vec<u8>,
    ) -> Result<(), ExecError> {
        let params = AttachParams::default()
            .container(container)
            .stdin(stdin.is_some())
            .stdout(true)
            .stderr(true)
            .tty(false);

        let mut attached = self
            .pods
            .exec(pod, command.to_vec(), &params)
            .await
            .map_err(|e| ExecError::Connect(e.to_string()))?;

        let status = attached.take_status().ok_or(ExecError::MissingStatus)?;
        let stdin_writer = attached.stdin();
        let stdout_reader = attached.stdout();
        let stderr_reader = attached.stderr();

        tokio::join!(
            async {
                if let (Some(mut writer), Some(bytes)) = (stdin_writer, stdin) {
                    // Best effort: a command that never reads stdin closes
                    // its end early and the write fails harmlessly.
                    let _ = writer.write_all(bytes).await;
                    let _ = writer.shutdown().await;
                }
            },
            pump(stdout_reader, stdout),
            pump(stderr_reader, stderr),
        );

        match status.await {
            Some(status) => termination_to_result(status),
            None => Err(ExecError::MissingStatus),
        }
    }
}

/// Drain a stream half into its capture buffer, chunk by chunk.
async fn pump(reader: Option<impl AsyncRead + Unpin>, buf: &mut Vec<u8>) {
    let Some(mut reader) = reader else { return };
    let mut chunk = [0u8; 4096];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Map the API server's termination `Status` onto the channel result.
///
/// A non-zero process exit arrives as a `Failure` status whose details
/// carry an `ExitCode` cause with the code in its message.
fn termination_to_result(status: Status) -> Result<(), ExecError> {
    if status.status.as_deref() == Some("Success") {
        return Ok(());
    }
    match exit_code_from_status(&status) {
        Some(code) => Err(ExecError::NonZeroExit { code }),
        None => Err(ExecError::Stream(
            status.message.unwrap_or_else(|| "exec failed without detail".to_string()),
        )),
    }
}

fn exit_code_from_status(status: &Status) -> Option<i32> {
    status
        .details
        .as_ref()?
        .causes
        .as_ref()?
        .iter()
        .find(|cause| cause.reason.as_deref() == Some("ExitCode"))
        .and_then(|cause| cause.message.as_deref())
        .and_then(|message| message.parse().ok())
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
