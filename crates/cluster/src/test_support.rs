// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted collaborator doubles for gateway, probe, and dedup tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::channel::ExecChannel;
use crate::error::{ExecError, ListError};
use crate::lister::{ContainerSpec, GroupKind, PodSummary, ReplicaGroup, ResourceLister};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

// ── Exec channel double ─────────────────────────────────────────────────

/// One scripted response for [`ScriptedChannel`].
pub struct ScriptedExec {
    stdout: String,
    stderr: String,
    result: Result<(), ExecError>,
    stall: bool,
}

impl ScriptedExec {
    /// Exit 0 with the given stdout.
    pub fn success(stdout: &str) -> Self {
        Self { stdout: stdout.to_string(), stderr: String::new(), result: Ok(()), stall: false }
    }

    /// Non-zero process exit.
    pub fn exit(code: i32) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            result: Err(ExecError::NonZeroExit { code }),
            stall: false,
        }
    }

    /// Stream breakdown after establishment.
    pub fn transport(message: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            result: Err(ExecError::Stream(message.to_string())),
            stall: false,
        }
    }

    /// Write `stdout` then hang until the caller's deadline or token fires.
    pub fn stall(stdout: &str) -> Self {
        Self { stdout: stdout.to_string(), stderr: String::new(), result: Ok(()), stall: true }
    }

    pub fn with_stdout(mut self, stdout: &str) -> Self {
        self.stdout = stdout.to_string();
        self
    }

    pub fn with_stderr(mut self, stderr: &str) -> Self {
        self.stderr = stderr.to_string();
        self
    }
}

/// One call captured by [`ScriptedChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExec {
    pub pod: String,
    pub container: String,
    pub command: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

/// [`ExecChannel`] double that replays queued responses and records calls.
#[derive(Default)]
pub struct ScriptedChannel {
    script: Mutex<VecDeque<ScriptedExec>>,
    calls: Mutex<Vec<RecordedExec>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, step: ScriptedExec) {
        self.script.lock().push_back(step);
    }

    pub fn calls(&self) -> Vec<RecordedExec> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ExecChannel for ScriptedChannel {
    async fn exec(
        &self,
        pod: &str,
        container: &str,
        command: &[String],
        stdin: Option<&[u8]>,
        stdout: &mut Vec<u8>,
        stderr: &mut Vec<u8>,
    ) -> Result<(), ExecError> {
        self.calls.lock().push(RecordedExec {
            pod: pod.to_string(),
            container: container.to_string(),
            command: command.to_vec(),
            stdin: stdin.map(<[u8]>::to_vec),
        });
        let step = self.script.lock().pop_front();
        let Some(step) = step else {
            return Err(ExecError::Stream("no scripted response left".to_string()));
        };
        stdout.extend_from_slice(step.stdout.as_bytes());
        stderr.extend_from_slice(step.stderr.as_bytes());
        if step.stall {
            tokio::time::sleep(Duration::from_secs(86_400)).await;
        }
        step.result
    }
}

// ── Resource lister double ──────────────────────────────────────────────

/// [`ResourceLister`] double with per-kind groups and per-selector pods.
///
/// Unscripted kinds and selectors list as empty rather than failing, so
/// tests only configure what they exercise.
#[derive(Default)]
pub struct ScriptedLister {
    groups: Mutex<HashMap<GroupKind, Result<Vec<ReplicaGroup>, ListError>>>,
    pods: Mutex<HashMap<Option<String>, Result<Vec<PodSummary>, ListError>>>,
}

impl ScriptedLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groups(self, kind: GroupKind, groups: Vec<ReplicaGroup>) -> Self {
        self.groups.lock().insert(kind, Ok(groups));
        self
    }

    pub fn with_groups_error(self, kind: GroupKind, message: &str) -> Self {
        self.groups
            .lock()
            .insert(kind, Err(ListError::Groups { kind, message: message.to_string() }));
        self
    }

    pub fn with_pods(self, selector: Option<&str>, pods: Vec<PodSummary>) -> Self {
        self.pods.lock().insert(selector.map(str::to_string), Ok(pods));
        self
    }

    pub fn with_pods_error(self, selector: Option<&str>, message: &str) -> Self {
        self.pods
            .lock()
            .insert(selector.map(str::to_string), Err(ListError::Pods { message: message.to_string() }));
        self
    }
}

#[async_trait]
impl ResourceLister for ScriptedLister {
    async fn replica_groups(&self, kind: GroupKind) -> Result<Vec<ReplicaGroup>, ListError> {
        self.groups.lock().get(&kind).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn pods(&self, selector: Option<&str>) -> Result<Vec<PodSummary>, ListError> {
        self.pods
            .lock()
            .get(&selector.map(str::to_string))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ── Object builders ─────────────────────────────────────────────────────

/// Pod with a single `app` container running a placeholder image.
pub fn pod(name: &str) -> PodSummary {
    pod_with_images(name, &["registry.local/app:latest"])
}

/// Pod with one container per image, named `c0`, `c1`, ...
pub fn pod_with_images(name: &str, images: &[&str]) -> PodSummary {
    PodSummary {
        name: name.to_string(),
        containers: images
            .iter()
            .enumerate()
            .map(|(i, image)| ContainerSpec { name: format!("c{}", i), image: image.to_string() })
            .collect(),
    }
}

/// Replica group with the given match labels.
pub fn group(name: &str, labels: &[(&str, &str)]) -> ReplicaGroup {
    ReplicaGroup {
        name: name.to_string(),
        match_labels: labels
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}
