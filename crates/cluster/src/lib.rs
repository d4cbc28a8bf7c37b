// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kx-cluster: cluster-facing half of the kx remote-execution toolkit.
//!
//! # Module layout
//!
//! - [`channel`] — remote exec stream boundary and its kube-backed impl
//! - [`exec`] — streaming execution gateway with deadline/cancellation
//! - [`throttle`] — token-bucket dispatch limiter
//! - [`lister`] — resource listing boundary and its kube-backed impl
//! - [`selector`] — label-selector expression building
//! - [`dedup`] — one-representative-per-group pod deduplication
//! - [`probe`] — file reads/checks tolerating missing utilities
//!
//! The typical flow: [`dedup::Inventory`] reduces a namespace to the pods
//! worth targeting, then — optionally gated by [`throttle::TokenBucket`] —
//! commands go through [`exec::Executor`] (directly, or via
//! [`probe::FileProbe`] for file-oriented tasks), yielding one
//! `ExecutionOutcome` per invocation.

pub mod channel;
pub mod dedup;
pub mod error;
pub mod exec;
pub mod lister;
pub mod probe;
pub mod selector;
pub mod throttle;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use channel::{ExecChannel, KubeChannel};
pub use dedup::{Inventory, SkippedGroup, UniqueImages, UniquePods};
pub use error::{ExecError, ListError, ProbeError};
pub use exec::Executor;
pub use lister::{ContainerSpec, GroupKind, KubeLister, PodSummary, ReplicaGroup, ResourceLister};
pub use probe::FileProbe;
pub use selector::label_selector;
pub use throttle::TokenBucket;
