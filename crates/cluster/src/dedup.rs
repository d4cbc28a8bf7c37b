// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compute-unit deduplication across replica groups.
//!
//! Many replicas of one group share an identical pod template, so commands
//! only need to reach one representative per group. [`Inventory`] reduces
//! a namespace to that representative set: one pod per replica group with
//! members, plus every pod owned by no group at all.
//!
//! Results are a fresh snapshot per call — group membership may be stale
//! relative to in-flight cluster mutation, which is tolerated rather than
//! corrected.

use crate::error::ListError;
use crate::lister::{GroupKind, PodSummary, ResourceLister};
use crate::selector::label_selector;
use std::collections::HashMap;
use std::sync::Arc;

const GROUP_KINDS: [GroupKind; 3] =
    [GroupKind::Deployment, GroupKind::StatefulSet, GroupKind::DaemonSet];

/// A replica group whose member listing failed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGroup {
    pub kind: GroupKind,
    pub group: String,
    pub error: String,
}

/// Result of [`Inventory::unique_pods`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniquePods {
    /// Ground-truth pod count for the whole namespace.
    pub total: usize,
    /// One representative per matching group, then the ungrouped remainder.
    pub pods: Vec<PodSummary>,
    /// Groups whose member listing failed mid-scan.
    pub skipped: Vec<SkippedGroup>,
}

/// Result of [`Inventory::unique_images`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueImages {
    /// Declared containers across all pods in the namespace.
    pub containers: usize,
    /// Distinct image references, first-seen order.
    pub images: Vec<String>,
}

/// Namespace inventory built on the [`ResourceLister`] collaborator.
#[derive(Clone)]
pub struct Inventory {
    lister: Arc<dyn ResourceLister>,
}

impl Inventory {
    pub fn new(lister: Arc<dyn ResourceLister>) -> Self {
        Self { lister }
    }

    /// Reduce the namespace to one representative pod per replica group
    /// plus the ungrouped remainder.
    ///
    /// For each group kind, every group's declared match labels become a
    /// selector; the first matching pod joins the representative list and
    /// all matches are recorded as grouped. A group with zero matches
    /// contributes nothing. A single group's member-listing failure is
    /// recorded in `skipped` and the scan continues; a failure enumerating
    /// the groups themselves or the final ground-truth listing aborts the
    /// whole call.
    ///
    /// Known limitation: when two groups' selectors overlap, each group
    /// still contributes its own representative, so the list can repeat a
    /// pod. Grouping is also a snapshot — a selector that matches nothing
    /// at scan time leaves that group's pods counted as standalone.
    pub async fn unique_pods(&self) -> Result<UniquePods, ListError> {
        let mut representatives: Vec<PodSummary> = Vec::new();
        let mut skipped: Vec<SkippedGroup> = Vec::new();
        let mut membership: HashMap<GroupKind, HashMap<String, usize>> = HashMap::new();

        for kind in GROUP_KINDS {
            let groups = self.lister.replica_groups(kind).await?;
            let grouped = membership.entry(kind).or_default();
            for group in groups {
                let selector = label_selector(&group.match_labels);
                let pods = match self.lister.pods(Some(&selector)).await {
                    Ok(pods) => pods,
                    Err(err) => {
                        tracing::warn!(
                            %kind,
                            group = %group.name,
                            error = %err,
                            "skipping group: member listing failed"
                        );
                        skipped.push(SkippedGroup {
                            kind,
                            group: group.name,
                            error: err.to_string(),
                        });
                        continue;
                    }
                };
                if let Some(first) = pods.first() {
                    representatives.push(first.clone());
                }
                for pod in &pods {
                    *grouped.entry(pod.name.clone()).or_insert(0) += 1;
                }
            }
        }

        let all = self.lister.pods(None).await?;
        let total = all.len();
        for pod in all {
            if membership.values().any(|grouped| grouped.contains_key(&pod.name)) {
                continue;
            }
            representatives.push(pod);
        }

        Ok(UniquePods { total, pods: representatives, skipped })
    }

    /// Walk every pod's declared container images directly — no grouping.
    pub async fn unique_images(&self) -> Result<UniqueImages, ListError> {
        let all = self.lister.pods(None).await?;
        let mut images: Vec<String> = Vec::new();
        let mut containers = 0;
        for pod in &all {
            containers += pod.containers.len();
            for container in &pod.containers {
                if !images.contains(&container.image) {
                    images.push(container.image.clone());
                }
            }
        }
        Ok(UniqueImages { containers, images })
    }
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
