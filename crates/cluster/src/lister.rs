// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource lister boundary.
//!
//! The deduplication logic only needs two capabilities from the cluster:
//! the replica groups of a given kind with their declared match labels,
//! and the pods matching an optional label selector. [`KubeLister`] backs
//! both with namespaced list calls.

use crate::error::ListError;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};
use kube::Client;
use std::collections::BTreeMap;
use std::fmt;

/// The three replica-controller kinds in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Stateless replica groups.
    Deployment,
    /// Ordered, stateful replica groups.
    StatefulSet,
    /// Per-node replica groups.
    DaemonSet,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Deployment => write!(f, "deployment"),
            GroupKind::StatefulSet => write!(f, "statefulset"),
            GroupKind::DaemonSet => write!(f, "daemonset"),
        }
    }
}

/// A replica group: its name and the label equalities its members carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaGroup {
    pub name: String,
    pub match_labels: BTreeMap<String, String>,
}

/// One runnable container declared by a pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
}

/// The pod facts the core consumes: name plus declared containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub containers: Vec<ContainerSpec>,
}

/// Namespace-scoped resource listing.
#[async_trait]
pub trait ResourceLister: Send + Sync {
    /// All replica groups of `kind` in the namespace.
    async fn replica_groups(&self, kind: GroupKind) -> Result<Vec<ReplicaGroup>, ListError>;

    /// All pods matching `selector`, or every pod when `None`.
    async fn pods(&self, selector: Option<&str>) -> Result<Vec<PodSummary>, ListError>;
}

/// Resource lister backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeLister {
    client: Client,
    namespace: String,
}

impl KubeLister {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self { client, namespace: namespace.to_string() }
    }
}

#[async_trait]
impl ResourceLister for KubeLister {
    async fn replica_groups(&self, kind: GroupKind) -> Result<Vec<ReplicaGroup>, ListError> {
        let lp = ListParams::default();
        let map_err =
            |e: kube::Error| ListError::Groups { kind, message: e.to_string() };
        let groups = match kind {
            GroupKind::Deployment => {
                let api: Api<Deployment> = Api::namespaced(self.client.clone(), &self.namespace);
                let list = api.list(&lp).await.map_err(map_err)?;
                list.items
                    .into_iter()
                    .map(|d| ReplicaGroup {
                        name: d.metadata.name.unwrap_or_default(),
                        match_labels: d
                            .spec
                            .and_then(|s| s.selector.match_labels)
                            .unwrap_or_default(),
                    })
                    .collect()
            }
            GroupKind::StatefulSet => {
                let api: Api<StatefulSet> = Api::namespaced(self.client.clone(), &self.namespace);
                let list = api.list(&lp).await.map_err(map_err)?;
                list.items
                    .into_iter()
                    .map(|s| ReplicaGroup {
                        name: s.metadata.name.unwrap_or_default(),
                        match_labels: s
                            .spec
                            .and_then(|s| s.selector.match_labels)
                            .unwrap_or_default(),
                    })
                    .collect()
            }
            GroupKind::DaemonSet => {
                let api: Api<DaemonSet> = Api::namespaced(self.client.clone(), &self.namespace);
                let list = api.list(&lp).await.map_err(map_err)?;
                list.items
                    .into_iter()
                    .map(|d| ReplicaGroup {
                        name: d.metadata.name.unwrap_or_default(),
                        match_labels: d
                            .spec
                            .and_then(|s| s.selector.match_labels)
                            .unwrap_or_default(),
                    })
                    .collect()
            }
        };
        Ok(groups)
    }

    async fn pods(&self, selector: Option<&str>) -> Result<Vec<PodSummary>, ListError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        let mut lp = ListParams::default();
        if let Some(selector) = selector {
            lp = lp.labels(selector);
        }
        let list = api
            .list(&lp)
            .await
            .map_err(|e| ListError::Pods { message: e.to_string() })?;
        Ok(list
            .items
            .into_iter()
            .map(|pod| PodSummary {
                name: pod.metadata.name.unwrap_or_default(),
                containers: pod
                    .spec
                    .map(|spec| {
                        spec.containers
                            .into_iter()
                            .map(|c| ContainerSpec {
                                name: c.name,
                                image: c.image.unwrap_or_default(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect())
    }
}
