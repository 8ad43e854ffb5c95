use std::collections::HashMap;
use std::sync::Arc;

use shared::models::{Node, Pod, ResourceList};

use super::ScoreRange;

/// A node together with the resources already claimed on it.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub node: Node,
    /// Sum of the effective requests of every pod bound to the node.
    pub requested: ResourceList,
}

impl NodeInfo {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            requested: ResourceList::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn allocatable(&self) -> &ResourceList {
        &self.node.allocatable
    }

    /// Accounts `pod` against this node.
    pub fn add_pod(&mut self, pod: &Pod) {
        match pod.effective_requests() {
            Ok(requests) => self.requested.add(&requests),
            Err(resource) => tracing::warn!(
                pod=%pod.metadata.name,
                node=%self.node.name,
                %resource,
                "Pod requests overflow, not accounted"
            ),
        }
    }
}

/// Read access to node state for one scheduling cycle.
pub trait SnapshotLister: Send + Sync {
    /// `None` when the node is not part of the snapshot.
    fn node_info(&self, name: &str) -> Option<Arc<NodeInfo>>;

    fn num_nodes(&self) -> usize;
}

/// Point-in-time view of every node, immutable once built.
#[derive(Debug, Default)]
pub struct Snapshot {
    node_infos: HashMap<String, Arc<NodeInfo>>,
}

impl Snapshot {
    /// Builds node infos from nodes and the pods currently bound to them.
    /// Pending pods are skipped. Pods bound to unknown nodes are dropped.
    pub fn new(nodes: Vec<Node>, pods: &[Pod]) -> Self {
        let mut infos: HashMap<String, NodeInfo> = nodes
            .into_iter()
            .map(|node| (node.name.clone(), NodeInfo::new(node)))
            .collect();

        for pod in pods.iter().filter(|p| p.is_bound()) {
            match infos.get_mut(&pod.spec.node_name) {
                Some(info) => info.add_pod(pod),
                None => tracing::warn!(
                    pod=%pod.metadata.name,
                    node=%pod.spec.node_name,
                    "Pod bound to unknown node"
                ),
            }
        }

        Self {
            node_infos: infos
                .into_iter()
                .map(|(name, info)| (name, Arc::new(info)))
                .collect(),
        }
    }

    /// Node names in a stable order.
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.node_infos.keys().cloned().collect();
        names.sort();
        names
    }
}

impl SnapshotLister for Snapshot {
    fn node_info(&self, name: &str) -> Option<Arc<NodeInfo>> {
        self.node_infos.get(name).cloned()
    }

    fn num_nodes(&self) -> usize {
        self.node_infos.len()
    }
}

/// Framework handle given to every plugin at construction.
///
/// Pins one snapshot and the score range all plugins share. Clones point at
/// the same snapshot, which never changes; the next cycle over new cluster
/// state gets a new handle.
#[derive(Debug, Clone)]
pub struct Handle {
    snapshot: Arc<Snapshot>,
    score_range: ScoreRange,
}

impl Handle {
    pub fn new(snapshot: Snapshot, score_range: ScoreRange) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            score_range,
        }
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    pub fn score_range(&self) -> ScoreRange {
        self.score_range
    }
}

impl SnapshotLister for Handle {
    fn node_info(&self, name: &str) -> Option<Arc<NodeInfo>> {
        self.snapshot().node_info(name)
    }

    fn num_nodes(&self) -> usize {
        self.snapshot().num_nodes()
    }
}
