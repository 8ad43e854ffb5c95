#![allow(dead_code)]

use std::sync::Arc;

use scheduler::framework::{Handle, ScoreRange, Snapshot};
use scheduler::plugins::nodeutilization::{
    BalancedNodeUtilization, HighNodeUtilization, LowNodeUtilization, NodeUtilizationArgs,
};
use scheduler::ScorePlugin;
use shared::models::{ContainerSpec, Node, Pod, ResourceList};

pub const NODE: &str = "node-1";

pub fn resources(cpu: u64, mem: u64) -> ResourceList {
    ResourceList::new().with("cpu", cpu).with("memory", mem)
}

pub fn pod(name: &str, cpu: u64, mem: u64) -> Pod {
    Pod::new(name, vec![ContainerSpec::with_requests("app", resources(cpu, mem))])
}

pub fn bound_pod(node: &str, cpu: u64, mem: u64) -> Pod {
    let mut pod = pod("placed", cpu, mem);
    pod.spec.node_name = node.to_string();
    pod
}

/// Snapshot with one node `NODE` holding `existing` out of `allocatable`.
pub fn single_node(allocatable: (u64, u64), existing: (u64, u64)) -> Snapshot {
    Snapshot::new(
        vec![Node::new(NODE, resources(allocatable.0, allocatable.1))],
        &[bound_pod(NODE, existing.0, existing.1)],
    )
}

/// The three node utilization plugins, in balanced, high, low order.
pub fn plugins(snapshot: Snapshot) -> Vec<Arc<dyn ScorePlugin>> {
    plugins_in(snapshot, ScoreRange::default())
}

/// Same as `plugins`, scoring into `range`.
pub fn plugins_in(snapshot: Snapshot, range: ScoreRange) -> Vec<Arc<dyn ScorePlugin>> {
    let handle = Handle::new(snapshot, range);
    vec![
        Arc::new(BalancedNodeUtilization::new(handle.clone(), NodeUtilizationArgs::default())),
        Arc::new(HighNodeUtilization::new(handle.clone(), NodeUtilizationArgs::default())),
        Arc::new(LowNodeUtilization::new(handle, NodeUtilizationArgs::default())),
    ]
}
