use shared::models::{ContainerSpec, Node, Pod, ResourceList};

use crate::framework::{Handle, ScoreRange, Snapshot};

pub fn resources(cpu: u64, mem: u64) -> ResourceList {
    ResourceList::new().with("cpu", cpu).with("memory", mem)
}

pub fn pod(cpu: u64, mem: u64) -> Pod {
    Pod::new("candidate", vec![ContainerSpec::with_requests("app", resources(cpu, mem))])
}

/// Handle over a single node `n1` already holding `existing`.
pub fn handle_with_node(allocatable: ResourceList, existing: ResourceList) -> Handle {
    handle_with_node_in(ScoreRange::default(), allocatable, existing)
}

pub fn handle_with_node_in(range: ScoreRange, allocatable: ResourceList, existing: ResourceList) -> Handle {
    let mut placed = Pod::new("placed", vec![ContainerSpec::with_requests("app", existing)]);
    placed.spec.node_name = "n1".to_string();
    let snapshot = Snapshot::new(vec![Node::new("n1", allocatable)], &[placed]);
    Handle::new(snapshot, range)
}
