//! Node utilization score plugins.
//!
//! All three plugins look at how full a node's tracked resources would be
//! with the pod placed on it and differ only in how they turn those
//! fractions into a score:
//!
//! - `BalancedNodeUtilization`: favors nodes whose dimensions end up evenly used
//! - `HighNodeUtilization`: favors the fullest nodes (bin-packing)
//! - `LowNodeUtilization`: favors the emptiest nodes (spreading)

mod balanced;
pub mod fraction;
mod high;
mod low;
#[cfg(test)]
mod tests_common;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::models::{Pod, ResourceList, ResourceName};

use crate::error::{FrameworkError, FrameworkResult, ScoreError};
use crate::framework::{CycleState, Handle, SnapshotLister, StateKey};

pub use balanced::BalancedNodeUtilization;
pub use fraction::{ResourceFraction, ResourceFractions, compute_fractions};
pub use high::HighNodeUtilization;
pub use low::LowNodeUtilization;

/// Cycle state kind under which a pod's effective requests are memoized.
/// Shared by every plugin in this module.
pub const POD_REQUESTS_KIND: &str = "nodeutilization/pod-requests";

/// Effective requests of the pod being scheduled, or the dimension that
/// overflowed while summing them.
pub type PodRequests = Result<Arc<ResourceList>, ResourceName>;

/// A tracked resource dimension and its weight in the average.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceSpec {
    pub name: ResourceName,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl ResourceSpec {
    pub fn new(name: ResourceName, weight: u32) -> Self {
        Self { name, weight }
    }
}

/// Args accepted by every node utilization plugin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeUtilizationArgs {
    pub resources: Vec<ResourceSpec>,
}

impl Default for NodeUtilizationArgs {
    fn default() -> Self {
        Self {
            resources: vec![
                ResourceSpec::new(ResourceName::cpu(), 1),
                ResourceSpec::new(ResourceName::memory(), 1),
            ],
        }
    }
}

impl NodeUtilizationArgs {
    /// Decodes and validates plugin args. Missing args mean defaults.
    pub fn decode(plugin: &str, args: Option<&serde_json::Value>) -> FrameworkResult<Self> {
        let invalid = |reason: String| FrameworkError::InvalidArgs {
            plugin: plugin.to_string(),
            reason,
        };

        let decoded = match args {
            None | Some(serde_json::Value::Null) => Self::default(),
            Some(value) => Self::deserialize(value).map_err(|e| invalid(e.to_string()))?,
        };
        decoded.validate().map_err(invalid)?;
        Ok(decoded)
    }

    fn validate(&self) -> Result<(), String> {
        if self.resources.is_empty() {
            return Err("at least one resource must be tracked".to_string());
        }
        let mut seen = HashSet::new();
        for spec in &self.resources {
            if spec.weight == 0 {
                return Err(format!("resource {} has weight 0", spec.name));
            }
            if !seen.insert(&spec.name) {
                return Err(format!("resource {} is listed twice", spec.name));
            }
        }
        Ok(())
    }
}

/// Common lookup and fraction computation behind the three plugins.
#[derive(Debug, Clone)]
pub(crate) struct UtilizationScorer {
    handle: Handle,
    args: Arc<NodeUtilizationArgs>,
}

impl UtilizationScorer {
    pub(crate) fn new(handle: Handle, args: NodeUtilizationArgs) -> Self {
        Self {
            handle,
            args: Arc::new(args),
        }
    }

    pub(crate) fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Fractions of `node_name`'s tracked resources once `pod` is added.
    pub(crate) fn fractions(
        &self,
        state: &CycleState,
        pod: &Pod,
        node_name: &str,
    ) -> Result<ResourceFractions, ScoreError> {
        let node_info = self
            .handle
            .node_info(node_name)
            .ok_or_else(|| ScoreError::NodeNotFound(node_name.to_string()))?;

        let pod_requests = pod_requests(state, pod)?;

        Ok(compute_fractions(
            node_info.allocatable(),
            &node_info.requested,
            &pod_requests,
            &self.args.resources,
        ))
    }
}

/// Effective requests of `pod`, computed once per cycle and shared by every
/// plugin and node that asks for them.
pub fn pod_requests(state: &CycleState, pod: &Pod) -> Result<Arc<ResourceList>, ScoreError> {
    let key = StateKey::new(pod.metadata.id, POD_REQUESTS_KIND);
    let requests = state.get_or_compute::<PodRequests, _>(key, || {
        pod.effective_requests().map(Arc::new)
    })?;

    match requests.as_ref() {
        Ok(list) => Ok(Arc::clone(list)),
        Err(resource) => Err(ScoreError::PodRequests {
            pod: pod.metadata.name.clone(),
            resource: resource.clone(),
        }),
    }
}
