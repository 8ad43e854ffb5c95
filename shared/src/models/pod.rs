use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::metadata::Metadata;
use crate::models::resources::{ResourceList, ResourceName};

// --- Core ---

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Pod {
    pub metadata: Metadata,
    pub spec: PodSpec,
    pub status: PodStatus,
}

/// Desired state
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PodSpec {
    /// Empty while the pod waits for placement.
    pub node_name: String,
    pub containers: Vec<ContainerSpec>,
    #[serde(alias = "initContainers")]
    pub init_containers: Vec<ContainerSpec>,
    /// Fixed runtime cost charged on top of the container requests.
    pub overhead: Option<ResourceList>,
}

/// Actual state
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PodStatus {
    pub phase: PodPhase,
    pub last_update: Option<DateTime<Utc>>,
    pub observed_generation: u16,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum PodPhase {
    Pending,
    Running,
    Unknown,
    Failed,
    Succeeded,
}

// --- Containers ---

/// Definition of a container within a Pod.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub resources: ResourceRequirements,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ResourceRequirements {
    pub requests: ResourceList,
}

// --- Impl ---

impl Pod {
    pub fn new(name: &str, containers: Vec<ContainerSpec>) -> Self {
        Pod {
            metadata: Metadata::named(name),
            spec: PodSpec {
                containers,
                ..Default::default()
            },
            status: PodStatus::default(),
        }
    }

    pub fn is_bound(&self) -> bool {
        !self.spec.node_name.is_empty()
    }

    /// Resources the pod holds once running.
    ///
    /// App containers run side by side and are summed. Init containers run one
    /// at a time before them, so only the largest init request per dimension
    /// matters. Overhead is added last. Returns the dimension that overflowed
    /// on failure.
    pub fn effective_requests(&self) -> Result<ResourceList, ResourceName> {
        let mut requests = ResourceList::new();
        for container in &self.spec.containers {
            requests.checked_add(&container.resources.requests)?;
        }
        for init in &self.spec.init_containers {
            requests.set_max(&init.resources.requests);
        }
        if let Some(overhead) = &self.spec.overhead {
            requests.checked_add(overhead)?;
        }
        Ok(requests)
    }
}

impl ContainerSpec {
    pub fn with_requests(name: &str, requests: ResourceList) -> Self {
        ContainerSpec {
            name: name.to_string(),
            resources: ResourceRequirements { requests },
            ..Default::default()
        }
    }
}

impl Default for PodStatus {
    fn default() -> Self {
        PodStatus {
            phase: PodPhase::Pending,
            last_update: None,
            observed_generation: 0,
        }
    }
}

impl Default for ContainerSpec {
    fn default() -> Self {
        ContainerSpec {
            name: "test-container".to_string(),
            image: "busybox:latest".to_string(),
            resources: ResourceRequirements::default(),
        }
    }
}

impl Default for PodSpec {
    fn default() -> Self {
        PodSpec {
            node_name: "".to_string(),
            containers: vec![ContainerSpec::default()],
            init_containers: Vec::new(),
            overhead: None,
        }
    }
}
