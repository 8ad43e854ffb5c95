use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::resources::ResourceList;

/// Represents a node in the cluster.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Node {
    pub id: Uuid,
    pub name: String,
    pub status: NodeStatus,
    pub addr: String,
    /// Capacity offered to pods, after system reservations.
    pub allocatable: ResourceList,
    pub started_at: DateTime<Utc>,
    pub last_heartbeat: DateTime<Utc>,
}

/// Status of a node in the cluster.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum NodeStatus {
    Ready,
    Running,
    Stopped,
}

impl Node {
    pub fn new(name: &str, allocatable: ResourceList) -> Self {
        Self {
            name: name.to_string(),
            allocatable,
            ..Default::default()
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        Node {
            id,
            name: format!("node-{}", id.simple()),
            status: NodeStatus::Ready,
            addr: String::new(),
            allocatable: ResourceList::new(),
            started_at: now,
            last_heartbeat: now,
        }
    }
}
