use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use shared::models::{Node, Pod};

/// Cluster state read from a YAML file instead of the apiserver.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClusterFile {
    pub nodes: Vec<Node>,
    pub pods: Vec<Pod>,
}

impl ClusterFile {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read cluster file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse cluster file {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn pending_pod(&self, name: &str) -> anyhow::Result<&Pod> {
        let pod = self
            .pods
            .iter()
            .find(|p| p.metadata.name == name)
            .with_context(|| format!("pod {:?} not found in cluster file", name))?;
        if pod.is_bound() {
            anyhow::bail!("pod {:?} is already bound to {:?}", name, pod.spec.node_name);
        }
        Ok(pod)
    }
}
