use std::borrow::Cow;

use chrono::Utc;
use tabled::Tabled;

use crate::models::{Node, NodeStatus, Pod, PodPhase, ResourceList, ResourceName};

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeStatus::Ready => write!(f, "Ready"),
            NodeStatus::Running => write!(f, "Running"),
            NodeStatus::Stopped => write!(f, "Stopped"),
        }
    }
}

impl std::fmt::Display for PodPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PodPhase::Pending => write!(f, "Pending"),
            PodPhase::Running => write!(f, "Running"),
            PodPhase::Failed => write!(f, "Failed"),
            PodPhase::Succeeded => write!(f, "Succeeded"),
            PodPhase::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Tabled for Node {
    const LENGTH: usize = 5;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Owned(self.status.to_string()),
            Cow::Owned(cpu(&self.allocatable)),
            Cow::Owned(memory(&self.allocatable)),
            Cow::Owned(human_duration(
                Utc::now()
                    .signed_duration_since(self.started_at)
                    .to_std()
                    .unwrap_or_default(),
            )),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            Cow::Borrowed("NAME"),
            Cow::Borrowed("STATUS"),
            Cow::Borrowed("CPU"),
            Cow::Borrowed("MEMORY"),
            Cow::Borrowed("AGE"),
        ]
    }
}

impl Tabled for Pod {
    const LENGTH: usize = 5;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        // unresolvable requests show as zero, scoring reports the overflow
        let requests = self.effective_requests().unwrap_or_default();
        let node = if self.is_bound() {
            Cow::Borrowed(self.spec.node_name.as_str())
        } else {
            Cow::Borrowed("<none>")
        };
        vec![
            Cow::Borrowed(self.metadata.name.as_str()),
            node,
            Cow::Owned(self.status.phase.to_string()),
            Cow::Owned(cpu(&requests)),
            Cow::Owned(memory(&requests)),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            Cow::Borrowed("NAME"),
            Cow::Borrowed("NODE"),
            Cow::Borrowed("PHASE"),
            Cow::Borrowed("CPU"),
            Cow::Borrowed("MEMORY"),
        ]
    }
}

fn cpu(list: &ResourceList) -> String {
    format!("{}m", list.get(&ResourceName::cpu()))
}

fn memory(list: &ResourceList) -> String {
    human_bytes(list.get(&ResourceName::memory()))
}

pub fn human_bytes(bytes: u64) -> String {
    const KI: u64 = 1024;
    match bytes {
        b if b >= KI * KI * KI => format!("{}Gi", b / (KI * KI * KI)),
        b if b >= KI * KI => format!("{}Mi", b / (KI * KI)),
        b if b >= KI => format!("{}Ki", b / KI),
        b => b.to_string(),
    }
}

fn human_duration(dur: std::time::Duration) -> String {
    let secs = dur.as_secs();
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m", secs / 60),
        3600..=86399 => format!("{}h", secs / 3600),
        _ => format!("{}d", secs / 86400),
    }
}
