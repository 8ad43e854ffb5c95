pub mod metadata;
pub mod node;
pub mod pod;
pub mod resources;

pub use metadata::Metadata;
pub use node::{Node, NodeStatus};
pub use pod::{ContainerSpec, Pod, PodPhase, PodSpec, PodStatus, ResourceRequirements};
pub use resources::{ResourceList, ResourceName};
