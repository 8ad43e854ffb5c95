use std::sync::Arc;

use shared::models::Pod;

use crate::error::FrameworkResult;
use crate::framework::{CycleState, Handle, ScorePlugin, Status};

use super::high::HighNodeUtilization;
use super::{NodeUtilizationArgs, UtilizationScorer};

/// Favors nodes with the fewest requested resources, spreading pods to keep
/// headroom on every node.
///
/// Always the exact mirror of `HighNodeUtilization` for the same inputs.
#[derive(Debug)]
pub struct LowNodeUtilization {
    scorer: UtilizationScorer,
}

impl LowNodeUtilization {
    pub const NAME: &'static str = "LowNodeUtilization";

    pub fn new(handle: Handle, args: NodeUtilizationArgs) -> Self {
        Self {
            scorer: UtilizationScorer::new(handle, args),
        }
    }

    pub fn factory(
        args: Option<&serde_json::Value>,
        handle: Handle,
    ) -> FrameworkResult<Arc<dyn ScorePlugin>> {
        let args = NodeUtilizationArgs::decode(Self::NAME, args)?;
        Ok(Arc::new(Self::new(handle, args)))
    }
}

impl ScorePlugin for LowNodeUtilization {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn score(&self, state: &CycleState, pod: &Pod, node_name: &str) -> (i64, Status) {
        // mirror the rounded high score so the two always sum to min + max
        let range = self.scorer.handle().score_range();
        let result = HighNodeUtilization::try_score(&self.scorer, state, pod, node_name)
            .map(|high| range.complement(high));
        if let Ok(score) = result {
            tracing::debug!(plugin = Self::NAME, node=%node_name, score, "Scored node");
        }
        Status::score_result(result)
    }
}
