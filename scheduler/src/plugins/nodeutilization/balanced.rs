use std::sync::Arc;

use shared::models::Pod;

use crate::error::{FrameworkResult, ScoreError};
use crate::framework::{CycleState, Handle, ScorePlugin, Status};

use super::{NodeUtilizationArgs, UtilizationScorer};

/// Prioritizes nodes whose tracked resources would be used evenly after
/// placement. A node with CPU nearly full but idle memory scores low.
#[derive(Debug)]
pub struct BalancedNodeUtilization {
    scorer: UtilizationScorer,
}

impl BalancedNodeUtilization {
    pub const NAME: &'static str = "BalancedNodeUtilization";

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

    fn try_score(&self, state: &CycleState, pod: &Pod, node_name: &str) -> Result<i64, ScoreError> {
        let fractions = self.scorer.fractions(state, pod, node_name)?;
        let spread = fractions.spread();
        let score = self.scorer.handle().score_range().scale(1.0 - spread);

        tracing::debug!(plugin = Self::NAME, node=%node_name, spread, score, "Scored node");
        Ok(score)
    }
}

impl ScorePlugin for BalancedNodeUtilization {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn score(&self, state: &CycleState, pod: &Pod, node_name: &str) -> (i64, Status) {
        Status::score_result(self.try_score(state, pod, node_name))
    }
}
