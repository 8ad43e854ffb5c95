use std::sync::Arc;

use shared::models::Pod;

use crate::error::{FrameworkResult, ScoreError};
use crate::framework::{CycleState, Handle, ScorePlugin, Status};

use super::{NodeUtilizationArgs, UtilizationScorer};

/// Favors nodes with the most requested resources, packing pods tightly so
/// other nodes can stay empty or scale down.
#[derive(Debug)]
pub struct HighNodeUtilization {
    scorer: UtilizationScorer,
}

impl HighNodeUtilization {
    pub const NAME: &'static str = "HighNodeUtilization";

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

    pub(super) fn try_score(
        scorer: &UtilizationScorer,
        state: &CycleState,
        pod: &Pod,
        node_name: &str,
    ) -> Result<i64, ScoreError> {
        let fractions = scorer.fractions(state, pod, node_name)?;
        Ok(scorer
            .handle()
            .score_range()
            .scale(fractions.weighted_average()))
    }
}

impl ScorePlugin for HighNodeUtilization {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn score(&self, state: &CycleState, pod: &Pod, node_name: &str) -> (i64, Status) {
        let result = Self::try_score(&self.scorer, state, pod, node_name);
        if let Ok(score) = result {
            tracing::debug!(plugin = Self::NAME, node=%node_name, score, "Scored node");
        }
        Status::score_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::nodeutilization::tests_common::{handle_with_node, pod, resources};

    fn score(alloc: (u64, u64), existing: (u64, u64), request: (u64, u64)) -> i64 {
        let handle = handle_with_node(resources(alloc.0, alloc.1), resources(existing.0, existing.1));
        let plugin = HighNodeUtilization::new(handle, NodeUtilizationArgs::default());
        let (score, status) = plugin.score(&CycleState::new(), &pod(request.0, request.1), "n1");
        assert!(status.is_success(), "{status}");
        score
    }

    #[test]
    fn average_utilization_scales_score() {
        assert_eq!(score((100, 100), (20, 20), (30, 30)), 50);
        assert_eq!(score((100, 100), (20, 20), (70, 10)), 60);
    }

    #[test]
    fn overcommit_clamps_to_full() {
        assert_eq!(score((10, 10), (8, 2), (5, 1)), 65);
    }

    #[test]
    fn bounds() {
        assert_eq!(score((100, 100), (0, 0), (0, 0)), 0);
        assert_eq!(score((100, 100), (50, 50), (50, 50)), 100);
    }
}
