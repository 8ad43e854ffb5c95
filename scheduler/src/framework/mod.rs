//! Score extension point of the scheduling framework.
//!
//! A score plugin ranks every feasible node for a pod. The runner calls
//! `ScorePlugin::score` once per (pod, node) pair, possibly from many tasks
//! at once, then lets plugins with `ScoreExtensions` rescale the whole list.

pub mod cycle_state;
pub mod registry;
pub mod runtime;
pub mod snapshot;
pub mod status;

use serde::{Deserialize, Serialize};
use shared::models::Pod;

pub use cycle_state::{CycleState, StateKey};
pub use registry::{PluginFactory, Registry};
pub use runtime::{Framework, ScoreResult};
pub use snapshot::{Handle, NodeInfo, Snapshot, SnapshotLister};
pub use status::{Code, Status};

pub const MIN_NODE_SCORE: i64 = 0;
pub const MAX_NODE_SCORE: i64 = 100;

/// Largest upper bound a configured score range may have. Keeps the span
/// exact in an f64 and weighted totals far from overflow.
pub const MAX_SCORE_BOUND: i64 = 1_000_000;

/// Closed range every plugin of one framework scores into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: MIN_NODE_SCORE,
            max: MAX_NODE_SCORE,
        }
    }
}

impl ScoreRange {
    pub fn contains(&self, score: i64) -> bool {
        (self.min..=self.max).contains(&score)
    }

    /// Maps a ratio in [0, 1] onto the range, rounding to the nearest
    /// integer. Ratios outside [0, 1] are clamped first. The result never
    /// leaves the range, even for ranges wider than `MAX_SCORE_BOUND`.
    pub fn scale(&self, ratio: f64) -> i64 {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        let span = self.max.saturating_sub(self.min).max(0) as f64;
        let offset = (ratio * span).round() as i64;
        self.bound(self.min.saturating_add(offset))
    }

    /// Mirror image of `score` inside the range.
    pub fn complement(&self, score: i64) -> i64 {
        self.bound(self.max.saturating_sub(score.saturating_sub(self.min)))
    }

    // not `i64::clamp`, which panics on an inverted range
    fn bound(&self, score: i64) -> i64 {
        score.max(self.min).min(self.max)
    }
}

/// Score of one node for one plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeScore {
    pub name: String,
    pub score: i64,
}

pub type NodeScoreList = Vec<NodeScore>;

/// A plugin that ranks nodes for a pod.
pub trait ScorePlugin: Send + Sync {
    /// Unique name, used in configuration and logs.
    fn name(&self) -> &str;

    /// Scores `node_name` for `pod`. Must not block and must be safe to call
    /// concurrently for different nodes of the same cycle.
    fn score(&self, state: &CycleState, pod: &Pod, node_name: &str) -> (i64, Status);

    /// Normalization hook run once after every node was scored. `None` means
    /// scores are used as returned.
    fn score_extensions(&self) -> Option<&dyn ScoreExtensions> {
        None
    }
}

pub trait ScoreExtensions: Send + Sync {
    /// Rescales `scores` in place. Every score must end up inside the
    /// framework's score range.
    fn normalize_score(&self, state: &CycleState, pod: &Pod, scores: &mut NodeScoreList) -> Status;
}

/// Rescales `scores` so the highest becomes `max_score`, keeping ratios.
/// With `reverse`, each result `s` is replaced by `max_score - s`, turning a
/// "lower is better" raw score into a "higher is better" one.
pub fn default_normalize_score(max_score: i64, reverse: bool, scores: &mut NodeScoreList) {
    let highest = scores.iter().map(|s| s.score).max().unwrap_or(0);

    if highest == 0 {
        if reverse {
            for s in scores.iter_mut() {
                s.score = max_score;
            }
        }
        return;
    }

    for s in scores.iter_mut() {
        let mut score = max_score * s.score / highest;
        if reverse {
            score = max_score - score;
        }
        s.score = score;
    }
}
