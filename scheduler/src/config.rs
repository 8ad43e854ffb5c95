use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{FrameworkError, FrameworkResult};
use crate::framework::{MAX_SCORE_BOUND, ScoreRange};
use crate::plugins::nodeutilization::{
    BalancedNodeUtilization, HighNodeUtilization, LowNodeUtilization,
};

/// Score plugins to run and the range they all score into.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    pub score_range: ScoreRange,
    pub plugins: Vec<PluginConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PluginConfig {
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: i64,
    /// Plugin specific args, decoded by the plugin's factory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<serde_json::Value>,
}

/// Upper bound for a plugin weight.
pub const MAX_PLUGIN_WEIGHT: i64 = 1_000;

fn default_weight() -> i64 {
    1
}

impl PluginConfig {
    pub fn new(name: &str, weight: i64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            args: None,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            score_range: ScoreRange::default(),
            plugins: vec![
                PluginConfig::new(BalancedNodeUtilization::NAME, 1),
                PluginConfig::new(HighNodeUtilization::NAME, 1),
                PluginConfig::new(LowNodeUtilization::NAME, 1),
            ],
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> FrameworkResult<()> {
        let invalid = |msg: String| Err(FrameworkError::InvalidConfig(msg));

        if self.score_range.min >= self.score_range.max {
            return invalid(format!(
                "score range [{}, {}] is empty",
                self.score_range.min, self.score_range.max
            ));
        }
        if self.score_range.min < 0 {
            return invalid(format!("score range min {} is negative", self.score_range.min));
        }
        if self.score_range.max > MAX_SCORE_BOUND {
            return invalid(format!(
                "score range max {} exceeds {}",
                self.score_range.max, MAX_SCORE_BOUND
            ));
        }

        let mut seen = HashSet::new();
        for plugin in &self.plugins {
            if plugin.weight <= 0 || plugin.weight > MAX_PLUGIN_WEIGHT {
                return invalid(format!(
                    "plugin {:?} has weight {}, expected 1..={}",
                    plugin.name, plugin.weight, MAX_PLUGIN_WEIGHT
                ));
            }
            if !seen.insert(plugin.name.as_str()) {
                return invalid(format!("plugin {:?} is enabled twice", plugin.name));
            }
        }
        Ok(())
    }
}
