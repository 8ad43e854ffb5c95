use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use shared::models::Pod;
use tokio::task::JoinSet;

use crate::config::SchedulerConfig;
use crate::error::{FrameworkError, FrameworkResult};

use super::{
    CycleState, Handle, NodeScore, NodeScoreList, Registry, ScorePlugin, ScoreRange, Snapshot,
    Status,
};

struct WeightedPlugin {
    plugin: Arc<dyn ScorePlugin>,
    weight: i64,
}

/// Configured set of score plugins sharing one handle.
pub struct Framework {
    handle: Handle,
    plugins: Vec<WeightedPlugin>,
}

/// Scores of one cycle: the raw (or normalized) list of every plugin and
/// the weighted total per node, best first.
#[derive(Debug, Clone, Default)]
pub struct ScoreResult {
    pub plugin_scores: BTreeMap<String, NodeScoreList>,
    pub totals: NodeScoreList,
}

impl ScoreResult {
    /// Highest total, ties already broken by node name.
    pub fn best(&self) -> Option<&NodeScore> {
        self.totals.first()
    }

    pub fn plugin_score(&self, plugin: &str, node: &str) -> Option<i64> {
        self.plugin_scores
            .get(plugin)?
            .iter()
            .find(|s| s.name == node)
            .map(|s| s.score)
    }
}

impl Framework {
    /// Instantiates every plugin `config` enables, all sharing a handle over
    /// `snapshot` and the configured score range.
    ///
    /// The snapshot is fixed for the framework's lifetime. A new cluster
    /// state means a new framework.
    pub fn new(
        registry: &Registry,
        config: &SchedulerConfig,
        snapshot: Snapshot,
    ) -> FrameworkResult<Self> {
        config.validate()?;
        let handle = Handle::new(snapshot, config.score_range);

        let mut plugins = Vec::with_capacity(config.plugins.len());
        for plugin_config in &config.plugins {
            let plugin = registry.build(&plugin_config.name, plugin_config.args.as_ref(), handle.clone())?;
            tracing::debug!(plugin=%plugin_config.name, weight=plugin_config.weight, "Enabled score plugin");
            plugins.push(WeightedPlugin {
                plugin,
                weight: plugin_config.weight,
            });
        }

        Ok(Self { handle, plugins })
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn score_range(&self) -> ScoreRange {
        self.handle.score_range()
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.plugin.name()).collect()
    }

    /// Runs every score plugin on every node for one cycle.
    ///
    /// Each (plugin, node) pair is scored on its own task. A node whose
    /// status is an error is dropped from that plugin's list only. After all
    /// nodes are scored, plugins with score extensions normalize their list,
    /// then weighted totals are summed per node.
    pub async fn run_score_plugins(
        &self,
        state: Arc<CycleState>,
        pod: Arc<Pod>,
        nodes: &[String],
    ) -> FrameworkResult<ScoreResult> {
        let mut tasks = JoinSet::new();
        for (idx, weighted) in self.plugins.iter().enumerate() {
            for node in nodes {
                let plugin = weighted.plugin.clone();
                let state = state.clone();
                let pod = pod.clone();
                let node = node.clone();
                tasks.spawn(async move {
                    let (score, status) = plugin.score(&state, &pod, &node);
                    (idx, node, score, status)
                });
            }
        }

        let mut lists: Vec<NodeScoreList> = vec![Vec::with_capacity(nodes.len()); self.plugins.len()];
        while let Some(joined) = tasks.join_next().await {
            let (idx, node, score, status) = joined?;
            if let Err(message) = status.as_result() {
                tracing::warn!(
                    plugin=%self.plugins[idx].plugin.name(),
                    pod=%pod.metadata.name,
                    %node,
                    %message,
                    "Node not scored"
                );
                continue;
            }
            lists[idx].push(NodeScore { name: node, score });
        }

        let range = self.score_range();
        let mut totals: HashMap<String, i64> = HashMap::with_capacity(nodes.len());
        let mut plugin_scores = BTreeMap::new();

        for (weighted, mut list) in self.plugins.iter().zip(lists) {
            let name = weighted.plugin.name();
            list.sort_by(|a, b| a.name.cmp(&b.name));

            if let Some(extensions) = weighted.plugin.score_extensions() {
                let status: Status = extensions.normalize_score(&state, &pod, &mut list);
                status.as_result().map_err(|message| FrameworkError::Normalize {
                    plugin: name.to_string(),
                    message,
                })?;
            }

            for node_score in &list {
                if !range.contains(node_score.score) {
                    return Err(FrameworkError::ScoreOutOfRange {
                        plugin: name.to_string(),
                        node: node_score.name.clone(),
                        score: node_score.score,
                        min: range.min,
                        max: range.max,
                    });
                }
                accumulate(&mut totals, &node_score.name, node_score.score, weighted.weight)?;
            }
            plugin_scores.insert(name.to_string(), list);
        }

        let mut totals: NodeScoreList = totals
            .into_iter()
            .map(|(name, score)| NodeScore { name, score })
            .collect();
        totals.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));

        if let Some(best) = totals.first() {
            tracing::info!(pod=%pod.metadata.name, node=%best.name, score=best.score, "Scored nodes");
        }

        Ok(ScoreResult {
            plugin_scores,
            totals,
        })
    }
}

/// Adds `score * weight` to the running total of `node`.
fn accumulate(
    totals: &mut HashMap<String, i64>,
    node: &str,
    score: i64,
    weight: i64,
) -> FrameworkResult<()> {
    let total = totals.entry(node.to_string()).or_insert(0);
    let current = *total;
    *total = score
        .checked_mul(weight)
        .and_then(|weighted| current.checked_add(weighted))
        .ok_or_else(|| FrameworkError::TotalOverflow(node.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PluginConfig;
    use crate::framework::ScoreExtensions;
    use crate::plugins::nodeutilization::{HighNodeUtilization, LowNodeUtilization};
    use shared::models::{ContainerSpec, Node, ResourceList};

    fn resources(cpu: u64, mem: u64) -> ResourceList {
        ResourceList::new().with("cpu", cpu).with("memory", mem)
    }

    fn snapshot() -> Snapshot {
        let mut placed = Pod::new("placed", vec![ContainerSpec::with_requests("app", resources(60, 60))]);
        placed.spec.node_name = "busy".to_string();
        Snapshot::new(
            vec![
                Node::new("busy", resources(100, 100)),
                Node::new("idle", resources(100, 100)),
            ],
            &[placed],
        )
    }

    fn candidate() -> Arc<Pod> {
        Arc::new(Pod::new("web", vec![ContainerSpec::with_requests("app", resources(20, 20))]))
    }

    fn nodes() -> Vec<String> {
        vec!["busy".to_string(), "idle".to_string(), "gone".to_string()]
    }

    fn config(plugins: &[(&str, i64)]) -> SchedulerConfig {
        SchedulerConfig {
            plugins: plugins
                .iter()
                .map(|(name, weight)| PluginConfig::new(name, *weight))
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn high_utilization_prefers_busy_node() {
        let framework = Framework::new(
            &Registry::new_in_tree(),
            &config(&[(HighNodeUtilization::NAME, 1)]),
            snapshot(),
        )
        .unwrap();

        let result = framework
            .run_score_plugins(Arc::new(CycleState::new()), candidate(), &nodes())
            .await
            .unwrap();

        assert_eq!(result.best().unwrap().name, "busy");
        assert_eq!(result.plugin_score(HighNodeUtilization::NAME, "busy"), Some(80));
        assert_eq!(result.plugin_score(HighNodeUtilization::NAME, "idle"), Some(20));
        // unknown node is excluded, not fatal
        assert_eq!(result.plugin_score(HighNodeUtilization::NAME, "gone"), None);
        assert_eq!(result.totals.len(), 2);
    }

    #[tokio::test]
    async fn weights_scale_totals() {
        let framework = Framework::new(
            &Registry::new_in_tree(),
            &config(&[(HighNodeUtilization::NAME, 1), (LowNodeUtilization::NAME, 3)]),
            snapshot(),
        )
        .unwrap();

        let result = framework
            .run_score_plugins(Arc::new(CycleState::new()), candidate(), &nodes())
            .await
            .unwrap();

        // busy: 80 + 3 * 20, idle: 20 + 3 * 80
        assert_eq!(
            result.totals,
            vec![
                NodeScore { name: "idle".to_string(), score: 260 },
                NodeScore { name: "busy".to_string(), score: 140 },
            ]
        );
    }

    #[tokio::test]
    async fn pod_requests_computed_once_per_cycle() {
        let framework = Framework::new(&Registry::new_in_tree(), &SchedulerConfig::default(), snapshot()).unwrap();
        let state = Arc::new(CycleState::new());

        framework
            .run_score_plugins(state.clone(), candidate(), &nodes())
            .await
            .unwrap();

        assert_eq!(state.len(), 1);
    }

    struct Halving;

    impl ScorePlugin for Halving {
        fn name(&self) -> &str {
            "Halving"
        }

        fn score(&self, _state: &CycleState, _pod: &Pod, node_name: &str) -> (i64, Status) {
            (node_name.len() as i64 * 10, Status::success())
        }

        fn score_extensions(&self) -> Option<&dyn ScoreExtensions> {
            Some(self)
        }
    }

    impl ScoreExtensions for Halving {
        fn normalize_score(&self, _state: &CycleState, _pod: &Pod, scores: &mut NodeScoreList) -> Status {
            for s in scores.iter_mut() {
                s.score /= 2;
            }
            Status::success()
        }
    }

    fn halving(_: Option<&serde_json::Value>, _: Handle) -> FrameworkResult<Arc<dyn ScorePlugin>> {
        Ok(Arc::new(Halving))
    }

    #[tokio::test]
    async fn score_extensions_normalize_before_totals() {
        let mut registry = Registry::new();
        registry.register("Halving", halving).unwrap();
        let framework = Framework::new(&registry, &config(&[("Halving", 1)]), snapshot()).unwrap();

        let result = framework
            .run_score_plugins(Arc::new(CycleState::new()), candidate(), &["busy".to_string()])
            .await
            .unwrap();

        assert_eq!(result.plugin_score("Halving", "busy"), Some(20));
    }

    struct OutOfRange;

    impl ScorePlugin for OutOfRange {
        fn name(&self) -> &str {
            "OutOfRange"
        }

        fn score(&self, _state: &CycleState, _pod: &Pod, _node_name: &str) -> (i64, Status) {
            (1000, Status::success())
        }
    }

    fn out_of_range(_: Option<&serde_json::Value>, _: Handle) -> FrameworkResult<Arc<dyn ScorePlugin>> {
        Ok(Arc::new(OutOfRange))
    }

    #[tokio::test]
    async fn out_of_range_score_fails_cycle() {
        let mut registry = Registry::new();
        registry.register("OutOfRange", out_of_range).unwrap();
        let framework = Framework::new(&registry, &config(&[("OutOfRange", 1)]), snapshot()).unwrap();

        let err = framework
            .run_score_plugins(Arc::new(CycleState::new()), candidate(), &["idle".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, FrameworkError::ScoreOutOfRange { score: 1000, .. }));
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let mut totals = HashMap::new();
        accumulate(&mut totals, "n1", 100, 3).unwrap();
        accumulate(&mut totals, "n1", 50, 2).unwrap();
        assert_eq!(totals["n1"], 400);

        let err = accumulate(&mut totals, "n1", 100, i64::MAX / 10).unwrap_err();
        assert!(matches!(err, FrameworkError::TotalOverflow(node) if node == "n1"));

        totals.insert("n2".to_string(), i64::MAX);
        assert!(accumulate(&mut totals, "n2", 1, 1).is_err());
    }

    #[test]
    fn huge_weight_is_rejected_before_scoring() {
        let err = Framework::new(
            &Registry::new_in_tree(),
            &config(&[(HighNodeUtilization::NAME, i64::MAX / 10)]),
            snapshot(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, FrameworkError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn plugins_share_one_pinned_snapshot() {
        let framework = Framework::new(&Registry::new_in_tree(), &SchedulerConfig::default(), snapshot()).unwrap();
        let pinned = framework.handle().snapshot().clone();

        let first = framework
            .run_score_plugins(Arc::new(CycleState::new()), candidate(), &nodes())
            .await
            .unwrap();
        let second = framework
            .run_score_plugins(Arc::new(CycleState::new()), candidate(), &nodes())
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&pinned, framework.handle().clone().snapshot()));
        assert_eq!(first.totals, second.totals);
        assert_eq!(first.plugin_scores, second.plugin_scores);
    }

    #[test]
    fn unknown_plugin_in_config_fails() {
        let err = Framework::new(&Registry::new_in_tree(), &config(&[("Nope", 1)]), snapshot())
            .err()
            .unwrap();
        assert!(matches!(err, FrameworkError::UnknownPlugin(name) if name == "Nope"));
    }
}
