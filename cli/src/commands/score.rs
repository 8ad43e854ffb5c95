use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use scheduler::{CycleState, Framework, PluginConfig, Registry, SchedulerConfig, ScoreResult, Snapshot};
use tabled::{builder::Builder, settings::Style};

use crate::cluster::ClusterFile;
use crate::config::Config;

#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Path to the YAML file holding nodes and pods
    #[clap(short = 'f', long = "file")]
    pub file: PathBuf,
    /// Name of the pending pod to score
    #[clap(long)]
    pub pod: String,
    /// Only run these plugins (repeatable), keeping configured weights
    #[clap(long = "plugin")]
    pub plugins: Vec<String>,
}

pub async fn handle(config: &Config, args: &ScoreArgs) -> anyhow::Result<()> {
    let scheduler_config = select_plugins(config.scheduler_config().await?, &args.plugins);
    let cluster = ClusterFile::load(&args.file).await?;
    let pod = cluster.pending_pod(&args.pod)?.clone();

    let snapshot = Snapshot::new(cluster.nodes.clone(), &cluster.pods);
    let nodes = snapshot.node_names();
    let framework = Framework::new(&Registry::new_in_tree(), &scheduler_config, snapshot)?;

    tracing::debug!(pod=%pod.metadata.name, nodes=nodes.len(), "Scoring");
    let result = framework
        .run_score_plugins(Arc::new(CycleState::new()), Arc::new(pod), &nodes)
        .await?;

    println!("{}", render(&framework.plugin_names(), &result));
    Ok(())
}

/// Narrows the config to `names`, adding unconfigured ones with weight 1.
fn select_plugins(mut config: SchedulerConfig, names: &[String]) -> SchedulerConfig {
    if names.is_empty() {
        return config;
    }
    config.plugins = names
        .iter()
        .map(|name| {
            config
                .plugins
                .iter()
                .find(|p| &p.name == name)
                .cloned()
                .unwrap_or_else(|| PluginConfig::new(name, 1))
        })
        .collect();
    config
}

fn render(plugins: &[&str], result: &ScoreResult) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("NODE".to_string())
            .chain(plugins.iter().map(|p| p.to_string()))
            .chain(std::iter::once("TOTAL".to_string())),
    );

    for total in &result.totals {
        let per_plugin = plugins.iter().map(|plugin| {
            result
                .plugin_score(plugin, &total.name)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string())
        });
        builder.push_record(
            std::iter::once(total.name.clone())
                .chain(per_plugin)
                .chain(std::iter::once(total.score.to_string())),
        );
    }

    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheduler::NodeScore;

    #[test]
    fn select_keeps_configured_weight() {
        let mut config = SchedulerConfig::default();
        config.plugins[1].weight = 5;

        let selected = select_plugins(config, &["HighNodeUtilization".to_string()]);
        assert_eq!(selected.plugins, vec![PluginConfig::new("HighNodeUtilization", 5)]);
    }

    #[test]
    fn select_nothing_keeps_config() {
        let selected = select_plugins(SchedulerConfig::default(), &[]);
        assert_eq!(selected, SchedulerConfig::default());
    }

    #[test]
    fn render_marks_unscored_nodes() {
        let mut result = ScoreResult::default();
        result.plugin_scores.insert(
            "High".to_string(),
            vec![NodeScore { name: "n1".to_string(), score: 70 }],
        );
        result.totals = vec![
            NodeScore { name: "n1".to_string(), score: 70 },
            NodeScore { name: "n2".to_string(), score: 0 },
        ];

        let out = render(&["High"], &result);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("NODE") && lines[0].contains("TOTAL"));
        assert!(lines[1].contains("n1") && lines[1].contains("70"));
        assert!(lines[2].contains("n2") && lines[2].contains('-'));
    }
}
