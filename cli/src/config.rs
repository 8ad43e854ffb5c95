use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use scheduler::SchedulerConfig;

const R8S_LOG: &str = "warn";

#[derive(Debug)]
pub struct Config {
    /// YAML file with the scheduler config, default plugins when unset.
    pub scheduler_config: Option<PathBuf>,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        let scheduler_config = env::var("R8S_SCHEDULER_CONFIG")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let log_filter = env::var("R8S_LOG").unwrap_or_else(|_| R8S_LOG.to_string());

        Self {
            scheduler_config,
            log_filter,
        }
    }

    pub async fn scheduler_config(&self) -> anyhow::Result<SchedulerConfig> {
        match &self.scheduler_config {
            Some(path) => load_scheduler_config(path).await,
            None => Ok(SchedulerConfig::default()),
        }
    }
}

async fn load_scheduler_config(path: &Path) -> anyhow::Result<SchedulerConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read scheduler config {}", path.display()))?;
    let config: SchedulerConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse scheduler config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "scoreRange: {{min: 0, max: 10}}\nplugins:\n  - name: LowNodeUtilization\n    weight: 2"
        )
        .unwrap();

        let config = Config {
            scheduler_config: Some(file.path().to_path_buf()),
            log_filter: R8S_LOG.to_string(),
        };
        let loaded = config.scheduler_config().await.unwrap();

        assert_eq!(loaded.score_range.max, 10);
        assert_eq!(loaded.plugins.len(), 1);
        assert_eq!(loaded.plugins[0].weight, 2);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scoreRange: {{min: 5, max: 5}}").unwrap();

        let config = Config {
            scheduler_config: Some(file.path().to_path_buf()),
            log_filter: R8S_LOG.to_string(),
        };
        assert!(config.scheduler_config().await.is_err());
    }

    #[tokio::test]
    async fn defaults_without_file() {
        let config = Config {
            scheduler_config: None,
            log_filter: R8S_LOG.to_string(),
        };
        assert_eq!(config.scheduler_config().await.unwrap(), SchedulerConfig::default());
    }
}
