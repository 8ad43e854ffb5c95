use tabled::{builder::Builder, settings::Style};

use scheduler::Registry;

use crate::config::Config;

/// Lists registered score plugins and their configured weight.
pub async fn handle(config: &Config) -> anyhow::Result<()> {
    let scheduler_config = config.scheduler_config().await?;
    let registry = Registry::new_in_tree();

    let mut builder = Builder::default();
    builder.push_record(["PLUGIN", "ENABLED", "WEIGHT"]);
    for name in registry.names() {
        let enabled = scheduler_config.plugins.iter().find(|p| p.name == name);
        builder.push_record([
            name.to_string(),
            enabled.is_some().to_string(),
            enabled.map(|p| p.weight.to_string()).unwrap_or_else(|| "-".to_string()),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::blank());
    println!("{}", table);
    Ok(())
}
