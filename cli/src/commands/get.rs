use std::path::PathBuf;

use clap::Parser;
use tabled::{Table, settings::Style};

use super::ResourceType;
use crate::cluster::ClusterFile;

#[derive(Parser, Debug)]
pub struct GetArgs {
    #[arg(value_enum)]
    resource: ResourceType,
    /// Path to the YAML file holding nodes and pods
    #[clap(short = 'f', long = "file")]
    file: PathBuf,
}

pub async fn handle(args: &GetArgs) -> anyhow::Result<()> {
    let cluster = ClusterFile::load(&args.file).await?;

    let mut table = match args.resource {
        ResourceType::Nodes => Table::new(&cluster.nodes),
        ResourceType::Pods => Table::new(&cluster.pods),
    };
    table.with(Style::blank());
    println!("{}", table);
    Ok(())
}
