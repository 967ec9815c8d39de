use std::path::PathBuf;

use anyhow::Context;

use clap::Parser;

use std::fs::File;

use catdrop_snapshot::catdrop::{run_snapshot_generation, PathsConfig};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[clap(version)]
pub struct Cli {
    /// path to config file
    #[clap(long, value_parser)]
    config_path: PathBuf,
}

fn main() {
    let result = _main();
    result.unwrap();
}

fn _main() -> anyhow::Result<()> {
    // Start logging setup block
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry().with(fmt_layer).init();

    let Cli { config_path } = Cli::parse();

    tracing::info!("Config file {:?}", config_path);
    let file = File::open(&config_path).with_context(|| {
        format!(
            "Cannot read config file {path}",
            path = config_path.display()
        )
    })?;
    let config: PathsConfig = serde_yaml::from_reader(file).with_context(|| {
        format!(
            "Cannot read config file {path}",
            path = config_path.display()
        )
    })?;

    let summary = run_snapshot_generation(&config)?;
    println!("{}", summary);

    Ok(())
}
