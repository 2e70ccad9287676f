use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use parallax_core::config::{LoadConfig, ProcessConfig};
use parallax_core::frame::TemplatePoint;
use serde::{Deserialize, Serialize};

/// Full run configuration: load parameters plus processing parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub load: LoadConfig,
    pub process: ProcessConfig,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a full default run configuration as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let mut config = RunConfig::default();
    // Seed two template slots so the emitted file shows the list syntax.
    config.process.template_points = vec![TemplatePoint::new(0, 0), TemplatePoint::new(0, 0)];

    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
