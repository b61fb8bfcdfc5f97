//! `quirks config` - inspect the merged configuration and where it comes from

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::ConfigLoader;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the merged configuration as TOML
    Show,
    /// Print the user and project config file locations
    Path,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let config = ConfigLoader::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Path => {
            let user = ConfigLoader::user_config_path();
            let project = ConfigLoader::project_config_path();
            println!("{}", describe_path("User config:   ", user.as_deref()));
            println!("{}", describe_path("Project config:", Some(&project)));
        }
    }
    Ok(())
}

/// One line per layer: location, and whether the file is there
fn describe_path(label: &str, path: Option<&Path>) -> String {
    match path {
        Some(path) => {
            let status = if path.is_file() { "found" } else { "not found" };
            format!("{} {} ({})", label, path.display(), status)
        }
        None => format!("{} (none)", label),
    }
}
