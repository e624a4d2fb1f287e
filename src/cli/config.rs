//! Configuration command

use super::helpers::load_config;
use appraise_core::{config::default_config_dir, error::Result};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
}

/// Handle configuration command. Local only; needs no session.
pub async fn handle(
    action: ConfigAction,
    config_file: Option<&Path>,
    api_url: Option<&str>,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_file, api_url)?;
            print!("{}", config.to_toml()?);

            let source = config_file
                .map(Path::to_path_buf)
                .or_else(|| default_config_dir().map(|dir| dir.join("config.toml")));
            if let Some(path) = source {
                let state = if path.exists() { "" } else { " (not present)" };
                println!();
                println!("# config file: {}{}", path.display(), state);
            }
            println!("# session dir: {}", config.session_dir()?.display());
            Ok(())
        }
    }
}
