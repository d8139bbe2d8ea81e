//! Config command - show the effective configuration or write defaults

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;
use vision3d_core::Config;
use vision3d_core::config::{self, save_to};

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Write a default config file if none exists
    #[arg(long)]
    pub init: bool,
}

/// Execute the config command
pub fn execute(args: ConfigArgs, effective: &Config, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => config::config_path(),
    };

    if args.init {
        let path = path.context("No configuration directory available on this platform")?;
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            save_to(&Config::default(), &path)?;
            println!("Wrote default config: {}", path.display());
        }
        return Ok(());
    }

    match &path {
        Some(path) => println!("# {}", path.display()),
        None => println!("# (no config directory)"),
    }
    println!("{}", render(effective)?);
    Ok(())
}

/// Pretty TOML with the API key masked.
fn render(config: &Config) -> Result<String> {
    let mut shown = config.clone();
    if shown.analysis.api_key.is_some() {
        shown.analysis.api_key = Some("********".to_string());
    }
    Ok(toml::to_string_pretty(&shown)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_is_masked() {
        let mut config = Config::default();
        config.analysis.api_key = Some("super-secret".into());
        let text = render(&config).unwrap();
        assert!(!text.contains("super-secret"));
        assert!(text.contains("********"));
    }

    #[test]
    fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        execute(ConfigArgs { init: true }, &Config::default(), Some(&path)).unwrap();
        assert_eq!(config::load_from(&path).unwrap(), Config::default());

        std::fs::write(&path, "[viewer]\nfps = 30\n").unwrap();
        execute(ConfigArgs { init: true }, &Config::default(), Some(&path)).unwrap();
        assert_eq!(config::load_from(&path).unwrap().viewer.fps, 30);
    }
}
