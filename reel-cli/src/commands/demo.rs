//! Demo command - switch between TMDB and the offline catalog

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_reel_dir;
use reel_core::config::{Config, DEMO_MODE_ENV};

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Use the offline demo catalog
    #[command(name = "on")]
    On,
    /// Use TMDB when an API key is configured
    #[command(name = "off")]
    Off,
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let reel_dir = get_reel_dir();
    std::fs::create_dir_all(&reel_dir)?;
    let mut config = Config::load(&reel_dir)?;

    match command {
        Some(DemoCommands::On) => {
            config.enable_demo_mode();
            config.save(&reel_dir)?;
            println!("{}", "Demo mode enabled".green());
            println!("Listings now come from the built-in catalog. Run 'reel movies' to browse.");
        }
        Some(DemoCommands::Off) => {
            config.disable_demo_mode();
            config.save(&reel_dir)?;
            println!("{}", "Demo mode disabled".yellow());
            if !config.has_api_key() {
                println!("No TMDB API key is configured, so the demo catalog is still used.");
            }
        }
        Some(DemoCommands::Status) | None => {
            if config.demo_mode {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            if std::env::var(DEMO_MODE_ENV).is_ok() {
                println!("(overridden by {})", DEMO_MODE_ENV);
            }
        }
    }

    Ok(())
}
