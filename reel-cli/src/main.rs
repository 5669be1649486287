//! Reel CLI - browse movies and keep a favorites list from the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod output;

use commands::{auth, demo, favorites, logs, movie, movies};

/// Environment variable holding the diagnostics filter
const LOG_FILTER_ENV: &str = "REEL_LOG";

/// Reel - movie discovery in your terminal
#[derive(Parser)]
#[command(name = "reel", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List movies in a category (requires login)
    Movies {
        /// popular, top-rated, now-playing or upcoming
        #[arg(default_value = "popular")]
        category: String,
        /// Page number
        #[arg(long, short, default_value = "1")]
        page: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search movies by title (requires login)
    Search {
        /// Title to look for
        query: String,
        /// Page number
        #[arg(long, short, default_value = "1")]
        page: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details for one movie (requires login)
    Movie {
        /// Movie id
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account and log in
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out
    Logout,

    /// Show who is logged in
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        command: Option<favorites::FavoritesCommands>,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Name recorded in the event log
    fn name(&self) -> &'static str {
        match self {
            Commands::Movies { .. } => "movies",
            Commands::Search { .. } => "search",
            Commands::Movie { .. } => "movie",
            Commands::Login { .. } => "login",
            Commands::Register { .. } => "register",
            Commands::Logout => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Favorites { .. } => "favorites",
            Commands::Demo { .. } => "demo",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let command_name = cli.command.name();

    // Commands open the log themselves, so no handle is held across run()
    if let Some(logger) = commands::get_logger() {
        let _ = logger.log_command(command_name);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(logger) = commands::get_logger() {
                let _ = logger.log_error("command_failed", &format!("{}: {}", command_name, e), None);
            }
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Movies { category, page, json } => movies::run_listing(&category, page, json),
        Commands::Search { query, page, json } => movies::run_search(&query, page, json),
        Commands::Movie { id, json } => movie::run(id, json),
        Commands::Login { email, password, json } => auth::run_login(email, password, json),
        Commands::Register { name, email, password, json } => {
            auth::run_register(name, email, password, json)
        }
        Commands::Logout => auth::run_logout(),
        Commands::Whoami { json } => auth::run_whoami(json),
        Commands::Favorites { command } => favorites::run(command),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
