//! CLI command implementations

pub mod auth;
pub mod demo;
pub mod favorites;
pub mod logs;
pub mod movie;
pub mod movies;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};
use reel_core::services::{EntryPoint, LogEvent, LoggingService};
use reel_core::{FavoritesSnapshot, Identity, ReelContext, Session};

/// Environment variable overriding the data directory
const REEL_DIR_ENV: &str = "REEL_DIR";

/// Logging service for CLI operations
///
/// Returns None if logging fails to initialize; it never blocks a command.
pub fn get_logger() -> Option<LoggingService> {
    let reel_dir = get_reel_dir();
    std::fs::create_dir_all(&reel_dir).ok()?;
    LoggingService::new(&reel_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Data directory from `REEL_DIR`, else `~/.reel`
pub fn get_reel_dir() -> PathBuf {
    match std::env::var(REEL_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".reel"),
    }
}

/// Build a hydrated context for the data directory
pub fn get_context() -> Result<ReelContext> {
    let reel_dir = get_reel_dir();
    ReelContext::new(&reel_dir).context("Failed to initialize reel context")
}

/// Open the context for the data directory, subscribed before hydration
pub fn open_context() -> Result<WatchedContext> {
    let reel_dir = get_reel_dir();
    let ctx = ReelContext::open(&reel_dir).context("Failed to initialize reel context")?;
    Ok(WatchedContext::watch(ctx))
}

/// A context whose store notifications are queued for the command to read
///
/// The hydration notifications are the first ones queued.
pub struct WatchedContext {
    pub ctx: ReelContext,
    sessions: Receiver<Session>,
    favorites: Receiver<FavoritesSnapshot>,
}

impl WatchedContext {
    /// Subscribe to both stores, then hydrate them
    pub fn watch(mut ctx: ReelContext) -> Self {
        let (session_tx, sessions) = mpsc::channel();
        ctx.session.subscribe(move |session| {
            let _ = session_tx.send(session.clone());
        });
        let (favorites_tx, favorites) = mpsc::channel();
        ctx.favorites.subscribe(move |snapshot| {
            let _ = favorites_tx.send(snapshot.clone());
        });

        ctx.hydrate();
        Self {
            ctx,
            sessions,
            favorites,
        }
    }

    /// Latest session published since the last call, if any
    pub fn session_update(&self) -> Option<Session> {
        self.sessions.try_iter().last()
    }

    /// Latest favorites snapshot published since the last call, if any
    pub fn favorites_update(&self) -> Option<FavoritesSnapshot> {
        self.favorites.try_iter().last()
    }
}

/// The logged-in identity, or an error telling the user to log in
pub fn require_auth(ctx: &ReelContext) -> Result<Identity> {
    ctx.session
        .current()
        .cloned()
        .context("You need to be logged in. Run 'reel login' first.")
}
