//! Favorites command - list and edit the favorites set

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::{get_logger, log_event, open_context, require_auth};
use crate::output;
use reel_core::services::LogEvent;
use reel_core::{MovieId, OperationResult, ReelContext};

#[derive(Subcommand)]
pub enum FavoritesCommands {
    /// List favorites in the order they were added
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a movie by id
    Add { id: MovieId },
    /// Remove a movie by id
    Remove { id: MovieId },
    /// Add the movie if absent, remove it if present
    Toggle { id: MovieId },
    /// Remove every favorite
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

pub fn run(command: Option<FavoritesCommands>) -> Result<()> {
    let mut watched = open_context()?;
    watched.session_update();
    watched.favorites_update();
    require_auth(&watched.ctx)?;
    let logger = get_logger();

    match command.unwrap_or(FavoritesCommands::List { json: false }) {
        FavoritesCommands::List { json } => list(&watched.ctx, json)?,
        FavoritesCommands::Add { id } => {
            if watched.ctx.favorites.is_favorite(id) {
                output::info(&format!("Movie {} is already a favorite", id));
                return Ok(());
            }
            let movie = fetch_movie(&watched.ctx, id)?;
            let title = movie.title.clone();
            watched.ctx.favorites.add(movie)?;
            if let Some(snapshot) = watched.favorites_update() {
                log_event(&logger, LogEvent::new("favorite_added").with_movie(id));
                output::success(&format!("Added {} to favorites ({})", title, snapshot.count()));
            }
        }
        FavoritesCommands::Remove { id } => {
            watched.ctx.favorites.remove(id)?;
            match watched.favorites_update() {
                Some(snapshot) => {
                    log_event(&logger, LogEvent::new("favorite_removed").with_movie(id));
                    output::success(&format!(
                        "Removed movie {} from favorites ({} left)",
                        id,
                        snapshot.count()
                    ));
                }
                None => output::info(&format!("Movie {} is not a favorite", id)),
            }
        }
        FavoritesCommands::Toggle { id } => {
            let movie = match watched.ctx.favorites.movies().iter().find(|m| m.id == id) {
                // Already stored, no need to fetch
                Some(stored) => stored.clone(),
                None => fetch_movie(&watched.ctx, id)?,
            };
            let title = movie.title.clone();
            watched.ctx.favorites.toggle(movie)?;
            if let Some(snapshot) = watched.favorites_update() {
                if snapshot.contains(id) {
                    log_event(&logger, LogEvent::new("favorite_added").with_movie(id));
                    output::success(&format!("Added {} to favorites", title));
                } else {
                    log_event(&logger, LogEvent::new("favorite_removed").with_movie(id));
                    output::success(&format!("Removed {} from favorites", title));
                }
            }
        }
        FavoritesCommands::Clear { force } => {
            let count = watched.ctx.favorites.count();
            if count == 0 {
                output::info("No favorites to clear.");
                return Ok(());
            }
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Remove all {} favorites?", count))
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }
            watched.ctx.favorites.clear()?;
            if watched.favorites_update().is_some() {
                log_event(&logger, LogEvent::new("favorites_cleared"));
                output::success(&format!("Cleared {} favorites", count));
            }
        }
    }

    Ok(())
}

fn fetch_movie(ctx: &ReelContext, id: MovieId) -> Result<reel_core::Movie> {
    let details = ctx
        .catalog
        .details(id)
        .with_context(|| format!("Failed to look up movie {}", id))?;
    Ok(details.to_movie())
}

fn list(ctx: &ReelContext, json: bool) -> Result<()> {
    let snapshot = ctx.favorites.snapshot();

    if json {
        let envelope = OperationResult::ok(&snapshot)
            .with_context("count", serde_json::json!(snapshot.count()));
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    if snapshot.is_empty() {
        println!("No favorites yet. Add one with 'reel favorites add <id>'.");
        return Ok(());
    }

    println!("{} ({})", "Favorites".bold(), snapshot.count());
    println!("{}", output::movie_table(snapshot.movies(), |_| true));
    Ok(())
}
