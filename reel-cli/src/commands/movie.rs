//! Movie command - show one movie in full

use anyhow::{Context, Result};
use colored::Colorize;

use super::{get_context, require_auth};
use crate::output;
use reel_core::OperationResult;

const POSTER_SIZE: &str = "w500";

pub fn run(movie_id: i64, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_auth(&ctx)?;
    let details = ctx
        .catalog
        .details(movie_id)
        .with_context(|| format!("Failed to load movie {}", movie_id))?;
    let favorite = ctx.favorites.is_favorite(movie_id);
    let poster = ctx
        .catalog
        .image_url(details.movie.poster_path.as_deref(), POSTER_SIZE);

    if json {
        let envelope = OperationResult::ok(&details)
            .with_context("is_favorite", serde_json::json!(favorite))
            .with_context("poster_url", serde_json::json!(poster));
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    let movie = &details.movie;
    let year = movie
        .release_year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    let star = if favorite { " ★".yellow().to_string() } else { String::new() };
    println!("{}{}{}", movie.title.bold(), year, star);

    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        println!("{}", tagline.italic().dimmed());
    }
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Rating".to_string(), format!("{} ({} votes)", movie.rating(), movie.vote_count)]);
    if let Some(runtime) = details.formatted_runtime() {
        table.add_row(vec!["Runtime".to_string(), runtime]);
    }
    let genres = details.genre_names();
    if !genres.is_empty() {
        table.add_row(vec!["Genres".to_string(), genres]);
    }
    if !movie.release_date.is_empty() {
        table.add_row(vec!["Released".to_string(), movie.release_date.clone()]);
    }
    if !details.status.is_empty() {
        table.add_row(vec!["Status".to_string(), details.status.clone()]);
    }
    table.add_row(vec!["Poster".to_string(), poster]);
    println!("{}", table);

    if !movie.overview.is_empty() {
        println!();
        println!("{}", movie.overview);
    }

    Ok(())
}
