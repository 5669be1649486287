//! Movies and search commands - browse catalog listings

use anyhow::{Context, Result};
use colored::Colorize;

use super::{get_context, require_auth};
use crate::output;
use reel_core::{MovieCategory, MoviePage, OperationResult, ReelContext};

pub fn run_listing(category: &str, page: u32, json: bool) -> Result<()> {
    let category: MovieCategory = category.parse()?;
    let ctx = get_context()?;
    require_auth(&ctx)?;
    let result = ctx
        .catalog
        .listing(category, page)
        .with_context(|| format!("Failed to load {} movies", category.label().to_lowercase()))?;

    if json {
        let envelope = OperationResult::ok(&result)
            .with_context("category", serde_json::json!(category))
            .with_context("provider", serde_json::json!(ctx.catalog.provider_name()));
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    println!("{}", category.label().bold());
    print_page(&ctx, &result);
    Ok(())
}

pub fn run_search(query: &str, page: u32, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_auth(&ctx)?;
    let result = ctx
        .catalog
        .search(query, page)
        .with_context(|| format!("Search for '{}' failed", query))?;

    if json {
        let envelope = OperationResult::ok(&result).with_context("query", serde_json::json!(query));
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    if result.results.is_empty() {
        output::warning(&format!("No movies found for '{}'", query.trim()));
        return Ok(());
    }

    println!("{} {}", "Results for".bold(), query.trim().bold());
    print_page(&ctx, &result);
    Ok(())
}

fn print_page(ctx: &ReelContext, page: &MoviePage) {
    let table = output::movie_table(&page.results, |id| ctx.favorites.is_favorite(id));
    println!("{}", table);

    let mut footer = output::page_footer(page);
    if page.has_next_page() {
        footer.push_str(&format!(" - next: --page {}", page.page + 1));
    }
    println!("{}", footer.dimmed());

    if ctx.catalog.provider_name() == "demo" {
        output::info("Showing the offline demo catalog. Set REEL_TMDB_API_KEY for live data.");
    }
}
