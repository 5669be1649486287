//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

use reel_core::{Movie, MoviePage};

pub fn success(msg: &str) {
    println!("{}", msg.green());
}

pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Shorten to at most `max` characters, marking the cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Table of movies, with a star next to favorites
pub fn movie_table<'a>(movies: impl IntoIterator<Item = &'a Movie>, is_favorite: impl Fn(i64) -> bool) -> Table {
    let mut table = create_table();
    table.set_header(vec!["", "ID", "Title", "Year", "Rating"]);

    for movie in movies {
        let marker = if is_favorite(movie.id) { "★" } else { "" };
        table.add_row(vec![
            marker.to_string(),
            movie.id.to_string(),
            truncate(&movie.title, 48),
            movie
                .release_year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string()),
            movie.rating(),
        ]);
    }

    table
}

/// "Page 1 of 12 (240 results)"
pub fn page_footer(page: &MoviePage) -> String {
    format!(
        "Page {} of {} ({} results)",
        page.page,
        page.total_pages.max(1),
        page.total_results
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Dune", 10), "Dune");
        assert_eq!(truncate("The Lord of the Rings", 8), "The Lor…");
    }

    #[test]
    fn test_page_footer() {
        let page = MoviePage::empty(1);
        assert_eq!(page_footer(&page), "Page 1 of 1 (0 results)");
    }
}
