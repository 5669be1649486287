//! Catalog service - category listings, search and image URLs over a provider

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TMDB_IMAGE_BASE_URL;
use crate::domain::result::{Error, Result};
use crate::domain::{MovieDetails, MovieId, MoviePage};
use crate::ports::CatalogProvider;

/// Highest page TMDB will serve
pub const MAX_PAGE: u32 = 500;

/// Shown when a movie has no poster or backdrop
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Browsable movie listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieCategory {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
}

impl MovieCategory {
    pub const ALL: [MovieCategory; 4] = [
        MovieCategory::Popular,
        MovieCategory::TopRated,
        MovieCategory::NowPlaying,
        MovieCategory::Upcoming,
    ];

    /// Human-readable heading
    pub fn label(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "Popular",
            MovieCategory::TopRated => "Top Rated",
            MovieCategory::NowPlaying => "Now Playing",
            MovieCategory::Upcoming => "Upcoming",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "popular",
            MovieCategory::TopRated => "top-rated",
            MovieCategory::NowPlaying => "now-playing",
            MovieCategory::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for MovieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for MovieCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        MovieCategory::ALL
            .into_iter()
            .find(|c| c.slug() == normalized)
            .ok_or_else(|| Error::validation(format!("Unknown category: {}", s)))
    }
}

fn check_page(page: u32) -> Result<()> {
    if (1..=MAX_PAGE).contains(&page) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Page must be between 1 and {}, got {}",
            MAX_PAGE, page
        )))
    }
}

/// Front door to whichever catalog provider is configured
pub struct CatalogService {
    provider: Box<dyn CatalogProvider>,
    image_base_url: String,
}

impl CatalogService {
    pub fn new(provider: Box<dyn CatalogProvider>, image_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Service using the public TMDB image CDN
    pub fn with_default_images(provider: Box<dyn CatalogProvider>) -> Self {
        Self::new(provider, TMDB_IMAGE_BASE_URL)
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// One page of a category
    pub fn listing(&self, category: MovieCategory, page: u32) -> Result<MoviePage> {
        check_page(page)?;
        let result = match category {
            MovieCategory::Popular => self.provider.popular(page),
            MovieCategory::TopRated => self.provider.top_rated(page),
            MovieCategory::NowPlaying => self.provider.now_playing(page),
            MovieCategory::Upcoming => self.provider.upcoming(page),
        };
        result.inspect_err(|e| {
            tracing::warn!(category = %category, page, error = %e, "listing failed");
        })
    }

    /// Title search. A blank query yields an empty page without asking the provider.
    pub fn search(&self, query: &str, page: u32) -> Result<MoviePage> {
        check_page(page)?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(MoviePage::empty(page));
        }
        self.provider.search(query, page).inspect_err(|e| {
            tracing::warn!(page, error = %e, "search failed");
        })
    }

    pub fn details(&self, movie_id: MovieId) -> Result<MovieDetails> {
        self.provider.details(movie_id).inspect_err(|e| {
            tracing::warn!(movie_id, error = %e, "details lookup failed");
        })
    }

    /// Full image URL for a poster or backdrop path, e.g. size `w500`
    pub fn image_url(&self, path: Option<&str>, size: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) if path.starts_with('/') => {
                format!("{}/{}{}", self.image_base_url, size, path)
            }
            Some(path) => format!("{}/{}/{}", self.image_base_url, size, path),
            None => PLACEHOLDER_IMAGE.to_string(),
        }
    }
}
