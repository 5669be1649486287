//! TMDB API client
//!
//! Handles communication with The Movie Database v3 REST API. Every call is
//! a single blocking GET authenticated with the `api_key` query parameter.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::result::{Error, Result as DomainResult};
use crate::domain::{MovieDetails, MovieId, MoviePage};
use crate::ports::CatalogProvider;

/// Production TMDB API root
pub const TMDB_PRODUCTION_URL: &str = "https://api.themoviedb.org/3";

/// Environment variable to override the TMDB API base URL
pub const TMDB_BASE_URL_ENV: &str = "REEL_TMDB_BASE_URL";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// TMDB API client
#[derive(Debug)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    /// Create a new TMDB client with a custom base URL.
    pub fn new_with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            anyhow::bail!("TMDB API key cannot be empty");
        }

        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).with_context(|| format!("Invalid TMDB base URL: {}", base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL with the API key and extra query parameters
    pub fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .with_context(|| format!("Invalid TMDB endpoint: {}", path))?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            query.append_pair("api_key", &self.api_key);
        }
        Ok(url)
    }

    fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(path = url.path(), "TMDB request");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        self.check_response_status(&response)?;

        response.json().context("Failed to parse TMDB response")
    }

    fn fetch_listing(&self, path: &str, page: u32) -> Result<MoviePage> {
        let url = self.endpoint_url(path, &[("page", page.to_string())])?;
        self.fetch(url)
    }

    pub fn get_popular(&self, page: u32) -> Result<MoviePage> {
        self.fetch_listing("/movie/popular", page)
    }

    pub fn get_top_rated(&self, page: u32) -> Result<MoviePage> {
        self.fetch_listing("/movie/top_rated", page)
    }

    pub fn get_now_playing(&self, page: u32) -> Result<MoviePage> {
        self.fetch_listing("/movie/now_playing", page)
    }

    pub fn get_upcoming(&self, page: u32) -> Result<MoviePage> {
        self.fetch_listing("/movie/upcoming", page)
    }

    pub fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage> {
        let url = self.endpoint_url(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )?;
        self.fetch(url)
    }

    pub fn get_movie_details(&self, movie_id: MovieId) -> Result<MovieDetails> {
        let url = self.endpoint_url(&format!("/movie/{}", movie_id), &[])?;
        self.fetch(url)
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> anyhow::Error {
        if error.is_timeout() {
            anyhow::anyhow!("Connection timed out after {} seconds", REQUEST_TIMEOUT_SECS)
        } else if error.is_connect() {
            anyhow::anyhow!("Unable to connect to TMDB servers")
        } else {
            // Drop the URL from the message, it carries the API key
            anyhow::anyhow!("TMDB request failed: {}", error.without_url())
        }
    }

    /// Check response status and return appropriate errors
    fn check_response_status(&self, response: &reqwest::blocking::Response) -> Result<()> {
        match response.status().as_u16() {
            200..=299 => Ok(()),
            401 => anyhow::bail!("TMDB authentication failed. Check your API key."),
            404 => anyhow::bail!("TMDB resource not found."),
            429 => anyhow::bail!("TMDB rate limit exceeded. Please wait a moment and try again."),
            status => anyhow::bail!("TMDB API error: HTTP {}", status),
        }
    }
}

/// Collapse an anyhow chain into a catalog error
fn to_catalog_error(error: anyhow::Error) -> Error {
    Error::catalog(format!("{:#}", error))
}

impl CatalogProvider for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    fn popular(&self, page: u32) -> DomainResult<MoviePage> {
        self.get_popular(page).map_err(to_catalog_error)
    }

    fn top_rated(&self, page: u32) -> DomainResult<MoviePage> {
        self.get_top_rated(page).map_err(to_catalog_error)
    }

    fn now_playing(&self, page: u32) -> DomainResult<MoviePage> {
        self.get_now_playing(page).map_err(to_catalog_error)
    }

    fn upcoming(&self, page: u32) -> DomainResult<MoviePage> {
        self.get_upcoming(page).map_err(to_catalog_error)
    }

    fn search(&self, query: &str, page: u32) -> DomainResult<MoviePage> {
        self.search_movies(query, page).map_err(to_catalog_error)
    }

    fn details(&self, movie_id: MovieId) -> DomainResult<MovieDetails> {
        self.get_movie_details(movie_id).map_err(to_catalog_error)
    }
}
