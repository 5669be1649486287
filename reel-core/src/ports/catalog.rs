//! Movie catalog port
//!
//! Defines the interface for fetching movie listings and details from an
//! external catalog (TMDB, the offline demo catalog, etc.)

use crate::domain::result::Result;
use crate::domain::{MovieDetails, MovieId, MoviePage};

/// Movie catalog provider trait
///
/// Every call is a single attempt. Any failure (transport error, non-success
/// status, unparsable body) is reported as `Error::Catalog`.
pub trait CatalogProvider: Send + Sync {
    /// Provider name (e.g., "tmdb", "demo")
    fn name(&self) -> &str;

    /// Most popular movies right now
    fn popular(&self, page: u32) -> Result<MoviePage>;

    /// Highest rated movies of all time
    fn top_rated(&self, page: u32) -> Result<MoviePage>;

    /// Movies currently in theatres
    fn now_playing(&self, page: u32) -> Result<MoviePage>;

    /// Movies releasing soon
    fn upcoming(&self, page: u32) -> Result<MoviePage>;

    /// Title search
    fn search(&self, query: &str, page: u32) -> Result<MoviePage>;

    /// Full record for a single movie
    fn details(&self, movie_id: MovieId) -> Result<MovieDetails>;
}
