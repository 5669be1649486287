//! Movie domain model
//!
//! Field names follow the TMDB v3 JSON payloads so values can be
//! deserialized straight from the catalog and persisted as-is.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Catalog-wide movie identifier
pub type MovieId = i64;

/// A catalog entry as returned by listing and search endpoints
///
/// Only `id` is meaningful to the stores; the rest is display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// `YYYY-MM-DD`, empty for unreleased titles
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video: bool,
    /// Fields we don't model, kept so persisted favorites round-trip
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Movie {
    /// Create a movie with only an id and title
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            original_title: title.clone(),
            title,
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: String::new(),
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            genre_ids: Vec::new(),
            adult: false,
            original_language: String::new(),
            video: false,
            extra: Map::new(),
        }
    }

    /// Parsed release date, if present and well-formed
    pub fn release(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d").ok()
    }

    /// Release year, if known
    pub fn release_year(&self) -> Option<i32> {
        self.release().map(|d| d.year())
    }

    /// Rating rounded to one decimal, as shown on cards
    pub fn rating(&self) -> String {
        format!("{:.1}", self.vote_average)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    pub iso_639_1: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub english_name: Option<String>,
}

/// Full movie record from the details endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(flatten)]
    pub movie: Movie,
}

impl MovieDetails {
    /// The listing-level value, e.g. for saving as a favorite
    ///
    /// The details payload carries `genres` instead of `genre_ids`, so the ids
    /// are filled in from the genre list when the listing field is empty.
    pub fn to_movie(&self) -> Movie {
        let mut movie = self.movie.clone();
        if movie.genre_ids.is_empty() {
            movie.genre_ids = self.genres.iter().map(|g| g.id).collect();
        }
        movie
    }

    /// Runtime as `"2h 16m"`, or `None` when unknown
    pub fn formatted_runtime(&self) -> Option<String> {
        match self.runtime {
            None | Some(0) => None,
            Some(minutes) if minutes < 60 => Some(format!("{}m", minutes)),
            Some(minutes) => Some(format!("{}h {}m", minutes / 60, minutes % 60)),
        }
    }

    /// Comma-separated genre names
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}

impl MoviePage {
    /// A page with no results
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_keeps_unknown_fields() {
        let json = r#"{"id": 550, "title": "Fight Club", "media_type": "movie"}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 550);
        assert_eq!(movie.extra["media_type"], "movie");

        let back = serde_json::to_value(&movie).unwrap();
        assert_eq!(back["media_type"], "movie");
    }

    #[test]
    fn test_movie_nullable_paths() {
        let json = r#"{"id": 1, "title": "No Poster", "poster_path": null}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert!(movie.poster_path.is_none());
        assert_eq!(movie.vote_average, 0.0);
    }

    #[test]
    fn test_null_display_fields_use_defaults() {
        let json = r#"{
            "id": 9, "title": null, "overview": null, "release_date": null,
            "vote_average": null, "vote_count": null, "genre_ids": null,
            "original_language": null, "original_title": null, "adult": null
        }"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 9);
        assert_eq!(movie.title, "");
        assert_eq!(movie.release_year(), None);
        assert!(movie.genre_ids.is_empty());
        assert!(!movie.extra.contains_key("title"));
    }

    #[test]
    fn test_details_with_null_fields() {
        let json = r#"{
            "id": 5, "title": "Sparse", "status": null, "budget": null,
            "genres": [{"id": 18, "name": null}], "spoken_languages": null
        }"#;
        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.status, "");
        assert_eq!(details.budget, 0);
        assert_eq!(details.genres[0].id, 18);
        assert!(details.spoken_languages.is_empty());
    }

    #[test]
    fn test_release_year() {
        let mut movie = Movie::new(1, "Test");
        assert_eq!(movie.release_year(), None);
        movie.release_date = "1999-10-15".to_string();
        assert_eq!(movie.release_year(), Some(1999));
    }

    #[test]
    fn test_details_flatten() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "runtime": 148,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "status": "Released",
            "tagline": "Your mind is the scene of the crime."
        }"#;
        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.movie.id, 27205);
        assert_eq!(details.formatted_runtime().as_deref(), Some("2h 28m"));
        assert_eq!(details.genre_names(), "Action, Science Fiction");
        assert_eq!(details.to_movie().genre_ids, vec![28, 878]);
        assert!(!details.to_movie().extra.contains_key("runtime"));
    }

    #[test]
    fn test_formatted_runtime_short() {
        let mut details: MovieDetails =
            serde_json::from_str(r#"{"id": 1, "runtime": 45}"#).unwrap();
        assert_eq!(details.formatted_runtime().as_deref(), Some("45m"));
        details.runtime = Some(0);
        assert_eq!(details.formatted_runtime(), None);
    }

    #[test]
    fn test_page_has_next() {
        let page = MoviePage {
            page: 1,
            results: vec![],
            total_pages: 3,
            total_results: 60,
        };
        assert!(page.has_next_page());
        assert!(!MoviePage::empty(1).has_next_page());
    }
}
