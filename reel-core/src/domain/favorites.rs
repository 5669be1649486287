//! Favorites set domain model

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::movie::{Movie, MovieId};

/// Ordered set of favorited movies, unique by id
///
/// Cloning is cheap: both collections are shared, and the owning store
/// copies them on write, so a snapshot handed out never changes.
#[derive(Debug, Clone, Default)]
pub struct FavoritesSnapshot {
    movies: Arc<Vec<Movie>>,
    ids: Arc<HashSet<MovieId>>,
}

impl FavoritesSnapshot {
    /// Build from a persisted list, keeping the first entry for each id
    pub(crate) fn from_movies(movies: Vec<Movie>) -> Self {
        let mut ids = HashSet::with_capacity(movies.len());
        let movies: Vec<Movie> = movies.into_iter().filter(|m| ids.insert(m.id)).collect();
        Self {
            movies: Arc::new(movies),
            ids: Arc::new(ids),
        }
    }

    /// Append a movie; returns false if its id is already present
    pub(crate) fn insert(&mut self, movie: Movie) -> bool {
        if self.ids.contains(&movie.id) {
            return false;
        }
        Arc::make_mut(&mut self.ids).insert(movie.id);
        Arc::make_mut(&mut self.movies).push(movie);
        true
    }

    /// Remove by id; returns false if absent
    pub(crate) fn remove(&mut self, id: MovieId) -> bool {
        if !self.ids.contains(&id) {
            return false;
        }
        Arc::make_mut(&mut self.ids).remove(&id);
        Arc::make_mut(&mut self.movies).retain(|m| m.id != id);
        true
    }

    /// Empty both collections; returns false if already empty
    pub(crate) fn clear(&mut self) -> bool {
        if self.movies.is_empty() {
            return false;
        }
        *self = Self::default();
        true
    }

    /// Movies in insertion order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Ids in insertion order
    pub fn ids(&self) -> Vec<MovieId> {
        self.movies.iter().map(|m| m.id).collect()
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.ids.contains(&id)
    }

    pub fn count(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl Serialize for FavoritesSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.movies.serialize(serializer)
    }
}
