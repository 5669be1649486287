//! Favorites store - the user's ordered set of saved movies

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{FavoritesSnapshot, Movie, MovieId};
use crate::ports::KeyValueStore;
use crate::services::persisted::PersistedRecord;
use crate::services::subscribers::{SubscriptionId, Subscribers};

/// Storage key of the favorites record
pub const FAVORITES_KEY: &str = "movieapp_favorites";

/// Holds the favorites set and keeps its persisted copy in sync
///
/// Favorites are not tied to the signed-in identity: logging out leaves
/// them in place.
pub struct FavoritesStore {
    record: PersistedRecord<Vec<Movie>>,
    state: FavoritesSnapshot,
    hydrated: bool,
    subscribers: Subscribers<FavoritesSnapshot>,
}

impl FavoritesStore {
    /// Create an un-hydrated store. Call [`FavoritesStore::hydrate`] before use.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            record: PersistedRecord::new(storage, FAVORITES_KEY),
            state: FavoritesSnapshot::default(),
            hydrated: false,
            subscribers: Subscribers::default(),
        }
    }

    /// Load persisted favorites. Only the first call has any effect.
    ///
    /// A corrupt record is discarded and the set starts empty.
    pub fn hydrate(&mut self) -> bool {
        if self.hydrated {
            return false;
        }

        let movies = self.record.load().unwrap_or_default();
        let stored = movies.len();
        self.state = FavoritesSnapshot::from_movies(movies);
        if self.state.count() != stored {
            tracing::warn!(
                dropped = stored - self.state.count(),
                "stored favorites contained duplicate ids"
            );
        }
        tracing::debug!(count = self.state.count(), "loaded favorites");

        self.hydrated = true;
        self.notify();
        true
    }

    /// Append a movie. No-op if its id is already a favorite.
    pub fn add(&mut self, movie: Movie) -> Result<()> {
        self.ensure_ready()?;
        let id = movie.id;
        if self.state.insert(movie) {
            tracing::debug!(movie_id = id, "favorite added");
            self.commit();
        }
        Ok(())
    }

    /// Remove a movie by id. No-op if it isn't a favorite.
    pub fn remove(&mut self, movie_id: MovieId) -> Result<()> {
        self.ensure_ready()?;
        if self.state.remove(movie_id) {
            tracing::debug!(movie_id, "favorite removed");
            self.commit();
        }
        Ok(())
    }

    /// Add if absent, remove if present
    ///
    /// Returns whether the movie is a favorite afterwards.
    pub fn toggle(&mut self, movie: Movie) -> Result<bool> {
        if self.is_favorite(movie.id) {
            self.remove(movie.id)?;
            Ok(false)
        } else {
            self.add(movie)?;
            Ok(true)
        }
    }

    /// Remove every favorite and delete the persisted record
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.record.erase_logged();
        if self.state.clear() {
            tracing::debug!("favorites cleared");
            self.notify();
        }
        Ok(())
    }

    pub fn is_favorite(&self, movie_id: MovieId) -> bool {
        self.state.contains(movie_id)
    }

    pub fn count(&self) -> usize {
        self.state.count()
    }

    /// Favorites in the order they were added
    pub fn movies(&self) -> &[Movie] {
        self.state.movies()
    }

    pub fn snapshot(&self) -> FavoritesSnapshot {
        self.state.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.hydrated
    }

    /// Receive a snapshot after every state change
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&FavoritesSnapshot) + Send + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Persist the current set and notify
    fn commit(&mut self) {
        self.record.save_logged(self.state.movies());
        self.notify();
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.hydrated {
            Ok(())
        } else {
            Err(Error::NotHydrated("favorites"))
        }
    }

    fn notify(&mut self) {
        let snapshot = self.state.clone();
        self.subscribers.notify(&snapshot);
    }
}
