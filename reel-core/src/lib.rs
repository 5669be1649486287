//! Reel Core - state and catalog access for a movie browsing app
//!
//! The crate follows a hexagonal layout:
//!
//! - **domain**: movies, identities, favorites snapshots
//! - **ports**: traits for storage and the movie catalog
//! - **adapters**: file/in-memory storage, the TMDB client, the demo catalog
//! - **services**: session and favorites stores, catalog service, event log

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::demo::DemoCatalog;
use adapters::file::FileStore;
use adapters::tmdb::TmdbClient;
use config::Config;
use ports::{CatalogProvider, KeyValueStore};
use services::{CatalogService, FavoritesStore, SessionStore};

pub use domain::result::{Error, OperationResult};
pub use domain::{
    FavoritesSnapshot, Identity, Movie, MovieDetails, MovieId, MoviePage, Session, SessionStatus,
};
pub use services::MovieCategory;

/// Everything a front end needs, built once at startup
///
/// [`ReelContext::new`] and [`ReelContext::from_parts`] return hydrated
/// stores. [`ReelContext::open`] and [`ReelContext::assemble`] leave them
/// un-hydrated so callers can subscribe first and observe hydration; call
/// [`ReelContext::hydrate`] afterwards.
pub struct ReelContext {
    pub config: Config,
    pub session: SessionStore,
    pub favorites: FavoritesStore,
    pub catalog: CatalogService,
    pub storage: Arc<dyn KeyValueStore>,
}

impl ReelContext {
    /// Open and hydrate the context rooted at `reel_dir`
    pub fn new(reel_dir: &Path) -> Result<Self> {
        let mut ctx = Self::open(reel_dir)?;
        ctx.hydrate();
        Ok(ctx)
    }

    /// Open the context rooted at `reel_dir`, persisting to `reel_dir/storage`,
    /// without hydrating
    pub fn open(reel_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(reel_dir)
            .with_context(|| format!("Failed to create {}", reel_dir.display()))?;

        let config = Config::load(reel_dir)?;
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(reel_dir.join("storage"))?);
        let provider = build_provider(&config)?;

        Ok(Self::assemble(config, storage, provider))
    }

    /// Assemble a context from explicit parts and hydrate its stores
    pub fn from_parts(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
        provider: Box<dyn CatalogProvider>,
    ) -> Self {
        let mut ctx = Self::assemble(config, storage, provider);
        ctx.hydrate();
        ctx
    }

    /// Assemble a context from explicit parts, stores not yet hydrated
    pub fn assemble(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
        provider: Box<dyn CatalogProvider>,
    ) -> Self {
        let session = SessionStore::new(Arc::clone(&storage), config.auth.clone());
        let favorites = FavoritesStore::new(Arc::clone(&storage));
        let catalog = CatalogService::new(provider, config.catalog.image_base_url.clone());

        Self {
            config,
            session,
            favorites,
            catalog,
            storage,
        }
    }

    /// Load persisted state into both stores. Later calls are no-ops.
    pub fn hydrate(&mut self) {
        self.session.hydrate();
        self.favorites.hydrate();
    }
}

/// Demo catalog in demo mode or without an API key, TMDB otherwise
pub fn build_provider(config: &Config) -> std::result::Result<Box<dyn CatalogProvider>, Error> {
    match config.catalog.api_key.as_deref() {
        Some(api_key) if !config.demo_mode => {
            let client = TmdbClient::new_with_base_url(api_key, &config.catalog.base_url)
                .map_err(|e| Error::config(format!("Failed to configure the TMDB client: {:#}", e)))?;
            Ok(Box::new(client))
        }
        _ => {
            if !config.demo_mode {
                tracing::info!("no TMDB API key configured, using the demo catalog");
            }
            Ok(Box::new(DemoCatalog::new()))
        }
    }
}
