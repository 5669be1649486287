//! Service layer
//!
//! The session and favorites stores own the app's mutable state; the
//! catalog service fronts whichever provider is configured.

mod catalog;
mod favorites;
pub mod logging;
pub mod persisted;
mod session;
pub mod subscribers;

pub use catalog::{CatalogService, MovieCategory, MAX_PAGE, PLACEHOLDER_IMAGE};
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use session::{SessionStore, TOKEN_KEY, USER_KEY};
pub use subscribers::SubscriptionId;
