//! Core domain entities
//!
//! Pure data structures - no I/O or external dependencies.

mod favorites;
mod identity;
mod movie;
pub mod result;

pub use favorites::FavoritesSnapshot;
pub use identity::{Identity, Session, SessionStatus, SessionToken};
pub use movie::{
    Genre, Movie, MovieDetails, MovieId, MoviePage, ProductionCompany, ProductionCountry,
    SpokenLanguage,
};
