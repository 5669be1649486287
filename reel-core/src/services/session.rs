//! Session store - the current identity and its persisted record
//!
//! Authentication is mocked: login accepts one configured account and
//! register accepts anything. Both wait for the configured latency to
//! mimic a network round trip.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::AuthConfig;
use crate::domain::result::{Error, Result};
use crate::domain::{Identity, Session, SessionStatus, SessionToken};
use crate::ports::KeyValueStore;
use crate::services::persisted::{Loaded, PersistedRecord};
use crate::services::subscribers::{SubscriptionId, Subscribers};

/// Storage key of the identity record
pub const USER_KEY: &str = "movieapp_user";

/// Storage key of the token record
pub const TOKEN_KEY: &str = "movieapp_token";

const DEMO_USER_ID: &str = "1";
const DEMO_USER_NAME: &str = "Demo User";

/// Fail with a validation error if any named field is blank
fn require_non_empty(fields: &[(&str, &str)]) -> Result<()> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(Error::validation(format!("{} must not be empty", name))),
        None => Ok(()),
    }
}

/// The token record, stored as bare text rather than JSON
struct TokenRecord {
    storage: Arc<dyn KeyValueStore>,
}

impl TokenRecord {
    fn read(&self) -> Loaded<SessionToken> {
        match self.storage.get(TOKEN_KEY) {
            Ok(Some(bytes)) => match SessionToken::from_stored(&bytes) {
                Some(token) => Loaded::Present(token),
                None => {
                    tracing::warn!(key = TOKEN_KEY, "persisted token is corrupt");
                    Loaded::Corrupt
                }
            },
            Ok(None) => Loaded::Missing,
            Err(e) => {
                tracing::warn!(key = TOKEN_KEY, error = %e, "failed to read persisted token");
                Loaded::Missing
            }
        }
    }

    fn save_logged(&self, token: &SessionToken) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token.as_str().as_bytes()) {
            tracing::warn!(key = TOKEN_KEY, error = %e, "failed to persist token");
        }
    }

    fn erase_logged(&self) {
        if let Err(e) = self.storage.delete(TOKEN_KEY) {
            tracing::warn!(key = TOKEN_KEY, error = %e, "failed to delete persisted token");
        }
    }
}

/// Holds the authenticated identity, if any
pub struct SessionStore {
    user: PersistedRecord<Identity>,
    token: TokenRecord,
    auth: AuthConfig,
    state: Session,
    current_token: Option<SessionToken>,
    subscribers: Subscribers<Session>,
}

impl SessionStore {
    /// Create an un-hydrated store. Call [`SessionStore::hydrate`] before use.
    pub fn new(storage: Arc<dyn KeyValueStore>, auth: AuthConfig) -> Self {
        Self {
            user: PersistedRecord::new(storage.clone(), USER_KEY),
            token: TokenRecord { storage },
            auth,
            state: Session::initializing(),
            current_token: None,
            subscribers: Subscribers::default(),
        }
    }

    /// Load the persisted session. Only the first call has any effect.
    ///
    /// The session is restored only when both records are present and
    /// well-formed. Anything else leaves the user logged out and purges
    /// whatever partial state was stored.
    pub fn hydrate(&mut self) -> bool {
        if self.state.is_ready {
            return false;
        }

        match (self.user.read(), self.token.read()) {
            (Loaded::Present(identity), Loaded::Present(token)) => {
                tracing::debug!(user_id = %identity.id, "restored session");
                self.state.current = Some(identity);
                self.current_token = Some(token);
            }
            (Loaded::Missing, Loaded::Missing) => {
                tracing::debug!("no stored session");
            }
            _ => {
                tracing::warn!("stored session is corrupt or incomplete, logging out");
                self.user.erase_logged();
                self.token.erase_logged();
            }
        }

        self.state.is_ready = true;
        self.notify();
        true
    }

    /// Attempt to log in with the configured demo account
    ///
    /// Returns `Ok(false)` on a credential mismatch, leaving the current
    /// session untouched.
    pub fn login(&mut self, email: &str, credential: &str) -> Result<bool> {
        self.ensure_ready()?;
        require_non_empty(&[("email", email), ("password", credential)])?;

        self.simulate_latency();

        if !self.auth.credentials_match(email, credential) {
            tracing::info!("login rejected");
            return Ok(false);
        }

        self.sign_in(Identity::new(DEMO_USER_ID, email, DEMO_USER_NAME));
        Ok(true)
    }

    /// Register a new identity and sign in as it
    ///
    /// Always succeeds: there is no backend to check the email against.
    /// Replaces any identity that is already signed in.
    pub fn register(&mut self, name: &str, email: &str, credential: &str) -> Result<bool> {
        self.ensure_ready()?;
        require_non_empty(&[("name", name), ("email", email), ("password", credential)])?;

        self.simulate_latency();

        let identity = Identity::new(Uuid::new_v4().to_string(), email.trim(), name.trim());
        self.sign_in(identity);
        Ok(true)
    }

    /// Sign out. Safe to call when nobody is signed in.
    pub fn logout(&mut self) -> Result<()> {
        self.ensure_ready()?;

        self.user.erase_logged();
        self.token.erase_logged();
        self.current_token = None;

        if self.state.current.take().is_some() {
            tracing::debug!("logged out");
            self.notify();
        }
        Ok(())
    }

    /// Current state
    pub fn snapshot(&self) -> Session {
        self.state.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn current(&self) -> Option<&Identity> {
        self.state.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.current_token.as_ref()
    }

    /// Receive a snapshot after every state change
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Session) + Send + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn sign_in(&mut self, identity: Identity) {
        let token = SessionToken::generate();
        self.user.save_logged(&identity);
        self.token.save_logged(&token);

        tracing::debug!(user_id = %identity.id, "signed in");
        self.state.current = Some(identity);
        self.current_token = Some(token);
        self.notify();
    }

    fn simulate_latency(&self) {
        if !self.auth.simulated_latency.is_zero() {
            std::thread::sleep(self.auth.simulated_latency);
        }
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.state.is_ready {
            Ok(())
        } else {
            Err(Error::NotHydrated("session"))
        }
    }

    fn notify(&mut self) {
        let snapshot = self.state.clone();
        self.subscribers.notify(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use std::sync::Mutex;

    fn hydrated(storage: &Arc<InMemoryStore>) -> SessionStore {
        let mut store = SessionStore::new(storage.clone(), AuthConfig::instant());
        store.hydrate();
        store
    }

    #[test]
    fn test_starts_initializing() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = SessionStore::new(storage, AuthConfig::instant());
        assert_eq!(store.status(), SessionStatus::Initializing);
        assert!(!store.is_ready());

        assert!(store.hydrate());
        assert!(!store.hydrate());
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
    }

    #[test]
    fn test_mutators_require_hydration() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = SessionStore::new(storage, AuthConfig::instant());

        let err = store.login("demo@movieapp.com", "demo123").unwrap_err();
        assert!(matches!(err, Error::NotHydrated("session")));
        assert!(store.logout().is_err());
        assert!(store.register("Ann", "ann@x.com", "pw").is_err());
    }

    #[test]
    fn test_login_success() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = hydrated(&storage);

        assert!(store.login("demo@movieapp.com", "demo123").unwrap());
        assert!(store.is_authenticated());
        let identity = store.current().unwrap();
        assert!(!identity.id.is_empty());
        assert_eq!(identity.name, "Demo User");
        assert!(store.token().is_some());
        assert!(storage.contains(USER_KEY));
        assert!(storage.contains(TOKEN_KEY));
    }

    #[test]
    fn test_login_mismatch_leaves_state() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = hydrated(&storage);

        assert!(!store.login("x@x.com", "wrong").unwrap());
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
        assert!(!storage.contains(USER_KEY));
    }

    #[test]
    fn test_login_mismatch_keeps_existing_identity() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = hydrated(&storage);
        store.register("Ann", "ann@x.com", "pw").unwrap();

        assert!(!store.login("demo@movieapp.com", "nope").unwrap());
        assert_eq!(store.current().unwrap().name, "Ann");
    }

    #[test]
    fn test_empty_fields_rejected() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = hydrated(&storage);

        let err = store.login("", "demo123").unwrap_err();
        assert!(err.to_string().contains("email must not be empty"));
        let err = store.register("Ann", "ann@x.com", " ").unwrap_err();
        assert!(err.to_string().contains("password must not be empty"));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_register_replaces_identity() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = hydrated(&storage);

        assert!(store.register("Ann", "ann@x.com", "pw").unwrap());
        let first = store.current().unwrap().clone();
        assert_eq!(first.name, "Ann");

        assert!(store.register("Bob", "bob@x.com", "pw2").unwrap());
        let second = store.current().unwrap().clone();
        assert_eq!(second.name, "Bob");
        assert_eq!(second.email, "bob@x.com");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_session_survives_rehydration() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = hydrated(&storage);
        store.register("Ann", "ann@x.com", "pw").unwrap();
        let token = store.token().cloned();

        let reloaded = hydrated(&storage);
        assert_eq!(reloaded.current().unwrap().name, "Ann");
        assert_eq!(reloaded.token().cloned(), token);
    }

    #[test]
    fn test_logout_clears_records() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = hydrated(&storage);
        store.login("demo@movieapp.com", "demo123").unwrap();

        store.logout().unwrap();
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
        assert!(store.token().is_none());
        // Idempotent
        store.logout().unwrap();

        assert!(!hydrated(&storage).is_authenticated());
    }

    #[test]
    fn test_corrupt_identity_is_purged() {
        let storage = Arc::new(InMemoryStore::new());
        storage.set(USER_KEY, b"{\"id\": 1").unwrap();
        storage.set(TOKEN_KEY, b"\"reel_token\"").unwrap();

        let store = hydrated(&storage);
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
        assert!(!storage.contains(USER_KEY));
        assert!(!storage.contains(TOKEN_KEY));
    }

    #[test]
    fn test_bare_token_record_restores_session() {
        let storage = Arc::new(InMemoryStore::new());
        storage
            .set(USER_KEY, br#"{"id": "1", "email": "demo@movieapp.com", "name": "Demo User"}"#)
            .unwrap();
        storage.set(TOKEN_KEY, b"mock_jwt_token_123").unwrap();

        let store = hydrated(&storage);
        assert!(store.is_authenticated());
        assert_eq!(store.token().unwrap().as_str(), "mock_jwt_token_123");
        assert!(storage.contains(TOKEN_KEY));
    }

    #[test]
    fn test_token_is_written_bare() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = hydrated(&storage);
        store.login("demo@movieapp.com", "demo123").unwrap();

        let stored = storage.get(TOKEN_KEY).unwrap().unwrap();
        assert_eq!(stored, store.token().unwrap().as_str().as_bytes());
    }

    #[test]
    fn test_identity_without_token_is_logged_out() {
        let storage = Arc::new(InMemoryStore::new());
        storage
            .set(USER_KEY, br#"{"id": "1", "email": "a@b.c", "name": "A"}"#)
            .unwrap();

        let store = hydrated(&storage);
        assert!(!store.is_authenticated());
        assert!(!storage.contains(USER_KEY));
    }

    #[test]
    fn test_subscribers_see_each_transition() {
        let storage = Arc::new(InMemoryStore::new());
        let mut store = SessionStore::new(storage, AuthConfig::instant());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |session| sink.lock().unwrap().push(session.status()));

        store.hydrate();
        store.login("demo@movieapp.com", "demo123").unwrap();
        store.login("demo@movieapp.com", "bad").unwrap();
        store.logout().unwrap();
        store.logout().unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                SessionStatus::Unauthenticated,
                SessionStatus::Authenticated,
                SessionStatus::Unauthenticated,
            ]
        );
    }
}
