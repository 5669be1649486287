//! Identity and session domain model

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Represents an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    /// Display name
    pub name: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Opaque token stored next to the identity record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    const PREFIX: &'static str = "reel_";

    /// Generate a fresh random token
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(format!("{}{}", Self::PREFIX, URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a stored token record
    ///
    /// Tokens are written as bare text. A JSON string is accepted too.
    /// Returns `None` for empty records and anything with whitespace or
    /// control characters.
    pub fn from_stored(bytes: &[u8]) -> Option<Self> {
        let text = if bytes.first() == Some(&b'"') {
            serde_json::from_slice::<String>(bytes).ok()?
        } else {
            std::str::from_utf8(bytes).ok()?.to_string()
        };

        let valid = !text.is_empty() && !text.chars().any(|c| c.is_whitespace() || c.is_control());
        valid.then_some(Self(text))
    }
}

/// Where the session store is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// Immutable snapshot of the session store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub current: Option<Identity>,
    pub is_ready: bool,
}

impl Session {
    /// State before hydration
    pub fn initializing() -> Self {
        Self {
            current: None,
            is_ready: false,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match (&self.current, self.is_ready) {
            (_, false) => SessionStatus::Initializing,
            (None, true) => SessionStatus::Unauthenticated,
            (Some(_), true) => SessionStatus::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }
}
