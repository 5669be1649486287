//! Configuration management
//!
//! Settings live in `<reel dir>/settings.json`:
//! ```json
//! {
//!   "app": { "demoMode": false },
//!   "catalog": { "apiKey": "...", "baseUrl": "...", "imageBaseUrl": "..." },
//!   "auth": { "simulatedLatencyMs": 1000, "demoEmail": "...", "demoPasswordSha256": "..." }
//! }
//! ```
//! Keys this crate doesn't know about are preserved on save.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::adapters::tmdb::{TMDB_BASE_URL_ENV, TMDB_PRODUCTION_URL};

/// Environment variable holding the TMDB API key
pub const TMDB_API_KEY_ENV: &str = "REEL_TMDB_API_KEY";

/// Environment variable forcing demo mode on or off
pub const DEMO_MODE_ENV: &str = "REEL_DEMO_MODE";

/// Default TMDB image CDN root
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Account accepted by the mock login
pub const DEMO_EMAIL: &str = "demo@movieapp.com";

/// SHA-256 of the demo account password ("demo123")
pub const DEMO_PASSWORD_SHA256: &str =
    "d3ad9315b7be5dd53b31a273b3b3aba5defe700808305aa16a3062b76658a791";

const DEFAULT_LATENCY_MS: u64 = 1000;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    catalog: CatalogSettings,
    #[serde(default)]
    auth: AuthSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_base_url: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    simulated_latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    demo_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    demo_password_sha256: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Catalog connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: TMDB_PRODUCTION_URL.to_string(),
            image_base_url: TMDB_IMAGE_BASE_URL.to_string(),
        }
    }
}

/// Mock authentication settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Delay applied to login and register
    pub simulated_latency: Duration,
    pub demo_email: String,
    /// Hex SHA-256 of the accepted password
    pub demo_password_sha256: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            simulated_latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            demo_email: DEMO_EMAIL.to_string(),
            demo_password_sha256: DEMO_PASSWORD_SHA256.to_string(),
        }
    }
}

impl AuthConfig {
    /// Default account with no simulated latency
    pub fn instant() -> Self {
        Self {
            simulated_latency: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Whether `email` and `credential` are the accepted pair
    pub fn credentials_match(&self, email: &str, credential: &str) -> bool {
        let digest = hex::encode(Sha256::digest(credential.as_bytes()));
        email == self.demo_email && digest.eq_ignore_ascii_case(&self.demo_password_sha256)
    }
}

/// Reel configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
    pub catalog: CatalogConfig,
    pub auth: AuthConfig,
    // Environment-supplied keys are never written back
    api_key_from_env: bool,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

/// Parse a boolean-ish environment value
fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "TRUE" | "YES" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load config from the reel directory
    ///
    /// Environment variables take precedence over the settings file:
    /// `REEL_TMDB_API_KEY`, `REEL_TMDB_BASE_URL` and `REEL_DEMO_MODE`.
    pub fn load(reel_dir: &Path) -> Result<Self> {
        let settings_path = reel_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "settings.json is invalid, using defaults");
                SettingsFile::default()
            })
        } else {
            SettingsFile::default()
        };

        let demo_mode = std::env::var(DEMO_MODE_ENV)
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(raw.app.demo_mode);

        let env_api_key = non_empty(std::env::var(TMDB_API_KEY_ENV).ok());
        let api_key_from_env = env_api_key.is_some();
        let catalog = CatalogConfig {
            api_key: env_api_key.or_else(|| non_empty(raw.catalog.api_key.clone())),
            base_url: non_empty(std::env::var(TMDB_BASE_URL_ENV).ok())
                .or_else(|| non_empty(raw.catalog.base_url.clone()))
                .unwrap_or_else(|| TMDB_PRODUCTION_URL.to_string()),
            image_base_url: non_empty(raw.catalog.image_base_url.clone())
                .unwrap_or_else(|| TMDB_IMAGE_BASE_URL.to_string()),
        };

        let defaults = AuthConfig::default();
        let auth = AuthConfig {
            simulated_latency: raw
                .auth
                .simulated_latency_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.simulated_latency),
            demo_email: non_empty(raw.auth.demo_email.clone()).unwrap_or(defaults.demo_email),
            demo_password_sha256: non_empty(raw.auth.demo_password_sha256.clone())
                .unwrap_or(defaults.demo_password_sha256),
        };

        Ok(Self {
            demo_mode,
            catalog,
            auth,
            api_key_from_env,
            _raw_settings: raw,
        })
    }

    /// Save config to the reel directory
    ///
    /// Only the demo flag and the API key are written back; everything else
    /// in the file is preserved as found. A key taken from
    /// `REEL_TMDB_API_KEY` stays out of the file.
    pub fn save(&self, reel_dir: &Path) -> Result<()> {
        let settings_path = reel_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.demo_mode = self.demo_mode;
        if !self.api_key_from_env {
            settings.catalog.api_key = self.catalog.api_key.clone();
        }

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Whether a TMDB key is available
    pub fn has_api_key(&self) -> bool {
        self.catalog.api_key.is_some()
    }

    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}
