//! Configuration loading for citysuggestd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.citysuggest/config.toml` (user)
//! 3. `/etc/citysuggest/config.toml` (system)
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.citysuggest/secrets.toml` (user, must be 0600)
//! 2. `/etc/citysuggest/secrets.toml` (system, must be 0600)

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(feature = "firestore")]
use crate::store::FirestoreConfig;
#[cfg(feature = "openai")]
use crate::providers::OpenAiConfig;
use crate::resolver::{DEFAULT_COOLDOWN, DEFAULT_MAX_SUGGESTIONS};
use crate::{CitySuggestError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8787).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8787".to_string()
}

/// Lookup policy settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Page size (default: 5).
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Minimum seconds between fallback calls (default: 21600, six hours).
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl ResolverConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

fn default_cooldown_secs() -> u64 {
    DEFAULT_COOLDOWN.as_secs()
}

/// Which store backend to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Firestore,
}

/// Store configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// JSON seed file for the memory backend.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
    #[cfg(feature = "firestore")]
    #[serde(default)]
    pub firestore: Option<FirestoreConfig>,
}

/// Fallback provider configurations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    #[cfg(feature = "openai")]
    #[serde(default)]
    pub openai: Option<OpenAiConfig>,
}

/// Secrets configuration (API keys and tokens).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub openai: Option<ApiKeySecret>,
    #[serde(default)]
    pub firestore: Option<TokenSecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// A bearer token secret.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSecret {
    pub token: String,
}

const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
const FIRESTORE_TOKEN_ENV: &str = "FIRESTORE_TOKEN";

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.citysuggest/config.toml`
    /// 3. `/etc/citysuggest/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        let content = fs::read_to_string(&path).map_err(|e| {
            CitySuggestError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::parse(&content).map_err(|e| match e {
            CitySuggestError::Configuration(msg) => {
                CitySuggestError::Configuration(format!("{msg} (in {path:?})"))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            CitySuggestError::Configuration(format!("Failed to parse config: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(CitySuggestError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".citysuggest").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/citysuggest/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(CitySuggestError::Configuration(
            "No config file found. Create ~/.citysuggest/config.toml or /etc/citysuggest/config.toml"
                .to_string(),
        ))
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.citysuggest/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/citysuggest/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (keys may come from env vars).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".citysuggest").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/citysuggest/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a specific secrets file, enforcing permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            CitySuggestError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            CitySuggestError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            CitySuggestError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(CitySuggestError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// OpenAI API key, falling back to `OPENAI_API_KEY`.
    pub fn openai_api_key(&self) -> Option<String> {
        self.openai
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| std::env::var(OPENAI_API_KEY_ENV).ok())
    }

    /// Firestore bearer token, falling back to `FIRESTORE_TOKEN`.
    pub fn firestore_token(&self) -> Option<String> {
        self.firestore
            .as_ref()
            .map(|s| s.token.clone())
            .or_else(|| std::env::var(FIRESTORE_TOKEN_ENV).ok())
    }
}
