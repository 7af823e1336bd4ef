//! Marketdir: client-side state core for a directory and marketplace app.
//!
//! The crate owns the state the screens of the app bind to:
//! - Authentication session (identity, access token) backed by an external
//!   identity provider and restored from storage on cold start
//! - User settings (theme, region, online mode, notification delivery) and a
//!   locally cached notification feed, persisted field by field
//! - Filterable, selectable listing collections for businesses, people,
//!   events, vacancies, publications, promotions and vendors

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Startup wiring
//! │  - AppContext, Collaborators                        │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Session       │   │ Settings      │   │ UI state      │
//! │ (session/)    │   │ (settings/)   │   │ (ui/)         │
//! │ - Login/out   │   │ - Preferences │   │ - Filtering   │
//! │ - Restore     │   │ - Feed cache  │   │ - Palettes    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Storage       │ ← │ Worker        │   │ Remote        │
//! │ (storage/)    │   │ (worker/)     │   │ (remote/)     │
//! │ - Key-value   │   │ - Write queue │   │ - HTTP feeds  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure, Observability              │
//! │  - Records and errors (domain/)                     │
//! │  - Paths (infrastructure/)                          │
//! │  - tracing subscriber (observability/)              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```toml
//! data_dir = "~/.local/share/marketdir"
//! default_region = "Lagos"
//! api_base_url = "https://api.example.com/v1"
//! trace_level = "debug"
//! log_file = "marketdir.log"
//!
//! [auth]
//! scope = "openid profile email"
//! redirect_uri = "marketdir://callback"
//! return_to = "marketdir://signed-out"
//! federated_logout = true
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use marketdir::{initialize, Collaborators, Config};
//! # async fn run(identity: Arc<dyn marketdir::session::IdentityProvider>) -> marketdir::Result<()> {
//! let config = Config::from_file("~/.config/marketdir/config.toml")?;
//! let collaborators = Collaborators::open(&config, identity).await?;
//! let app = initialize(&config, collaborators).await;
//!
//! if !app.session().is_authenticated() {
//!     app.session().login("google-oauth2").await?;
//! }
//! app.settings().toggle_theme();
//! app.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod remote;
pub mod session;
pub mod settings;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{AppContext, Collaborators};
pub use domain::{MarketdirError, Result};
pub use session::{SessionManager, SessionState};
pub use settings::{SettingsState, SettingsStore};
pub use ui::{FilterableCollection, Predicate, ThemeMode};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Parameters passed to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Space-separated OAuth scopes. Default: `"openid profile email"`
    pub scope: String,
    /// Where the provider returns after login.
    pub redirect_uri: String,
    /// Where the provider returns after logout.
    pub return_to: String,
    /// Also sign out of the upstream social provider. Default: `true`
    pub federated_logout: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            scope: "openid profile email".to_string(),
            redirect_uri: "marketdir://callback".to_string(),
            return_to: "marketdir://signed-out".to_string(),
            federated_logout: true,
        }
    }
}

/// Application configuration.
///
/// Every field has a default, so an empty map or an empty TOML document is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for the settings store and log files.
    ///
    /// Default: `$XDG_DATA_HOME/marketdir` or `~/.local/share/marketdir`.
    pub data_dir: PathBuf,

    /// Region shown until the user picks one. Default: `"default region"`
    pub default_region: String,

    pub auth: AuthConfig,

    /// Base URL of the content API. Required by [`Collaborators::open`].
    pub api_base_url: Option<String>,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any
    /// `EnvFilter` directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Log to this file instead of stderr. Relative paths live under
    /// `data_dir`.
    pub log_file: Option<String>,

    /// TOML file overriding the light/dark palettes. See [`ui::theme`].
    pub palette_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: infrastructure::get_data_dir(),
            default_region: settings::DEFAULT_REGION.to_string(),
            auth: AuthConfig::default(),
            api_base_url: None,
            trace_level: None,
            log_file: None,
            palette_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from a flat string map.
    ///
    /// Unknown keys are ignored; missing or unparseable values fall back to
    /// their defaults. Auth settings use `auth_scope`, `auth_redirect_uri`,
    /// `auth_return_to` and `federated_logout`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use marketdir::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("default_region".to_string(), "Abuja".to_string());
    /// map.insert("federated_logout".to_string(), "false".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.default_region, "Abuja");
    /// assert!(!config.auth.federated_logout);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let auth = AuthConfig {
            scope: text("auth_scope").unwrap_or(defaults.auth.scope),
            redirect_uri: text("auth_redirect_uri").unwrap_or(defaults.auth.redirect_uri),
            return_to: text("auth_return_to").unwrap_or(defaults.auth.return_to),
            federated_logout: text("federated_logout")
                .and_then(|s| s.parse::<bool>().ok())
                .unwrap_or(defaults.auth.federated_logout),
        };

        Self {
            data_dir: text("data_dir").map_or(defaults.data_dir, |d| infrastructure::expand_tilde(&d)),
            default_region: text("default_region").unwrap_or(defaults.default_region),
            auth,
            api_base_url: text("api_base_url"),
            trace_level: text("trace_level"),
            log_file: text("log_file"),
            palette_file: text("palette_file"),
        }
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`MarketdirError::Config`] if the document is not valid TOML or
    /// a value has the wrong type.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(contents)
            .map_err(|e| MarketdirError::Config(format!("invalid configuration: {e}")))?;
        config.data_dir = infrastructure::expand_tilde(&config.data_dir.to_string_lossy());
        Ok(config)
    }

    /// Reads and parses a TOML configuration file. `~` in `path` is expanded.
    ///
    /// # Errors
    ///
    /// Returns [`MarketdirError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = infrastructure::expand_tilde(&path.as_ref().to_string_lossy());
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            MarketdirError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Initializes logging and starts the application state.
///
/// Installs the tracing subscriber described by `config`, then hydrates the
/// session and settings from `collaborators`. See [`AppContext::start`].
pub async fn initialize(config: &Config, collaborators: Collaborators) -> AppContext {
    observability::init_tracing(config);
    tracing::debug!(data_dir = %config.data_dir.display(), "initializing marketdir");

    AppContext::start(config, collaborators).await
}
