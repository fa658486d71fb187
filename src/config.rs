//! Configuration: YAML file plus environment overrides
//!
//! Looked up at `--config <path>` or `<config dir>/wdpatch/config.yaml`
//! (e.g. `~/.config/wdpatch/config.yaml`). Every field is optional:
//!
//! ```yaml
//! api_url: https://www.wikidata.org/w/api.php
//! username: ExampleBot@wdpatch
//! password: bot-password
//! maxlag: 5
//! bot: true
//! default_summary: Sync external identifiers
//! blocklist: [Q42]
//! blocklist_page: User:ExampleBot/Blocklist
//! ```

use crate::entity::ItemId;
use crate::wiki::{ApiClient, WikiResult, WIKIDATA_API};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Can't read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid blocklist entry: {0}")]
    InvalidBlocklistEntry(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error(
        "Missing credentials: set username and password in the config \
         or QUICKSTATEMENTS_USERNAME / WIKIDATA_USERNAME and WIKIDATA_PASSWORD"
    )]
    MissingCredentials,
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    /// Bot-password user name (`User@botname`)
    pub username: Option<String>,
    pub password: Option<String>,
    pub user_agent: String,
    /// `maxlag` sent with writes
    pub maxlag: Option<u32>,
    /// Mark edits as bot edits
    pub bot: bool,
    /// Summary for items whose patch carries none
    pub default_summary: Option<String>,
    /// Items that must never be edited
    pub blocklist: Vec<String>,
    /// Wiki page whose `Q` ids are added to the blocklist
    pub blocklist_page: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: WIKIDATA_API.to_string(),
            username: None,
            password: None,
            user_agent: format!("wdpatch/{}", env!("CARGO_PKG_VERSION")),
            maxlag: Some(5),
            bot: false,
            default_summary: None,
            blocklist: Vec::new(),
            blocklist_page: None,
        }
    }
}

impl Config {
    /// `<config dir>/wdpatch/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wdpatch").join("config.yaml"))
    }

    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_yaml(&yaml)
    }

    /// Load an explicit path (which must exist) or the default path (which
    /// may not), then apply environment overrides.
    pub fn discover(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
    }

    /// Apply overrides from a variable lookup.
    ///
    /// `QUICKSTATEMENTS_USERNAME` (or `WIKIDATA_USERNAME`), `WIKIDATA_PASSWORD`
    /// and `WDPATCH_API_URL`.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let username = lookup("QUICKSTATEMENTS_USERNAME").or_else(|| lookup("WIKIDATA_USERNAME"));
        if let Some(username) = username {
            self.username = Some(username);
        }
        if let Some(password) = lookup("WIKIDATA_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(api_url) = lookup("WDPATCH_API_URL") {
            self.api_url = api_url;
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_url is empty".to_string()));
        }
        if self.blocklist_page.as_deref().is_some_and(|page| page.trim().is_empty()) {
            return Err(ConfigError::Invalid("blocklist_page is empty".to_string()));
        }
        self.blocked_items()?;
        Ok(())
    }

    pub fn blocked_items(&self) -> ConfigResult<Vec<ItemId>> {
        self.blocklist
            .iter()
            .map(|entry| {
                ItemId::parse(entry.trim())
                    .ok_or_else(|| ConfigError::InvalidBlocklistEntry(entry.clone()))
            })
            .collect()
    }

    pub fn credentials(&self) -> ConfigResult<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok((username.as_str(), password.as_str())),
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    /// Build the HTTP client this configuration describes.
    pub fn api_client(&self) -> WikiResult<ApiClient> {
        let client = ApiClient::new(&self.api_url, &self.user_agent)?
            .with_maxlag(self.maxlag)
            .with_bot(self.bot);
        Ok(match self.credentials() {
            Ok((username, password)) => client.with_login(username, password),
            Err(_) => client,
        })
    }
}
