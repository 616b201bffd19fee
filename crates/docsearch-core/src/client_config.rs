//! Client configuration for docsearch.
//!
//! Loaded from `~/.docsearch/config.yaml` (or an explicit path):
//!
//! ```yaml
//! endpoint: http://localhost:50505
//! language: en
//! semanticConfiguration: default
//! requestTimeoutSecs: 30
//! auth:
//!   tokenEnv: DOCSEARCH_TOKEN
//! settings:
//!   useSemanticCaptions: true
//!   includeCategory: hr,finance
//! ```
//!
//! A missing file yields the defaults. `settings` are applied through
//! [`RetrievalConfig::apply`](crate::retrieval::RetrievalConfig::apply) once
//! the deployment features are known, in key order.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    CLIENT_CONFIG_FILENAME, DEFAULT_ENDPOINT, DEFAULT_LANGUAGE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SEMANTIC_CONFIGURATION, DOCSEARCH_HOME_DIR,
};
use crate::errors::{DocSearchError, DocSearchResult};
use crate::settings::{SettingChange, SETTING_FIELDS};

// ============================================================================
// ClientConfig
// ============================================================================

/// Client-side configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the deployment backend.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Query language sent with each request.
    #[serde(default = "default_language")]
    pub language: String,

    /// Semantic configuration name sent with each request.
    #[serde(default = "default_semantic_configuration")]
    pub semantic_configuration: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Initial setting changes keyed by wire field name.
    #[serde(default)]
    pub settings: BTreeMap<String, serde_json::Value>,
}

/// Authorization settings. Login is enabled when `token_env` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Environment variable holding a bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_semantic_configuration() -> String {
    DEFAULT_SEMANTIC_CONFIGURATION.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            language: default_language(),
            semantic_configuration: default_semantic_configuration(),
            request_timeout_secs: default_request_timeout_secs(),
            auth: AuthConfig::default(),
            settings: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Load from the default location (`~/.docsearch/config.yaml`).
    ///
    /// Returns defaults when the home directory cannot be determined or the
    /// file does not exist.
    pub fn load_default() -> DocSearchResult<Self> {
        match Self::default_path() {
            Some(path) => Self::from_path(&path),
            None => {
                tracing::debug!("Home directory not found, using default client config");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific path. A missing file yields the defaults.
    pub fn from_path(path: &Path) -> DocSearchResult<Self> {
        if !path.exists() {
            tracing::debug!(
                "Client config not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| DocSearchError::InvalidClientConfig {
            path: path.to_path_buf(),
            message: format!("failed to read: {}", e),
        })?;

        // An empty file parses as YAML null; treat it as "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| DocSearchError::InvalidClientConfig {
                path: path.to_path_buf(),
                message: format!("failed to parse: {}", e),
            })?;

        for warning in config.validate()? {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// The default config directory (`~/.docsearch`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DOCSEARCH_HOME_DIR))
    }

    /// The default config file path (`~/.docsearch/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|d| d.join(CLIENT_CONFIG_FILENAME))
    }

    /// Parse the `settings` table into setting changes, in key order.
    ///
    /// Unknown fields are skipped.
    pub fn setting_changes(&self) -> DocSearchResult<Vec<SettingChange>> {
        let mut changes = Vec::with_capacity(self.settings.len());
        for (field, value) in &self.settings {
            if let Some(change) = SettingChange::from_value(field, value)? {
                changes.push(change);
            }
        }
        Ok(changes)
    }

    /// Validate the configuration.
    ///
    /// Returns warnings for suspicious but usable values, or an error for
    /// values that make the client unusable.
    pub fn validate(&self) -> DocSearchResult<Vec<String>> {
        let mut warnings = Vec::new();

        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(DocSearchError::InvalidConfiguration {
                message: format!("endpoint '{}' is not an http(s) URL", self.endpoint),
                hint: "Use a URL such as http://localhost:50505".to_string(),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(DocSearchError::InvalidConfiguration {
                message: "requestTimeoutSecs must be greater than 0".to_string(),
                hint: format!("Remove it to use the default of {}", DEFAULT_REQUEST_TIMEOUT_SECS),
            });
        }

        if self.language.trim().is_empty() {
            warnings.push(format!(
                "language is empty; the backend default will apply (suggested: {})",
                DEFAULT_LANGUAGE
            ));
        }

        if self.semantic_configuration.trim().is_empty() {
            warnings.push("semanticConfiguration is empty".to_string());
        }

        if let Some(var) = &self.auth.token_env {
            if var.trim().is_empty() {
                warnings.push("auth.tokenEnv is empty; login stays disabled".to_string());
            }
        }

        for field in self.settings.keys() {
            if !SETTING_FIELDS.contains(&field.as_str()) {
                warnings.push(format!("unknown setting '{}' is ignored", field));
            }
        }

        self.setting_changes()?;

        Ok(warnings)
    }

    /// Name of the token variable when login is enabled.
    pub fn token_env(&self) -> Option<&str> {
        self.auth
            .token_env
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}
