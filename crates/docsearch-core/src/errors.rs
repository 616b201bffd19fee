//! Error types for docsearch-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for docsearch-core operations.
pub type DocSearchResult<T> = Result<T, DocSearchError>;

/// Domain-specific errors for the document search session.
///
/// None of these are fatal to a session: the controller absorbs them at its
/// boundary and turns them into state (degraded options, an error status, or
/// a rejected setting change).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocSearchError {
    /// Deployment features could not be fetched or parsed.
    #[error("Failed to load deployment features: {0}")]
    ConfigLoad(String),

    /// The search transport failed (network, HTTP status or body parse).
    ///
    /// Displays as the bare description so it can be shown to the user as-is.
    #[error("{0}")]
    SearchTransport(String),

    /// A setting change targeted an option the deployment does not offer.
    #[error("Setting `{field}` cannot be enabled: {reason}")]
    InvalidSettingChange {
        /// Wire name of the rejected field.
        field: &'static str,
        /// Which visibility flag gated it.
        reason: String,
    },

    /// A known setting field received a value of the wrong shape.
    #[error("Invalid value for setting `{field}`: {message}")]
    InvalidSettingValue {
        /// Wire name of the field.
        field: String,
        /// What was wrong with the value.
        message: String,
    },

    /// An authorization token could not be acquired.
    #[error("Access token unavailable: {0}")]
    TokenUnavailable(String),

    /// The client configuration file exists but cannot be read or parsed.
    #[error("Client config invalid at {path}: {message}")]
    InvalidClientConfig {
        /// Path to the config file.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// The audio player refused to start or stop.
    #[error("Playback failed: {0}")]
    Playback(String),
}

impl DocSearchError {
    /// Returns true if this error belongs to the search transport class.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::SearchTransport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_displays_bare_message() {
        let err = DocSearchError::SearchTransport("timeout".to_string());
        assert_eq!(err.to_string(), "timeout");
        assert!(err.is_transport());
    }

    #[test]
    fn test_invalid_configuration_includes_hint() {
        let err = DocSearchError::InvalidConfiguration {
            message: "requestTimeoutSecs cannot be 0".to_string(),
            hint: "Set it to at least 1".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("requestTimeoutSecs cannot be 0"));
        assert!(text.contains("Set it to at least 1"));
        assert!(!err.is_transport());
    }
}
