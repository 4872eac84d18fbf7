//! Error types for Launchpad

use thiserror::Error;

/// Main error type for Launchpad
#[derive(Error, Debug)]
pub enum LaunchpadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("No authorization code in OAuth callback")]
    MissingAuthorizationCode,

    #[error("Token exchange rejected ({status}): {body}")]
    TokenExchangeRejected { status: u16, body: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Deployment status query failed ({status}): {body}")]
    StatusQueryFailed { status: u16, body: String },

    #[error("Launch error: {0}")]
    LaunchError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LaunchpadError {
    /// Machine-readable error kind used in API responses
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::IoError(_) => "io_error",
            Self::JsonError(_) => "json_error",
            Self::HttpError(_) => "http_error",
            Self::MissingAuthorizationCode => "missing_authorization_code",
            Self::TokenExchangeRejected { .. } => "token_exchange_rejected",
            Self::AuthError(_) => "unauthenticated",
            Self::StatusQueryFailed { .. } => "status_query_failed",
            Self::LaunchError(_) => "launch_error",
            Self::SessionError(_) => "session_error",
            Self::ConfigError(_) => "config_error",
            Self::ServerError(_) => "server_error",
            Self::ShutdownError(_) => "shutdown_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<anyhow::Error> for LaunchpadError {
    fn from(err: anyhow::Error) -> Self {
        LaunchpadError::Internal(err.to_string())
    }
}
