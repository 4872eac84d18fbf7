//! Launchpad API models

use serde::{Deserialize, Serialize};

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Version response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Launch project lifecycle state as seen by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeployState {
    NotDeployed,
    Deploying,
    Live,
    Error,
}

/// Deploy page loader response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployLoaderResponse {
    pub state: DeployState,
    /// Seconds since the deployment was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// Launch project initiation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchProjectResponse {
    /// False when the session already had a deployment
    pub initiated: bool,
    pub message: String,
}

/// Completion page response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
