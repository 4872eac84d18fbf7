//! Deployment models

use chrono::{DateTime, Utc};
use openapi_client::models::{CreateProjectResponse, DeploymentDetails};
use serde::{Deserialize, Serialize};

/// Identifiers of the Launch deployment started for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchProjectDetails {
    pub project_uid: String,
    pub environment_uid: String,
    pub deployment_uid: String,
}

impl From<CreateProjectResponse> for LaunchProjectDetails {
    fn from(response: CreateProjectResponse) -> Self {
        Self {
            project_uid: response.project_uid,
            environment_uid: response.environment_uid,
            deployment_uid: response.deployment_uid,
        }
    }
}

/// Status reported by the Launch API for a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    /// Deployment finished successfully
    Live,

    /// Deployment failed
    Error,

    /// Any other value; the raw string is kept for logging
    InProgress(String),
}

impl RemoteStatus {
    /// Classify a raw status string. Matching is exact, as sent by the API.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "LIVE" => RemoteStatus::Live,
            "ERROR" => RemoteStatus::Error,
            other => RemoteStatus::InProgress(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RemoteStatus::Live => "LIVE",
            RemoteStatus::Error => "ERROR",
            RemoteStatus::InProgress(raw) => raw,
        }
    }
}

/// A single status reading of a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentStatusSnapshot {
    pub status: RemoteStatus,
    pub created_at: DateTime<Utc>,
}

impl From<DeploymentDetails> for DeploymentStatusSnapshot {
    fn from(details: DeploymentDetails) -> Self {
        Self {
            status: RemoteStatus::parse(&details.status),
            created_at: details.created_at,
        }
    }
}
