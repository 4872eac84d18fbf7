//! API models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth authorization-code grant request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub redirect_uri: String,
    pub grant_type: String,
    pub client_id: String,
    pub code: String,
    pub client_secret: String,
}

/// OAuth token endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub organization_uid: String,
}

/// Launch deployment lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentDetailsResponse {
    pub deployment: DeploymentDetails,
}

/// Launch deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDetails {
    pub uid: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Launch project creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub environment: String,
}

/// Launch project creation response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    pub project_uid: String,
    pub environment_uid: String,
    pub deployment_uid: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
