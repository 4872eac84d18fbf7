//! Launch API client

use std::sync::Arc;

use async_trait::async_trait;
use openapi_client::models::{CreateProjectRequest, CreateProjectResponse, DeploymentDetailsResponse};

use crate::deploy::fsm::DeploymentStatusSource;
use crate::deploy::launcher::ProjectLauncher;
use crate::errors::LaunchpadError;
use crate::http::client::HttpClient;
use crate::models::deployment::{DeploymentStatusSnapshot, LaunchProjectDetails};
use crate::models::session::Credentials;

/// What to create when a visitor starts their deployment
#[derive(Debug, Clone)]
pub struct LaunchProjectOptions {
    /// Project name
    pub name: String,

    /// Environment name
    pub environment: String,
}

impl Default for LaunchProjectOptions {
    fn default() -> Self {
        Self {
            name: "onboarding-starter".to_string(),
            environment: "production".to_string(),
        }
    }
}

/// Launch API client
pub struct LaunchClient {
    http_client: Arc<HttpClient>,
    project: LaunchProjectOptions,
}

impl LaunchClient {
    pub fn new(http_client: Arc<HttpClient>, project: LaunchProjectOptions) -> Self {
        Self {
            http_client,
            project,
        }
    }

    /// Fetch a deployment's status and creation time
    pub async fn fetch_deployment_details(
        &self,
        credentials: Credentials<'_>,
        environment_uid: &str,
        project_uid: &str,
        deployment_uid: &str,
    ) -> Result<DeploymentStatusSnapshot, LaunchpadError> {
        let path = format!(
            "/projects/{}/environments/{}/deployments/{}",
            project_uid, environment_uid, deployment_uid
        );
        let response: DeploymentDetailsResponse = self
            .http_client
            .get(&path, credentials, |status, body| {
                LaunchpadError::StatusQueryFailed { status, body }
            })
            .await?;
        Ok(response.deployment.into())
    }
}

#[async_trait]
impl DeploymentStatusSource for LaunchClient {
    async fn fetch_status(
        &self,
        credentials: Credentials<'_>,
        details: &LaunchProjectDetails,
    ) -> Result<DeploymentStatusSnapshot, LaunchpadError> {
        self.fetch_deployment_details(
            credentials,
            &details.environment_uid,
            &details.project_uid,
            &details.deployment_uid,
        )
        .await
    }
}

#[async_trait]
impl ProjectLauncher for LaunchClient {
    async fn create_project(
        &self,
        credentials: Credentials<'_>,
    ) -> Result<LaunchProjectDetails, LaunchpadError> {
        let request = CreateProjectRequest {
            name: self.project.name.clone(),
            environment: self.project.environment.clone(),
        };
        let response: CreateProjectResponse = self
            .http_client
            .post("/projects", credentials, &request, |status, body| {
                LaunchpadError::LaunchError(format!("{}: {}", status, body))
            })
            .await?;
        Ok(response.into())
    }
}
