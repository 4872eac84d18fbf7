//! Deploy page accessed over HTTP, the way a browser tab does

use std::time::Duration;

use async_trait::async_trait;
use http::header::{HeaderValue, ACCEPT, COOKIE, LOCATION};
use openapi_server::models::DeployLoaderResponse;
use reqwest::{redirect, Client};
use tracing::debug;
use url::Url;

use crate::deploy::fsm::Derivation;
use crate::errors::LaunchpadError;
use crate::server::serve::{DEPLOY_PATH, LAUNCH_PROJECT_PATH};
use crate::session::store::SessionId;
use crate::workers::poller::DeployView;

/// Deploy page of a running Launchpad server, bound to one session
pub struct RemoteDeployView {
    client: Client,
    deploy_url: Url,
    launch_url: Url,
    cookie: HeaderValue,
}

impl RemoteDeployView {
    pub fn new(
        server_url: &str,
        cookie_name: &str,
        session_id: &SessionId,
        timeout: Duration,
    ) -> Result<Self, LaunchpadError> {
        let base = Url::parse(server_url)
            .map_err(|e| LaunchpadError::ConfigError(format!("Invalid server URL: {}", e)))?;
        let deploy_url = base
            .join(DEPLOY_PATH)
            .map_err(|e| LaunchpadError::ConfigError(e.to_string()))?;
        let launch_url = base
            .join(LAUNCH_PROJECT_PATH)
            .map_err(|e| LaunchpadError::ConfigError(e.to_string()))?;
        let cookie = HeaderValue::from_str(&format!("{}={}", cookie_name, session_id))
            .map_err(|e| LaunchpadError::ConfigError(format!("Invalid cookie: {}", e)))?;

        // Redirects are the loader's navigation signal, so they must not be followed
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            deploy_url,
            launch_url,
            cookie,
        })
    }
}

#[async_trait]
impl DeployView for RemoteDeployView {
    async fn load(&self) -> Result<Derivation, LaunchpadError> {
        debug!("GET {}", self.deploy_url);
        let response = self
            .client
            .get(self.deploy_url.clone())
            .header(COOKIE, self.cookie.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| {
                    LaunchpadError::Internal(format!("{} redirect without location", status))
                })?;
            return Ok(Derivation::Redirect {
                location: location.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LaunchpadError::StatusQueryFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body: DeployLoaderResponse = response.json().await?;
        Ok(Derivation::Settled {
            state: body.state.into(),
            duration: body.duration,
        })
    }

    async fn launch_project(&self) -> Result<(), LaunchpadError> {
        debug!("POST {}", self.launch_url);
        let response = self
            .client
            .post(self.launch_url.clone())
            .header(COOKIE, self.cookie.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LaunchpadError::LaunchError(format!("{}: {}", status, body)));
        }
        Ok(())
    }
}
