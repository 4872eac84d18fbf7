//! Finite State Machine for the Launch project deployment

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openapi_server::models::DeployState;
use tracing::{debug, info};

use crate::errors::LaunchpadError;
use crate::models::deployment::{DeploymentStatusSnapshot, LaunchProjectDetails, RemoteStatus};
use crate::models::session::{Credentials, DeploymentSession};

/// Lifecycle state of the Launch project, as shown to the visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchProjectState {
    /// No deployment has been started for this session
    NotDeployed,

    /// Deployment started, not finished yet
    Deploying,

    /// Deployment finished successfully
    Live,

    /// Deployment failed
    Error,
}

impl LaunchProjectState {
    /// Progress label shown for the state
    pub fn message(&self) -> &'static str {
        match self {
            LaunchProjectState::NotDeployed => "⏳ Creating Launch project",
            LaunchProjectState::Deploying => "🚀 Deploying Launch project...",
            LaunchProjectState::Live => "Deployment is Live! Redirecting...",
            LaunchProjectState::Error => {
                "❗There was an error deploying the project. Please contact someone from the booth."
            }
        }
    }

    /// Whether no further transition can happen
    pub fn is_terminal(&self) -> bool {
        match self {
            LaunchProjectState::NotDeployed | LaunchProjectState::Deploying => false,
            LaunchProjectState::Live | LaunchProjectState::Error => true,
        }
    }

    /// Whether the view keeps re-fetching status in this state
    pub fn polling_enabled(&self) -> bool {
        !self.is_terminal()
    }
}

impl From<LaunchProjectState> for DeployState {
    fn from(state: LaunchProjectState) -> Self {
        match state {
            LaunchProjectState::NotDeployed => DeployState::NotDeployed,
            LaunchProjectState::Deploying => DeployState::Deploying,
            LaunchProjectState::Live => DeployState::Live,
            LaunchProjectState::Error => DeployState::Error,
        }
    }
}

impl From<DeployState> for LaunchProjectState {
    fn from(state: DeployState) -> Self {
        match state {
            DeployState::NotDeployed => LaunchProjectState::NotDeployed,
            DeployState::Deploying => LaunchProjectState::Deploying,
            DeployState::Live => LaunchProjectState::Live,
            DeployState::Error => LaunchProjectState::Error,
        }
    }
}

/// Outcome of one state derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    /// The view stays in place showing `state`
    Settled {
        state: LaunchProjectState,
        /// Whole seconds since the deployment was created
        duration: Option<u64>,
    },

    /// The deployment is live; navigate to `location`
    Redirect { location: String },
}

impl Derivation {
    pub fn state(&self) -> LaunchProjectState {
        match self {
            Derivation::Settled { state, .. } => *state,
            Derivation::Redirect { .. } => LaunchProjectState::Live,
        }
    }
}

/// Source of deployment status readings
#[async_trait]
pub trait DeploymentStatusSource: Send + Sync {
    /// Fetch the current status of a deployment
    async fn fetch_status(
        &self,
        credentials: Credentials<'_>,
        details: &LaunchProjectDetails,
    ) -> Result<DeploymentStatusSnapshot, LaunchpadError>;
}

/// Whole seconds between `created_at` and `now`, zero if the clocks disagree
pub fn elapsed_seconds(now: DateTime<Utc>, created_at: DateTime<Utc>) -> u64 {
    let seconds = now.signed_duration_since(created_at).num_seconds();
    u64::try_from(seconds).unwrap_or(0)
}

/// Derive the lifecycle state of the session's deployment.
///
/// Sessions without launch project details are `NotDeployed` and no remote
/// call is made. Otherwise a fresh status is fetched; a failed fetch is
/// returned as an error rather than mapped to a state.
pub async fn derive_state<S>(
    session: DeploymentSession<'_>,
    source: &S,
    now: DateTime<Utc>,
    completion_path: &str,
) -> Result<Derivation, LaunchpadError>
where
    S: DeploymentStatusSource + ?Sized,
{
    let Some(details) = session.launch_project_details else {
        return Ok(Derivation::Settled {
            state: LaunchProjectState::NotDeployed,
            duration: None,
        });
    };

    let credentials = session.credentials()?;
    let snapshot = source.fetch_status(credentials, details).await?;
    debug!(
        "Deployment {} status: {}",
        details.deployment_uid,
        snapshot.status.as_str()
    );

    let state = match snapshot.status {
        RemoteStatus::Live => {
            info!(
                "Deployment {} is live, redirecting to {}",
                details.deployment_uid, completion_path
            );
            return Ok(Derivation::Redirect {
                location: completion_path.to_string(),
            });
        }
        RemoteStatus::Error => LaunchProjectState::Error,
        RemoteStatus::InProgress(_) => LaunchProjectState::Deploying,
    };

    Ok(Derivation::Settled {
        state,
        duration: Some(elapsed_seconds(now, snapshot.created_at)),
    })
}
