//! Launch project initiation

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::errors::LaunchpadError;
use crate::models::deployment::LaunchProjectDetails;
use crate::models::session::{Credentials, Session};

/// Creates the Launch project and its first deployment
#[async_trait]
pub trait ProjectLauncher: Send + Sync {
    async fn create_project(
        &self,
        credentials: Credentials<'_>,
    ) -> Result<LaunchProjectDetails, LaunchpadError>;
}

/// Result of an initiation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initiation {
    /// A new deployment was created and stored in the session
    Started(LaunchProjectDetails),

    /// The session already had a deployment; nothing was done
    AlreadyStarted(LaunchProjectDetails),
}

/// Start the session's deployment unless it already has one.
///
/// The session is only modified when the launcher succeeds.
pub async fn initiate<L>(session: &mut Session, launcher: &L) -> Result<Initiation, LaunchpadError>
where
    L: ProjectLauncher + ?Sized,
{
    if let Some(details) = &session.launch_project_details {
        return Ok(Initiation::AlreadyStarted(details.clone()));
    }

    let details = {
        let credentials = session.deployment().credentials()?;
        launcher.create_project(credentials).await?
    };
    info!(
        "Launch project {} created, deployment {}",
        details.project_uid, details.deployment_uid
    );

    session.launch_project_details = Some(details.clone());
    Ok(Initiation::Started(details))
}

/// Lets the initiation request through at most once
#[derive(Debug, Default)]
pub struct InitiationGuard {
    fired: AtomicBool,
}

impl InitiationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time only
    pub fn try_fire(&self) -> bool {
        !self.fired.swap(true, Ordering::SeqCst)
    }
}
