//! Session models

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::authn::oauth::TokenGrant;
use crate::errors::LaunchpadError;
use crate::models::deployment::LaunchProjectDetails;

/// How far a visitor has progressed through onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionProgress {
    /// Signed in, answering the onboarding questions
    Questions,
}

/// Everything the server keeps for one browser session
#[derive(Default)]
pub struct Session {
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
    pub organization_uid: Option<String>,
    pub progress: Option<SessionProgress>,
    pub launch_project_details: Option<LaunchProjectDetails>,
}

impl Session {
    /// Store the credentials of a successful token exchange
    pub fn apply_token_grant(&mut self, grant: TokenGrant) {
        self.access_token = Some(grant.access_token);
        self.refresh_token = Some(grant.refresh_token);
        self.organization_uid = Some(grant.organization_uid);
        self.progress = Some(SessionProgress::Questions);
    }

    /// Borrow the fields the deployment state machine reads
    pub fn deployment(&self) -> DeploymentSession<'_> {
        DeploymentSession {
            launch_project_details: self.launch_project_details.as_ref(),
            access_token: self.access_token.as_ref(),
            organization_uid: self.organization_uid.as_deref(),
        }
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            access_token: self.access_token.as_ref().map(clone_secret),
            refresh_token: self.refresh_token.as_ref().map(clone_secret),
            organization_uid: self.organization_uid.clone(),
            progress: self.progress,
            launch_project_details: self.launch_project_details.clone(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("organization_uid", &self.organization_uid)
            .field("progress", &self.progress)
            .field("launch_project_details", &self.launch_project_details)
            .finish()
    }
}

fn clone_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_owned())
}

/// Session fields consumed by the deployment state machine
#[derive(Debug, Clone, Copy, Default)]
pub struct DeploymentSession<'a> {
    pub launch_project_details: Option<&'a LaunchProjectDetails>,
    pub access_token: Option<&'a SecretString>,
    pub organization_uid: Option<&'a str>,
}

impl<'a> DeploymentSession<'a> {
    /// Credentials for Launch API calls
    pub fn credentials(&self) -> Result<Credentials<'a>, LaunchpadError> {
        let access_token = self
            .access_token
            .ok_or_else(|| LaunchpadError::AuthError("Session has no access token".to_string()))?;
        let organization_uid = self.organization_uid.ok_or_else(|| {
            LaunchpadError::AuthError("Session has no organization uid".to_string())
        })?;

        Ok(Credentials {
            access_token,
            organization_uid,
        })
    }
}

/// Borrowed Launch API credentials
#[derive(Clone, Copy)]
pub struct Credentials<'a> {
    pub access_token: &'a SecretString,
    pub organization_uid: &'a str,
}

impl std::fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("organization_uid", &self.organization_uid)
            .finish_non_exhaustive()
    }
}
