//! Server state

use std::sync::Arc;

use crate::authn::oauth::TokenExchange;
use crate::deploy::fsm::DeploymentStatusSource;
use crate::deploy::launcher::ProjectLauncher;
use crate::session::cookie::CookieOptions;
use crate::session::store::SessionStore;

/// Server state shared across handlers
pub struct ServerState {
    pub sessions: Arc<dyn SessionStore>,
    pub status_source: Arc<dyn DeploymentStatusSource>,
    pub launcher: Arc<dyn ProjectLauncher>,
    pub token_exchange: Arc<dyn TokenExchange>,
    pub cookie: CookieOptions,
    /// Where the deploy page sends the browser once the deployment is live
    pub completion_path: String,
}

impl ServerState {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        status_source: Arc<dyn DeploymentStatusSource>,
        launcher: Arc<dyn ProjectLauncher>,
        token_exchange: Arc<dyn TokenExchange>,
        cookie: CookieOptions,
        completion_path: String,
    ) -> Self {
        Self {
            sessions,
            status_source,
            launcher,
            token_exchange,
            cookie,
            completion_path,
        }
    }
}
