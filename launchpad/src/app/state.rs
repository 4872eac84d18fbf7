//! Application state management

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::authn::oauth::{OAuthClient, OAuthOptions};
use crate::errors::LaunchpadError;
use crate::http::client::HttpClient;
use crate::http::launch::{LaunchClient, LaunchProjectOptions};
use crate::server::state::ServerState;
use crate::session::cookie::CookieOptions;
use crate::session::store::MemorySessionStore;

/// Main application state
pub struct AppState {
    /// Signed-in visitors
    pub sessions: Arc<MemorySessionStore>,

    /// Launch API client
    pub launch_client: Arc<LaunchClient>,

    /// OAuth token exchange
    pub oauth_client: Arc<OAuthClient>,
}

impl AppState {
    /// Initialize application state
    pub fn init(
        launch_base_url: &str,
        http_timeout: Duration,
        launch_project: LaunchProjectOptions,
        oauth: OAuthOptions,
    ) -> Result<Self, LaunchpadError> {
        info!("Initializing application state...");

        let http_client = Arc::new(HttpClient::new(launch_base_url, http_timeout)?);
        let launch_client = Arc::new(LaunchClient::new(http_client.clone(), launch_project));
        // The token endpoint is addressed by absolute URL
        let oauth_client = Arc::new(OAuthClient::new(http_client, oauth));

        Ok(Self {
            sessions: Arc::new(MemorySessionStore::new()),
            launch_client,
            oauth_client,
        })
    }

    /// State shared by the HTTP handlers
    pub fn server_state(&self, cookie: CookieOptions, completion_path: String) -> ServerState {
        ServerState::new(
            self.sessions.clone(),
            self.launch_client.clone(),
            self.launch_client.clone(),
            self.oauth_client.clone(),
            cookie,
            completion_path,
        )
    }
}
