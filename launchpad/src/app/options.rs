//! Application configuration options

use std::time::Duration;

use crate::authn::oauth::OAuthOptions;
use crate::deploy::progress::ProgressCalibration;
use crate::http::launch::LaunchProjectOptions;
use crate::server::serve::COMPLETE_PATH;
use crate::session::cookie::CookieOptions;
use crate::workers::poller;

/// Main application options
#[derive(Debug)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Server configuration
    pub server: ServerOptions,

    /// Session cookie configuration
    pub cookie: CookieOptions,

    /// OAuth app registration
    pub oauth: OAuthOptions,

    /// Launch API base URL
    pub launch_base_url: String,

    /// Project created for each visitor
    pub launch_project: LaunchProjectOptions,

    /// Deploy progress configuration
    pub deploy: DeployOptions,

    /// Timeout for upstream HTTP calls
    pub http_timeout: Duration,
}

/// Lifecycle options
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

/// Deploy progress and polling options
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Progress estimate calibration
    pub calibration: ProgressCalibration,

    /// Poll cadence
    pub poller: poller::Options,

    /// Page the deploy loader redirects to once live
    pub completion_path: String,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            calibration: ProgressCalibration::default(),
            poller: poller::Options::default(),
            completion_path: COMPLETE_PATH.to_string(),
        }
    }
}

/// Options of the terminal watch client
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Poll cadence
    pub poller: poller::Options,

    /// Progress estimate calibration
    pub calibration: ProgressCalibration,

    /// Timeout for each request to the deploy page
    pub http_timeout: Duration,
}

/// HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}
