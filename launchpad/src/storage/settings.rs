//! Settings file management

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::options::{
    AppOptions, DeployOptions, LifecycleOptions, ServerOptions, WatchOptions,
};
use crate::authn::oauth::OAuthOptions;
use crate::deploy::progress::ProgressCalibration;
use crate::errors::LaunchpadError;
use crate::filesys::file::File;
use crate::http::launch::LaunchProjectOptions;
use crate::logs::LogLevel;
use crate::session::cookie::CookieOptions;
use crate::workers::poller;

/// Settings file read when no `--config` is given
pub const DEFAULT_SETTINGS_PATH: &str = "/etc/launchpad/settings.json";

/// Timeout for upstream and deploy page requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the OAuth client secret
pub const CLIENT_SECRET_ENV: &str = "LAUNCHPAD_CLIENT_SECRET";

/// Launchpad settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory for rolling log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Emit JSON logs
    #[serde(default)]
    pub log_json: bool,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Session cookie configuration
    #[serde(default)]
    pub session: SessionSettings,

    /// OAuth app configuration
    #[serde(default)]
    pub oauth: OAuthSettings,

    /// Launch API configuration
    #[serde(default)]
    pub launch: LaunchSettings,

    /// Deploy progress configuration
    #[serde(default)]
    pub deploy: DeploySettings,
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(file: &File) -> Result<Self, LaunchpadError> {
        let mut settings: Settings = file.read_json().await.map_err(|e| {
            LaunchpadError::ConfigError(format!(
                "Unable to read settings file {}: {}",
                file.path().display(),
                e
            ))
        })?;

        if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            settings.oauth.client_secret = secret;
        }

        Ok(settings)
    }

    /// Validate and convert into application options
    pub fn to_app_options(&self) -> Result<AppOptions, LaunchpadError> {
        validate_url("oauth.token_url", &self.oauth.token_url)?;
        validate_url("oauth.redirect_uri", &self.oauth.redirect_uri)?;
        validate_url("launch.base_url", &self.launch.base_url)?;

        if self.oauth.client_id.is_empty() {
            return Err(LaunchpadError::ConfigError(
                "oauth.client_id is required".to_string(),
            ));
        }
        if self.oauth.client_secret.is_empty() {
            return Err(LaunchpadError::ConfigError(format!(
                "oauth.client_secret is required (or set {})",
                CLIENT_SECRET_ENV
            )));
        }
        self.validate_deploy()?;

        Ok(AppOptions {
            server: ServerOptions {
                host: self.server.host.clone(),
                port: self.server.port,
            },
            cookie: CookieOptions {
                name: self.session.cookie_name.clone(),
                secure: self.session.secure,
            },
            oauth: OAuthOptions {
                token_url: self.oauth.token_url.clone(),
                redirect_uri: self.oauth.redirect_uri.clone(),
                client_id: self.oauth.client_id.clone(),
                client_secret: SecretString::from(self.oauth.client_secret.clone()),
            },
            launch_base_url: self.launch.base_url.clone(),
            launch_project: LaunchProjectOptions {
                name: self.launch.project_name.clone(),
                environment: self.launch.environment_name.clone(),
            },
            deploy: DeployOptions {
                calibration: self.calibration(),
                poller: self.poller_options(),
                completion_path: self.deploy.completion_path.clone(),
            },
            lifecycle: LifecycleOptions::default(),
            http_timeout: HTTP_TIMEOUT,
        })
    }

    /// Options for the terminal watch client, which needs no OAuth app
    pub fn to_watch_options(&self) -> Result<WatchOptions, LaunchpadError> {
        self.validate_deploy()?;
        Ok(WatchOptions {
            poller: self.poller_options(),
            calibration: self.calibration(),
            http_timeout: HTTP_TIMEOUT,
        })
    }

    fn validate_deploy(&self) -> Result<(), LaunchpadError> {
        if self.deploy.average_deploy_secs == 0 {
            return Err(LaunchpadError::ConfigError(
                "deploy.average_deploy_secs must be positive".to_string(),
            ));
        }
        if self.deploy.poll_interval_secs == 0 {
            return Err(LaunchpadError::ConfigError(
                "deploy.poll_interval_secs must be positive".to_string(),
            ));
        }
        if !self.deploy.completion_path.starts_with('/') {
            return Err(LaunchpadError::ConfigError(
                "deploy.completion_path must be an absolute path".to_string(),
            ));
        }
        Ok(())
    }

    fn calibration(&self) -> ProgressCalibration {
        ProgressCalibration {
            average_deploy_secs: self.deploy.average_deploy_secs,
        }
    }

    fn poller_options(&self) -> poller::Options {
        poller::Options {
            interval: Duration::from_secs(self.deploy.poll_interval_secs),
        }
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), LaunchpadError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| LaunchpadError::ConfigError(format!("{} is not a valid URL: {}", field, e)))
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Session cookie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Only send the cookie over HTTPS
    #[serde(default)]
    pub secure: bool,
}

fn default_cookie_name() -> String {
    "__session".to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure: false,
        }
    }
}

/// OAuth app settings
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthSettings {
    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    #[serde(default)]
    pub client_id: String,

    /// Prefer the `LAUNCHPAD_CLIENT_SECRET` environment variable
    #[serde(default, skip_serializing)]
    pub client_secret: String,
}

fn default_token_url() -> String {
    "https://app.contentstack.com/apps-api/token".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:3000/oauth/callback".to_string()
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            token_url: default_token_url(),
            redirect_uri: default_redirect_uri(),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }
}

impl std::fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSettings")
            .field("token_url", &self.token_url)
            .field("redirect_uri", &self.redirect_uri)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Launch API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchSettings {
    #[serde(default = "default_launch_url")]
    pub base_url: String,

    #[serde(default = "default_project_name")]
    pub project_name: String,

    #[serde(default = "default_environment_name")]
    pub environment_name: String,
}

fn default_launch_url() -> String {
    "https://launch-api.contentstack.com/v1".to_string()
}

fn default_project_name() -> String {
    LaunchProjectOptions::default().name
}

fn default_environment_name() -> String {
    LaunchProjectOptions::default().environment
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            base_url: default_launch_url(),
            project_name: default_project_name(),
            environment_name: default_environment_name(),
        }
    }
}

/// Deploy progress settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploySettings {
    /// Typical deployment duration used by the progress estimate
    #[serde(default = "default_average_deploy_secs")]
    pub average_deploy_secs: u64,

    /// Seconds between status polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Page shown once the deployment is live
    #[serde(default = "default_completion_path")]
    pub completion_path: String,
}

fn default_average_deploy_secs() -> u64 {
    ProgressCalibration::default().average_deploy_secs
}

fn default_poll_interval_secs() -> u64 {
    poller::Options::default().interval.as_secs()
}

fn default_completion_path() -> String {
    crate::server::serve::COMPLETE_PATH.to_string()
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            average_deploy_secs: default_average_deploy_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            completion_path: default_completion_path(),
        }
    }
}
