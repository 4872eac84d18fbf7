//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::errors::LaunchpadError;
use crate::models::session::Credentials;

/// Header carrying the organization a Launch call acts for
pub const ORGANIZATION_UID_HEADER: &str = "organization_uid";

/// HTTP client for upstream API communication
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LaunchpadError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Make an authenticated GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        credentials: Credentials<'_>,
        on_error: fn(u16, String) -> LaunchpadError,
    ) -> Result<T, LaunchpadError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let request = self.authorize(self.client.get(&url), credentials);
        self.send("GET", request, on_error).await
    }

    /// Make an authenticated POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        credentials: Credentials<'_>,
        body: &B,
        on_error: fn(u16, String) -> LaunchpadError,
    ) -> Result<T, LaunchpadError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let request = self.authorize(self.client.post(&url).json(body), credentials);
        self.send("POST", request, on_error).await
    }

    /// POST a JSON body to an absolute URL without credentials
    pub async fn post_unauthenticated<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        on_error: fn(u16, String) -> LaunchpadError,
    ) -> Result<T, LaunchpadError> {
        debug!("POST {}", url);

        let request = self.client.post(url).json(body);
        self.send("POST", request, on_error).await
    }

    fn authorize(&self, request: RequestBuilder, credentials: Credentials<'_>) -> RequestBuilder {
        request
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", credentials.access_token.expose_secret()),
            )
            .header(ORGANIZATION_UID_HEADER, credentials.organization_uid)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        request: RequestBuilder,
        on_error: fn(u16, String) -> LaunchpadError,
    ) -> Result<T, LaunchpadError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} failed: {} - {}", method, status, body);
            return Err(on_error(status.as_u16(), body));
        }

        let body = response.json().await?;
        Ok(body)
    }
}
