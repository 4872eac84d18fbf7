//! OAuth authorization-code exchange

use std::sync::Arc;

use async_trait::async_trait;
use openapi_client::models::{ErrorResponse, TokenRequest, TokenResponse};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info};

use crate::errors::LaunchpadError;
use crate::http::client::HttpClient;

/// Credentials issued by the token endpoint
pub struct TokenGrant {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub organization_uid: String,
}

impl From<TokenResponse> for TokenGrant {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: SecretString::from(response.access_token),
            refresh_token: SecretString::from(response.refresh_token),
            organization_uid: response.organization_uid,
        }
    }
}

/// Exchanges an authorization code for credentials
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, LaunchpadError>;
}

/// OAuth application registration
#[derive(Debug)]
pub struct OAuthOptions {
    /// Token endpoint
    pub token_url: String,

    /// Redirect URI registered for the app
    pub redirect_uri: String,

    pub client_id: String,

    pub client_secret: SecretString,
}

/// Token exchange against the provider's token endpoint
pub struct OAuthClient {
    http_client: Arc<HttpClient>,
    options: OAuthOptions,
}

impl OAuthClient {
    pub fn new(http_client: Arc<HttpClient>, options: OAuthOptions) -> Self {
        Self {
            http_client,
            options,
        }
    }
}

#[async_trait]
impl TokenExchange for OAuthClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, LaunchpadError> {
        let request = TokenRequest {
            redirect_uri: self.options.redirect_uri.clone(),
            grant_type: "authorization_code".to_string(),
            client_id: self.options.client_id.clone(),
            code: code.to_string(),
            client_secret: self.options.client_secret.expose_secret().to_string(),
        };
        debug!(
            "Exchanging authorization code (client_id={}, redirect_uri={})",
            request.client_id, request.redirect_uri
        );

        let response: TokenResponse = self
            .http_client
            .post_unauthenticated(&self.options.token_url, &request, |status, body| {
                LaunchpadError::TokenExchangeRejected { status, body }
            })
            .await
            .inspect_err(|e| {
                if let LaunchpadError::TokenExchangeRejected { body, .. } = e {
                    if let Ok(reason) = serde_json::from_str::<ErrorResponse>(body) {
                        error!("Token endpoint rejected the code: {}", reason.error);
                    }
                }
            })?;

        info!("Signed in organization {}", response.organization_uid);
        Ok(response.into())
    }
}
