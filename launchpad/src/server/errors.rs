//! HTTP mapping of Launchpad errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openapi_server::models::ErrorResponse;
use tracing::{error, warn};

use crate::errors::LaunchpadError;

impl LaunchpadError {
    /// Status code returned to the browser
    pub fn status_code(&self) -> StatusCode {
        match self {
            LaunchpadError::MissingAuthorizationCode | LaunchpadError::SessionError(_) => {
                StatusCode::BAD_REQUEST
            }
            LaunchpadError::AuthError(_) => StatusCode::UNAUTHORIZED,
            LaunchpadError::TokenExchangeRejected { .. }
            | LaunchpadError::StatusQueryFailed { .. }
            | LaunchpadError::LaunchError(_)
            | LaunchpadError::HttpError(_) => StatusCode::BAD_GATEWAY,
            LaunchpadError::IoError(_)
            | LaunchpadError::JsonError(_)
            | LaunchpadError::ConfigError(_)
            | LaunchpadError::ServerError(_)
            | LaunchpadError::ShutdownError(_)
            | LaunchpadError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LaunchpadError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
