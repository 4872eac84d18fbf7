//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use openapi_server::models::{
    CompleteResponse, DeployLoaderResponse, HealthResponse, LaunchProjectResponse,
    VersionResponse,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::deploy::fsm::{derive_state, Derivation};
use crate::deploy::launcher::{initiate, Initiation};
use crate::errors::LaunchpadError;
use crate::models::session::Session;
use crate::server::state::ServerState;
use crate::session::store::SessionId;
use crate::utils::version_info;

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "launchpad".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
    })
}

/// OAuth callback query
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
}

/// OAuth callback handler.
///
/// Exchanges the code, stores the credentials in the session and sends the
/// browser to the start of the onboarding flow.
pub async fn oauth_callback_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<Response, LaunchpadError> {
    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or(LaunchpadError::MissingAuthorizationCode)?;

    let grant = state.token_exchange.exchange_code(&code).await?;

    // Signing in always issues a new id; only a session this server stored
    // under the presented id is carried over
    let previous = match state.cookie.session_id(&headers) {
        Some(previous_id) => state.sessions.remove(&previous_id).await?,
        None => None,
    };
    let mut session = Session {
        launch_project_details: previous.and_then(|session| session.launch_project_details),
        ..Default::default()
    };
    session.apply_token_grant(grant);

    let id = SessionId::generate();
    state.sessions.save(&id, session).await?;
    info!("Session {} signed in", id);

    let cookie = state.cookie.set_cookie(&id)?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// Deploy page loader.
///
/// Answers with the current lifecycle state, or redirects to the completion
/// page once the deployment is live.
pub async fn deploy_loader_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<Response, LaunchpadError> {
    let session = load_session(&state, &headers).await?.unwrap_or_default();

    let derivation = derive_state(
        session.deployment(),
        state.status_source.as_ref(),
        Utc::now(),
        &state.completion_path,
    )
    .await?;
    debug!("Deploy loader derived {:?}", derivation);

    match derivation {
        Derivation::Redirect { location } => Ok(Redirect::to(&location).into_response()),
        Derivation::Settled { state, duration } => Ok(Json(DeployLoaderResponse {
            state: state.into(),
            duration,
        })
        .into_response()),
    }
}

/// Launch project initiation handler
pub async fn launch_project_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<LaunchProjectResponse>), LaunchpadError> {
    let id = state
        .cookie
        .session_id(&headers)
        .ok_or_else(|| LaunchpadError::AuthError("No session cookie".to_string()))?;
    let mut session = state
        .sessions
        .load(&id)
        .await?
        .ok_or_else(|| LaunchpadError::AuthError("Unknown session".to_string()))?;

    match initiate(&mut session, state.launcher.as_ref()).await? {
        Initiation::Started(details) => {
            // Other requests may have written the session while the project was created
            let mut latest = state.sessions.load(&id).await?.unwrap_or(session);
            if latest.launch_project_details.is_none() {
                latest.launch_project_details = Some(details.clone());
            }
            state.sessions.save(&id, latest).await?;
            Ok((
                StatusCode::ACCEPTED,
                Json(LaunchProjectResponse {
                    initiated: true,
                    message: format!("Deployment {} started", details.deployment_uid),
                }),
            ))
        }
        Initiation::AlreadyStarted(details) => Ok((
            StatusCode::OK,
            Json(LaunchProjectResponse {
                initiated: false,
                message: format!("Deployment {} already started", details.deployment_uid),
            }),
        )),
    }
}

/// Completion page handler
pub async fn complete_handler() -> impl IntoResponse {
    Json(CompleteResponse {
        message: "Your Launch project is live".to_string(),
    })
}

async fn load_session(
    state: &ServerState,
    headers: &HeaderMap,
) -> Result<Option<Session>, LaunchpadError> {
    match state.cookie.session_id(headers) {
        Some(id) => state.sessions.load(&id).await,
        None => Ok(None),
    }
}
