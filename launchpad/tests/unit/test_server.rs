//! HTTP route tests

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use launchpad::deploy::launcher::ProjectLauncher;
use launchpad::errors::LaunchpadError;
use launchpad::models::deployment::LaunchProjectDetails;
use launchpad::models::session::{Credentials, SessionProgress};
use launchpad::server::serve::router;
use launchpad::server::state::ServerState;
use launchpad::session::cookie::CookieOptions;
use launchpad::session::store::{MemorySessionStore, SessionId, SessionStore};

use crate::fakes::{
    deployed_session, details, signed_in_session, FakeLauncher, FakeStatusSource,
    FakeTokenExchange, ORGANIZATION_UID,
};

struct TestApp {
    router: Router,
    sessions: Arc<MemorySessionStore>,
    launcher: Arc<FakeLauncher>,
}

fn test_app(source: FakeStatusSource) -> TestApp {
    let sessions = Arc::new(MemorySessionStore::new());
    let launcher = Arc::new(FakeLauncher::new());
    let state = ServerState::new(
        sessions.clone(),
        Arc::new(source),
        launcher.clone(),
        Arc::new(FakeTokenExchange {
            valid_code: "good-code",
        }),
        CookieOptions::default(),
        "/build/complete".to_string(),
    );
    TestApp {
        router: router(Arc::new(state)),
        sessions,
        launcher,
    }
}

fn get(uri: &str, session: Option<&SessionId>) -> Request<Body> {
    request("GET", uri, session)
}

fn request(method: &str, uri: &str, session: Option<&SessionId>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = session {
        builder = builder.header(header::COOKIE, format!("__session={}", id));
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn issued_session_id(response: &Response) -> SessionId {
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.contains("HttpOnly"));
    cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("__session="))
        .unwrap()
        .parse()
        .unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = test_app(FakeStatusSource::failing());
    let response = app.router.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_callback_without_code_is_rejected() {
    let app = test_app(FakeStatusSource::failing());

    let response = app
        .router
        .oneshot(get("/oauth/callback", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "missing_authorization_code"
    );
    assert!(app.sessions.is_empty().await);
}

#[tokio::test]
async fn test_callback_with_rejected_code_writes_nothing() {
    let app = test_app(FakeStatusSource::failing());
    let id = SessionId::generate();

    let response = app
        .router
        .oneshot(get("/oauth/callback?code=stale-code", Some(&id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["error"], "token_exchange_rejected");
    assert!(body["message"].as_str().unwrap().contains("invalid_grant"));
    assert!(app.sessions.load(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_callback_signs_in() {
    let app = test_app(FakeStatusSource::failing());

    let response = app
        .router
        .oneshot(get("/oauth/callback?code=good-code", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let id = issued_session_id(&response);

    let session = app.sessions.load(&id).await.unwrap().unwrap();
    assert_eq!(session.organization_uid.as_deref(), Some(ORGANIZATION_UID));
    assert_eq!(session.progress, Some(SessionProgress::Questions));
    assert!(session.access_token.is_some());
}

#[tokio::test]
async fn test_callback_ignores_unissued_session_id() {
    let app = test_app(FakeStatusSource::failing());
    let planted = SessionId::generate();

    let response = app
        .router
        .oneshot(get("/oauth/callback?code=good-code", Some(&planted)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let id = issued_session_id(&response);
    assert_ne!(id, planted);
    assert!(app.sessions.load(&planted).await.unwrap().is_none());
    assert_eq!(app.sessions.len().await, 1);
}

#[tokio::test]
async fn test_callback_rotates_stored_session() {
    let app = test_app(FakeStatusSource::failing());
    let previous = SessionId::generate();
    app.sessions.save(&previous, deployed_session()).await.unwrap();

    let response = app
        .router
        .oneshot(get("/oauth/callback?code=good-code", Some(&previous)))
        .await
        .unwrap();

    let id = issued_session_id(&response);
    assert_ne!(id, previous);
    assert!(app.sessions.load(&previous).await.unwrap().is_none());

    let session = app.sessions.load(&id).await.unwrap().unwrap();
    assert_eq!(session.launch_project_details, Some(details()));
    assert_eq!(app.sessions.len().await, 1);
}

#[tokio::test]
async fn test_loader_without_session_is_not_deployed() {
    let app = test_app(FakeStatusSource::failing());

    let response = app
        .router
        .oneshot(get("/build/deploy", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["state"], "NOT_DEPLOYED");
    assert!(body.get("duration").is_none());
}

#[tokio::test]
async fn test_loader_reports_deploying() {
    let app = test_app(FakeStatusSource::new("PENDING", Utc::now(), 10));
    let id = SessionId::generate();
    app.sessions.save(&id, deployed_session()).await.unwrap();

    let response = app
        .router
        .oneshot(get("/build/deploy", Some(&id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["state"], "DEPLOYING");
    assert_eq!(body["duration"], 10);
}

#[tokio::test]
async fn test_loader_redirects_when_live() {
    let app = test_app(FakeStatusSource::new("LIVE", Utc::now(), 120));
    let id = SessionId::generate();
    app.sessions.save(&id, deployed_session()).await.unwrap();

    let response = app
        .router
        .oneshot(get("/build/deploy", Some(&id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/build/complete");
}

#[tokio::test]
async fn test_loader_status_failure_is_bad_gateway() {
    let app = test_app(FakeStatusSource::failing());
    let id = SessionId::generate();
    app.sessions.save(&id, deployed_session()).await.unwrap();

    let response = app
        .router
        .oneshot(get("/build/deploy", Some(&id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(response).await["error"], "status_query_failed");
}

#[tokio::test]
async fn test_launch_project_requires_session() {
    let app = test_app(FakeStatusSource::failing());

    let response = app
        .router
        .oneshot(request("POST", "/build/deploy/launch-project", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.launcher.calls(), 0);
}

#[tokio::test]
async fn test_launch_project_is_idempotent() {
    let app = test_app(FakeStatusSource::failing());
    let id = SessionId::generate();
    app.sessions.save(&id, signed_in_session()).await.unwrap();

    let first = app
        .router
        .clone()
        .oneshot(request("POST", "/build/deploy/launch-project", Some(&id)))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::ACCEPTED);
    assert_eq!(json_body(first).await["initiated"], true);

    let second = app
        .router
        .clone()
        .oneshot(request("POST", "/build/deploy/launch-project", Some(&id)))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(json_body(second).await["initiated"], false);

    assert_eq!(app.launcher.calls(), 1);
    let session = app.sessions.load(&id).await.unwrap().unwrap();
    assert!(session.launch_project_details.is_some());
}

/// Launcher during which the visitor's session is written by another request
struct ConcurrentWriteLauncher {
    sessions: Arc<MemorySessionStore>,
    id: SessionId,
}

#[async_trait]
impl ProjectLauncher for ConcurrentWriteLauncher {
    async fn create_project(
        &self,
        _credentials: Credentials<'_>,
    ) -> Result<LaunchProjectDetails, LaunchpadError> {
        let mut session = self.sessions.load(&self.id).await?.unwrap_or_default();
        session.organization_uid = Some("org-77".to_string());
        self.sessions.save(&self.id, session).await?;
        Ok(details())
    }
}

#[tokio::test]
async fn test_launch_project_keeps_concurrent_session_writes() {
    let sessions = Arc::new(MemorySessionStore::new());
    let id = SessionId::generate();
    sessions.save(&id, signed_in_session()).await.unwrap();

    let state = ServerState::new(
        sessions.clone(),
        Arc::new(FakeStatusSource::failing()),
        Arc::new(ConcurrentWriteLauncher {
            sessions: sessions.clone(),
            id,
        }),
        Arc::new(FakeTokenExchange {
            valid_code: "good-code",
        }),
        CookieOptions::default(),
        "/build/complete".to_string(),
    );

    let response = router(Arc::new(state))
        .oneshot(request("POST", "/build/deploy/launch-project", Some(&id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let session = sessions.load(&id).await.unwrap().unwrap();
    assert_eq!(session.organization_uid.as_deref(), Some("org-77"));
    assert_eq!(session.launch_project_details, Some(details()));
}

#[tokio::test]
async fn test_complete_page() {
    let app = test_app(FakeStatusSource::failing());
    let response = app
        .router
        .oneshot(get("/build/complete", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
