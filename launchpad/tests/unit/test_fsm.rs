//! Deployment state derivation tests

use chrono::Utc;

use launchpad::deploy::fsm::{derive_state, Derivation, LaunchProjectState};
use launchpad::deploy::launcher::{initiate, Initiation};
use launchpad::deploy::progress::{ProgressCalibration, ProgressUpdate};
use launchpad::errors::LaunchpadError;
use launchpad::models::session::Session;

use crate::fakes::{deployed_session, details, signed_in_session, FakeLauncher, FakeStatusSource};

const COMPLETION_PATH: &str = "/build/complete";

#[tokio::test]
async fn test_not_deployed_without_remote_call() {
    let now = Utc::now();
    let source = FakeStatusSource::new("PENDING", now, 10);
    let session = signed_in_session();

    let derivation = derive_state(session.deployment(), &source, now, COMPLETION_PATH)
        .await
        .unwrap();

    assert_eq!(
        derivation,
        Derivation::Settled {
            state: LaunchProjectState::NotDeployed,
            duration: None,
        }
    );
    assert_eq!(source.calls(), 0);

    let update = ProgressUpdate::new(derivation.state(), None, &ProgressCalibration::default());
    assert!(update.polling_enabled);
    assert_eq!(update.percentage, 0);
}

#[tokio::test]
async fn test_pending_deployment_is_deploying() {
    let now = Utc::now();
    let source = FakeStatusSource::new("PENDING", now, 10);
    let session = deployed_session();

    let derivation = derive_state(session.deployment(), &source, now, COMPLETION_PATH)
        .await
        .unwrap();

    assert_eq!(
        derivation,
        Derivation::Settled {
            state: LaunchProjectState::Deploying,
            duration: Some(10),
        }
    );
    let update = ProgressUpdate::new(
        LaunchProjectState::Deploying,
        Some(10),
        &ProgressCalibration::default(),
    );
    assert_eq!(update.percentage, 30);
    assert!(update.polling_enabled);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_errored_deployment_stops_polling() {
    let now = Utc::now();
    let source = FakeStatusSource::new("ERROR", now, 200);
    let session = deployed_session();

    let derivation = derive_state(session.deployment(), &source, now, COMPLETION_PATH)
        .await
        .unwrap();

    assert_eq!(
        derivation,
        Derivation::Settled {
            state: LaunchProjectState::Error,
            duration: Some(200),
        }
    );
    let update = ProgressUpdate::new(
        LaunchProjectState::Error,
        Some(200),
        &ProgressCalibration::default(),
    );
    assert_eq!(update.percentage, 0);
    assert!(!update.polling_enabled);
}

#[tokio::test]
async fn test_live_deployment_redirects() {
    let now = Utc::now();
    let source = FakeStatusSource::new("LIVE", now, 90);
    let session = deployed_session();

    let derivation = derive_state(session.deployment(), &source, now, COMPLETION_PATH)
        .await
        .unwrap();

    assert_eq!(
        derivation,
        Derivation::Redirect {
            location: COMPLETION_PATH.to_string(),
        }
    );
    assert_eq!(derivation.state(), LaunchProjectState::Live);
}

#[tokio::test]
async fn test_unknown_status_is_deploying() {
    let now = Utc::now();
    let source = FakeStatusSource::new("QUEUED", now, 0);
    let session = deployed_session();

    let derivation = derive_state(session.deployment(), &source, now, COMPLETION_PATH)
        .await
        .unwrap();
    assert_eq!(derivation.state(), LaunchProjectState::Deploying);
}

#[tokio::test]
async fn test_future_created_at_clamps_to_zero() {
    let now = Utc::now();
    let source = FakeStatusSource::new("PENDING", now, -30);
    let session = deployed_session();

    let derivation = derive_state(session.deployment(), &source, now, COMPLETION_PATH)
        .await
        .unwrap();
    assert_eq!(
        derivation,
        Derivation::Settled {
            state: LaunchProjectState::Deploying,
            duration: Some(0),
        }
    );
}

#[tokio::test]
async fn test_status_failure_is_an_error() {
    let source = FakeStatusSource::failing();
    let session = deployed_session();

    let result = derive_state(session.deployment(), &source, Utc::now(), COMPLETION_PATH).await;
    assert!(matches!(
        result,
        Err(LaunchpadError::StatusQueryFailed { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_deployment_without_credentials_is_rejected() {
    let source = FakeStatusSource::new("PENDING", Utc::now(), 10);
    let session = Session {
        launch_project_details: Some(details()),
        ..Default::default()
    };

    let result = derive_state(session.deployment(), &source, Utc::now(), COMPLETION_PATH).await;
    assert!(matches!(result, Err(LaunchpadError::AuthError(_))));
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_initiate_is_idempotent() {
    let launcher = FakeLauncher::new();
    let mut session = signed_in_session();

    let first = initiate(&mut session, &launcher).await.unwrap();
    assert_eq!(first, Initiation::Started(details()));
    assert_eq!(session.launch_project_details, Some(details()));

    let second = initiate(&mut session, &launcher).await.unwrap();
    assert_eq!(second, Initiation::AlreadyStarted(details()));
    assert_eq!(launcher.calls(), 1);
}

#[tokio::test]
async fn test_failed_initiation_leaves_session_untouched() {
    let launcher = FakeLauncher::failing();
    let mut session = signed_in_session();

    let result = initiate(&mut session, &launcher).await;
    assert!(matches!(result, Err(LaunchpadError::LaunchError(_))));
    assert!(session.launch_project_details.is_none());
}

#[tokio::test]
async fn test_initiate_requires_sign_in() {
    let launcher = FakeLauncher::new();
    let mut session = Session::default();

    let result = initiate(&mut session, &launcher).await;
    assert!(matches!(result, Err(LaunchpadError::AuthError(_))));
    assert_eq!(launcher.calls(), 0);
}
