//! Deploy status polling worker
//!
//! Re-runs the deploy loader on a fixed cadence until the deployment reaches
//! a terminal state. Ticks are not chained to the previous fetch: a slow
//! response can overlap with the next one, and every response is applied as
//! a complete reading.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::deploy::fsm::{Derivation, LaunchProjectState};
use crate::deploy::launcher::InitiationGuard;
use crate::deploy::progress::{ProgressCalibration, ProgressUpdate};
use crate::errors::LaunchpadError;

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Polling interval
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// The deploy page as seen from the polling side
#[async_trait]
pub trait DeployView: Send + Sync {
    /// Run the deploy loader once against the server of record
    async fn load(&self) -> Result<Derivation, LaunchpadError>;

    /// Ask the server to start the deployment
    async fn launch_project(&self) -> Result<(), LaunchpadError>;
}

/// Why the poller stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollExit {
    /// The deployment went live; navigate to the location
    Redirected(String),

    /// A terminal state is displayed in place
    Halted(LaunchProjectState),

    /// The shutdown signal fired first
    Shutdown,
}

/// Run the poller worker
pub async fn run<V, S, F, R>(
    options: &Options,
    view: Arc<V>,
    calibration: &ProgressCalibration,
    sleep_fn: S,
    mut report: R,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) -> PollExit
where
    V: DeployView + 'static,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
    R: FnMut(&ProgressUpdate),
{
    info!("Poller worker starting...");

    let initiation = InitiationGuard::new();
    // Dropping the set on return aborts fetches still in flight
    let mut in_flight: JoinSet<Result<Derivation, LaunchpadError>> = JoinSet::new();
    let mut next_tick = Box::pin(sleep_fn(Duration::ZERO));

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down...");
                return PollExit::Shutdown;
            }
            _ = &mut next_tick => {
                debug!("Polling deploy status...");
                let view = view.clone();
                in_flight.spawn(async move { view.load().await });
                next_tick.set(sleep_fn(options.interval));
            }
            Some(joined) = in_flight.join_next() => {
                let derivation = match joined {
                    Ok(Ok(derivation)) => derivation,
                    Ok(Err(e)) => {
                        warn!("Deploy status fetch failed, retrying on next tick: {}", e);
                        continue;
                    }
                    Err(e) => {
                        warn!("Deploy status task failed, retrying on next tick: {}", e);
                        continue;
                    }
                };

                match derivation {
                    Derivation::Redirect { location } => {
                        info!("Deployment is live, redirecting to {}", location);
                        return PollExit::Redirected(location);
                    }
                    Derivation::Settled { state, duration } => {
                        let update = ProgressUpdate::new(state, duration, calibration);
                        report(&update);

                        if state == LaunchProjectState::NotDeployed && initiation.try_fire() {
                            info!("No deployment yet, requesting launch project...");
                            let view = view.clone();
                            tokio::spawn(async move {
                                if let Err(e) = view.launch_project().await {
                                    error!("Failed to request launch project: {}", e);
                                }
                            });
                        }

                        if !update.polling_enabled {
                            info!("Deployment reached {:?}, polling stopped", state);
                            return PollExit::Halted(state);
                        }
                    }
                }
            }
        }
    }
}
