//! Deployment progress estimation
//!
//! Launch does not report progress, so the bar is driven by elapsed time
//! against the typical deployment duration. It starts at 25% as soon as the
//! deployment is running and stops at 100%; the live redirect is what shows
//! completion.

use crate::deploy::fsm::LaunchProjectState;

/// Percentage shown as soon as a deployment is running
pub const DEPLOYING_BASE_PERCENT: u64 = 25;

/// Percentage covered by elapsed time over one average deployment
pub const DEPLOYING_SPAN_PERCENT: u64 = 75;

/// Calibration of the time-based estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressCalibration {
    /// Typical duration of a Launch deployment, in seconds
    pub average_deploy_secs: u64,
}

impl Default for ProgressCalibration {
    fn default() -> Self {
        Self {
            average_deploy_secs: 130,
        }
    }
}

impl ProgressCalibration {
    /// Estimated percentage in `[0, 100]`
    pub fn estimate(&self, state: LaunchProjectState, duration_secs: u64) -> u8 {
        match state {
            LaunchProjectState::Deploying => {
                let elapsed = duration_secs
                    .saturating_mul(DEPLOYING_SPAN_PERCENT)
                    .checked_div(self.average_deploy_secs)
                    .unwrap_or(u64::MAX);
                let percent = elapsed.saturating_add(DEPLOYING_BASE_PERCENT).min(100);
                u8::try_from(percent).unwrap_or(100)
            }
            LaunchProjectState::NotDeployed
            | LaunchProjectState::Live
            | LaunchProjectState::Error => 0,
        }
    }
}

/// Everything a view needs to render one status reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub state: LaunchProjectState,
    pub duration: Option<u64>,
    pub percentage: u8,
    pub message: &'static str,
    pub polling_enabled: bool,
}

impl ProgressUpdate {
    pub fn new(
        state: LaunchProjectState,
        duration: Option<u64>,
        calibration: &ProgressCalibration,
    ) -> Self {
        Self {
            state,
            duration,
            percentage: calibration.estimate(state, duration.unwrap_or(0)),
            message: state.message(),
            polling_enabled: state.polling_enabled(),
        }
    }
}
