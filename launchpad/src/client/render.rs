//! Terminal rendering of deploy progress

use colored::Colorize;

use crate::deploy::fsm::LaunchProjectState;
use crate::deploy::progress::ProgressUpdate;

/// Width of the bar in characters
pub const BAR_WIDTH: usize = 40;

/// Plain progress bar, `[####----]`
pub fn progress_bar(percentage: u8, width: usize) -> String {
    let filled = width * usize::from(percentage.min(100)) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// One status line for a progress update
pub fn render_update(update: &ProgressUpdate) -> String {
    let bar = progress_bar(update.percentage, BAR_WIDTH);
    let line = format!("{} {:>3}% {}", bar, update.percentage, update.message);
    match update.state {
        LaunchProjectState::NotDeployed => line.yellow().to_string(),
        LaunchProjectState::Deploying => line.cyan().to_string(),
        LaunchProjectState::Live => line.green().to_string(),
        LaunchProjectState::Error => line.red().bold().to_string(),
    }
}

/// Final line once the deployment is live
pub fn render_live(location: &str) -> String {
    let bar = progress_bar(100, BAR_WIDTH);
    format!(
        "{} 100% {} ({})",
        bar,
        LaunchProjectState::Live.message(),
        location
    )
    .green()
    .bold()
    .to_string()
}
