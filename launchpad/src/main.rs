//! Launchpad - Entry Point
//!
//! Runs the onboarding server, or with `--watch` follows the deploy page of a
//! running server from the terminal.

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use anyhow::Context;
use launchpad::app::run::run;
use launchpad::client::remote::RemoteDeployView;
use launchpad::client::render::{render_live, render_update};
use launchpad::filesys::file::File;
use launchpad::logs::{init_logging, LogOptions};
use launchpad::session::store::SessionId;
use launchpad::storage::settings::{Settings, DEFAULT_SETTINGS_PATH};
use launchpad::utils::version_info;
use launchpad::workers::poller::{self, PollExit};

use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Unable to print version: {}", e),
        }
        return;
    }

    let watch = cli_args.contains_key("watch");

    // Retrieve the settings file; the watch client can run on defaults
    let settings_file = File::new(
        cli_args
            .get("config")
            .map(String::as_str)
            .unwrap_or(DEFAULT_SETTINGS_PATH),
    );
    let settings = if watch && !settings_file.exists().await {
        Settings::default()
    } else {
        match Settings::load(&settings_file).await {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_dir: settings.log_dir.clone(),
        json_format: settings.log_json,
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    if watch {
        if let Err(e) = run_watch(&cli_args, &settings).await {
            error!("Watch failed: {:#}", e);
        }
        return;
    }

    // Run the server
    let options = match settings.to_app_options() {
        Ok(options) => options,
        Err(e) => {
            error!("Invalid settings: {}", e);
            return;
        }
    };

    info!("Running Launchpad with options: {:?}", options);
    let result = run(version.version, options, await_shutdown_signal()).await;
    if let Err(e) = result {
        error!("Failed to run Launchpad: {e}");
    }
}

async fn run_watch(cli_args: &HashMap<String, String>, settings: &Settings) -> anyhow::Result<()> {
    let url = cli_args
        .get("url")
        .context("--watch requires --url=<server>")?;
    let session_id: SessionId = cli_args
        .get("session")
        .context("--watch requires --session=<id>")?
        .parse()
        .context("--session is not a valid session id")?;
    let cookie_name = cli_args
        .get("cookie")
        .unwrap_or(&settings.session.cookie_name);

    let options = settings
        .to_watch_options()
        .context("Invalid deploy settings")?;
    let view = RemoteDeployView::new(url, cookie_name, &session_id, options.http_timeout)
        .context("Unable to reach the deploy page")?;

    info!("Watching deployment at {}", url);
    let exit = poller::run(
        &options.poller,
        Arc::new(view),
        &options.calibration,
        tokio::time::sleep,
        |update| println!("{}", render_update(update)),
        Box::pin(await_shutdown_signal()),
    )
    .await;

    match exit {
        PollExit::Redirected(location) => println!("{}", render_live(&location)),
        PollExit::Halted(state) => info!("Deployment halted in state {:?}", state),
        PollExit::Shutdown => info!("Watch interrupted"),
    }
    Ok(())
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    error!("Unable to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                    info!("Ctrl+C received, shutting down...");
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Ctrl+C received, shutting down...");
    }
}
