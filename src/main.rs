//! sshui - Monero node console
//!
//! Entry point: loads configuration, takes over the terminal, starts the
//! producers and runs the dispatcher until a screen asks to quit.

use anyhow::Context as _;
use clap::Parser;
use sshui_core::backend::{ServiceControl, Services, SettingsStore};
use sshui_core::config::AppConfig;
use sshui_core::producers::{spawn_poller, DaemonPoller, PaymentPoller, SignalListener, Ticker};
use sshui_core::screens;
use sshui_core::tui::{
    App, Dispatcher, InputReader, NotificationManager, TerminalConfig, TerminalManager,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sshui")]
#[command(about = "Terminal console for a Monero node appliance", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(short, long, env = "SSHUI_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log file, overriding `ui.log_file`
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Node settings document, overriding `settings.path`
    #[arg(long, env = "SSHUI_SETTINGS")]
    settings: Option<PathBuf>,
}

/// Logs go to a file; the terminal belongs to the UI
fn init_logging(level: &str, path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let level = level.to_lowercase();
    let filter = EnvFilter::new(format!("sshui={},sshui_core={}", level, level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(settings) = cli.settings {
        config.settings.backup = settings.with_extension("json.bak");
        config.settings.path = settings;
    }
    let log_file = cli.log_file.unwrap_or_else(|| config.ui.log_file.clone());
    init_logging(&cli.log_level, &log_file)?;
    debug!("sshui v{} starting...", env!("CARGO_PKG_VERSION"));

    let services = Services {
        settings: Arc::new(SettingsStore::new(&config.settings)),
        control: Arc::new(ServiceControl::new(&config.control, &config.signals)),
        restart_on_save: config.control.restart_on_save.clone(),
    };
    let app = App::new(screens::catalogue(&services, &config))
        .with_notifications(NotificationManager::new());
    let mut dispatcher = Dispatcher::new(app);

    let mut terminal =
        TerminalManager::new(TerminalConfig::default()).context("Failed to initialize terminal")?;

    let (shutdown, _) = broadcast::channel::<()>(4);
    let queue = dispatcher.sender();
    let mut handles = vec![InputReader::default().spawn(queue.clone(), shutdown.subscribe())];

    handles.push(spawn_poller(
        Arc::new(DaemonPoller::new(&config.daemon).context("Failed to build daemon client")?),
        queue.clone(),
        shutdown.subscribe(),
    ));
    if config.payment.enabled {
        let poller =
            PaymentPoller::new(&config.payment).context("Failed to build payment client")?;
        handles.push(spawn_poller(
            Arc::new(poller),
            queue.clone(),
            shutdown.subscribe(),
        ));
    }
    handles.push(spawn_poller(
        Arc::new(Ticker::new(Duration::from_millis(config.ui.tick_ms))),
        queue.clone(),
        shutdown.subscribe(),
    ));
    if config.signals.enabled {
        let listener = SignalListener::new(config.signals.clone());
        handles.push(listener.spawn(queue.clone(), shutdown.subscribe()));
    }
    drop(queue);
    info!("Console started with {} producers", handles.len());

    let outcome = dispatcher.run(terminal.terminal_mut()).await;

    let _ = shutdown.send(());
    for handle in handles {
        if let Err(e) = handle.await {
            warn!("Producer task failed: {}", e);
        }
    }
    drop(terminal);

    outcome.context("Console loop failed")?;
    info!("sshui exiting");
    Ok(())
}
