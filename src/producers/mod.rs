//! Background message sources
//!
//! Each producer runs as its own task and only ever talks to the UI by
//! enqueueing messages. Every one of them stops when the shutdown
//! broadcast fires or when the dispatcher's queue has gone away.

pub mod daemon_rpc;
pub mod payment;
pub mod signals;

pub use daemon_rpc::DaemonPoller;
pub use payment::PaymentPoller;
pub use signals::{SignalListener, SignalParser};

use crate::messages::AppEvent;
use crate::tui::QueueSender;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// A producer that runs one bounded operation per interval
#[async_trait]
pub trait Poller: Send + Sync {
    /// Producer name (for logging)
    fn name(&self) -> &str;

    /// Time between polls
    fn interval(&self) -> Duration;

    /// One cycle; None means nothing to report this time
    async fn poll(&self) -> Option<AppEvent>;
}

/// Run a poller on its own task: once immediately, then every interval
pub fn spawn_poller(
    poller: Arc<dyn Poller>,
    queue: QueueSender,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(poller.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            "Starting {} every {:?}",
            poller.name(),
            poller.interval()
        );

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    debug!("{} stopping", poller.name());
                    return;
                }
                _ = ticker.tick() => {
                    if let Some(event) = poller.poll().await {
                        if !queue.send_event(event) {
                            debug!("{}: queue closed", poller.name());
                            return;
                        }
                    }
                }
            }
        }
    })
}

/// Periodic clock tick
pub struct Ticker {
    period: Duration,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

#[async_trait]
impl Poller for Ticker {
    fn name(&self) -> &str {
        "ticker"
    }

    fn interval(&self) -> Duration {
        self.period
    }

    async fn poll(&self) -> Option<AppEvent> {
        Some(AppEvent::Tick)
    }
}
