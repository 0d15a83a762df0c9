//! Application payloads delivered through `Message::Async`
//!
//! Each producer defines the variant it emits. The UI engine never looks
//! inside these values; components match on the ones they care about in
//! their `receive` handlers.

use serde::Deserialize;

/// Payload of an asynchronous message
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Result of a daemon `get_info` poll
    Daemon(Result<DaemonInfo, String>),
    /// Result of a payment-service health poll
    Payment(Result<PaymentHealth, String>),
    /// Notification from the system bus
    Signal(SystemSignal),
    /// An outbound service-control command finished
    CommandFinished(CommandReport),
    /// A persisted setting was changed by the user
    SettingChanged {
        key: String,
        value: serde_json::Value,
    },
    /// The settings document was written (Ok carries the saved key)
    SettingsSaved(Result<String, String>),
    /// A screen was entered or left at tab level
    ScreenActivated { label: String, active: bool },
    /// Periodic clock tick
    Tick,
}

/// Subset of the daemon's `get_info` response shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DaemonInfo {
    pub height: u64,
    pub target_height: u64,
    pub synchronized: bool,
    pub busy_syncing: bool,
    pub offline: bool,
    pub update_available: bool,
    pub version: String,
    pub nettype: String,
    pub outgoing_connections_count: u32,
    pub incoming_connections_count: u32,
    pub database_size: u64,
    pub status: String,
}

impl DaemonInfo {
    /// Human readable synchronization state
    pub fn sync_status(&self) -> String {
        if self.synchronized || (self.target_height != 0 && self.height == self.target_height) {
            return "Synchronized (100%)".to_string();
        }
        if self.busy_syncing {
            let percent = if self.target_height == 0 {
                0.0
            } else {
                self.height as f64 / self.target_height as f64 * 100.0
            };
            return format!("Synchronizing ({:.0}%)", percent);
        }
        "Not synchronizing".to_string()
    }
}

/// Payment service health report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentHealth {
    /// HTTP status returned by the health endpoint
    pub status: u16,
    pub walletrpc: bool,
    pub sqlite: bool,
}

/// Signals broadcast by the appliance's embedded interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemSignal {
    FactoryResetStarted,
    FactoryResetCompleted,
    FactoryResetRequested,
    PowerButtonPressDetected,
    PowerButtonReleaseDetected,
    MoneroLwsListAccountsCompleted,
    MoneroLwsListRequestsCompleted,
    MoneroLwsAccountAdded,
    ConnectionStatusChanged,
    StartRecoveryNotification(String),
    ServiceManagerNotification(String),
    HardwareStatusReady(String),
    ServiceStatusReady(String),
    PasswordChangeStatus(i32),
}

/// Outcome of a service-control command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    /// Short description of the action, e.g. `restart monerod`
    pub action: String,
    /// Ok carries captured stdout, Err the failure reason
    pub outcome: Result<String, String>,
}

impl CommandReport {
    pub fn ok(action: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            outcome: Ok(output.into()),
        }
    }

    pub fn failed(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            outcome: Err(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_status() {
        let mut info = DaemonInfo {
            height: 50,
            target_height: 200,
            busy_syncing: true,
            ..Default::default()
        };
        assert_eq!(info.sync_status(), "Synchronizing (25%)");

        info.busy_syncing = false;
        assert_eq!(info.sync_status(), "Not synchronizing");

        info.synchronized = true;
        assert_eq!(info.sync_status(), "Synchronized (100%)");
    }

    #[test]
    fn test_daemon_info_partial_json() {
        let info: DaemonInfo =
            serde_json::from_str(r#"{"height": 10, "version": "0.18.3.4", "extra": 1}"#).unwrap();
        assert_eq!(info.height, 10);
        assert_eq!(info.version, "0.18.3.4");
        assert!(!info.offline);
    }
}
