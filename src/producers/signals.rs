//! System bus signal listener
//!
//! Runs the bus monitor as a child process and turns its text output into
//! [`SystemSignal`] messages. A monitor that exits or cannot be started is
//! restarted with exponential backoff.

use crate::config::SignalsConfig;
use crate::messages::{AppEvent, SystemSignal};
use crate::tui::QueueSender;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Payload shape of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Payload {
    None,
    Text,
    Int,
}

fn payload_of(member: &str) -> Option<Payload> {
    match member {
        "factoryResetStarted"
        | "factoryResetCompleted"
        | "factoryResetRequested"
        | "powerButtonPressDetected"
        | "powerButtonReleaseDetected"
        | "moneroLWSListAccountsCompleted"
        | "moneroLWSListRequestsCompleted"
        | "moneroLWSAccountAdded"
        | "connectionStatusChanged" => Some(Payload::None),
        "startRecoveryNotification"
        | "serviceManagerNotification"
        | "hardwareStatusReadyNotification"
        | "serviceStatusReadyNotification" => Some(Payload::Text),
        "passwordChangeStatus" => Some(Payload::Int),
        _ => None,
    }
}

fn without_payload(member: &str) -> Option<SystemSignal> {
    Some(match member {
        "factoryResetStarted" => SystemSignal::FactoryResetStarted,
        "factoryResetCompleted" => SystemSignal::FactoryResetCompleted,
        "factoryResetRequested" => SystemSignal::FactoryResetRequested,
        "powerButtonPressDetected" => SystemSignal::PowerButtonPressDetected,
        "powerButtonReleaseDetected" => SystemSignal::PowerButtonReleaseDetected,
        "moneroLWSListAccountsCompleted" => SystemSignal::MoneroLwsListAccountsCompleted,
        "moneroLWSListRequestsCompleted" => SystemSignal::MoneroLwsListRequestsCompleted,
        "moneroLWSAccountAdded" => SystemSignal::MoneroLwsAccountAdded,
        "connectionStatusChanged" => SystemSignal::ConnectionStatusChanged,
        _ => return None,
    })
}

fn with_text(member: &str, text: String) -> Option<SystemSignal> {
    Some(match member {
        "startRecoveryNotification" => SystemSignal::StartRecoveryNotification(text),
        "serviceManagerNotification" => SystemSignal::ServiceManagerNotification(text),
        "hardwareStatusReadyNotification" => SystemSignal::HardwareStatusReady(text),
        "serviceStatusReadyNotification" => SystemSignal::ServiceStatusReady(text),
        _ => return None,
    })
}

/// Extract `key=value` from a monitor header line
fn header_field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.split([' ', ';'])
        .find_map(|part| part.strip_prefix(key)?.strip_prefix('='))
}

/// Incremental parser for `dbus-monitor` output
///
/// String arguments may span several lines; the parser buffers them until
/// the closing quote.
#[derive(Debug, Default)]
pub struct SignalParser {
    interface: String,
    member: Option<String>,
    text: Option<String>,
}

impl SignalParser {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            member: None,
            text: None,
        }
    }

    /// Feed one output line; returns a signal once one is complete
    pub fn feed(&mut self, line: &str) -> Option<SystemSignal> {
        if let Some(text) = self.text.as_mut() {
            text.push('\n');
            if let Some(rest) = line.strip_suffix('"') {
                text.push_str(rest);
                return self.finish_text();
            }
            text.push_str(line);
            return None;
        }

        let trimmed = line.trim_start();
        if trimmed.starts_with("signal ") {
            self.member = None;
            if header_field(trimmed, "interface") != Some(self.interface.as_str()) {
                return None;
            }
            let member = header_field(trimmed, "member")?;
            match payload_of(member)? {
                Payload::None => return without_payload(member),
                Payload::Text | Payload::Int => self.member = Some(member.to_string()),
            }
            return None;
        }

        let member = self.member.as_deref()?;
        match payload_of(member)? {
            Payload::Text => {
                let quoted = trimmed.strip_prefix("string \"")?;
                match quoted.strip_suffix('"') {
                    Some(whole) => {
                        self.text = Some(whole.to_string());
                        self.finish_text()
                    }
                    None => {
                        self.text = Some(quoted.to_string());
                        None
                    }
                }
            }
            Payload::Int => {
                let value = trimmed
                    .split_once(' ')
                    .and_then(|(_, v)| v.trim().parse::<i32>().ok())?;
                self.member = None;
                Some(SystemSignal::PasswordChangeStatus(value))
            }
            Payload::None => None,
        }
    }

    fn finish_text(&mut self) -> Option<SystemSignal> {
        let text = self.text.take()?;
        let member = self.member.take()?;
        with_text(&member, text)
    }
}

/// Child-process bus listener with reconnect backoff
pub struct SignalListener {
    config: SignalsConfig,
}

impl SignalListener {
    pub fn new(config: SignalsConfig) -> Self {
        Self { config }
    }

    /// Match rule passed to the monitor program
    pub fn match_rule(&self) -> String {
        format!(
            "type='signal',path='{}',interface='{}'",
            self.config.object_path, self.config.interface
        )
    }

    /// Next delay after a failure, capped
    pub fn next_backoff(current: Duration, max: Duration) -> Duration {
        (current * 2).min(max)
    }

    pub fn spawn(self, queue: QueueSender, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let initial = Duration::from_secs(self.config.reconnect_secs);
            let max = Duration::from_secs(self.config.max_reconnect_secs);
            let mut backoff = initial;

            loop {
                tokio::select! {
                    _ = shutdown.recv() => {
                        debug!("Signal listener stopping");
                        return;
                    }
                    outcome = self.monitor(&queue) => {
                        match outcome {
                            Ok(delivered) if delivered > 0 => backoff = initial,
                            Ok(_) => {}
                            Err(e) => warn!("Bus monitor failed: {}", e),
                        }
                    }
                }
                if queue.is_closed() {
                    return;
                }
                debug!("Restarting bus monitor in {:?}", backoff);
                tokio::select! {
                    _ = shutdown.recv() => return,
                    _ = tokio::time::sleep(backoff) => {}
                }
                backoff = Self::next_backoff(backoff, max);
            }
        })
    }

    /// Run the monitor until it exits; returns how many signals it delivered
    async fn monitor(&self, queue: &QueueSender) -> std::io::Result<usize> {
        let mut child = Command::new(&self.config.monitor)
            .arg("--system")
            .arg(self.match_rule())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        info!("Listening for {} signals", self.config.interface);

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("monitor has no stdout"))?;
        let mut lines = BufReader::new(stdout).lines();
        let mut parser = SignalParser::new(self.config.interface.clone());
        let mut delivered = 0;

        while let Some(line) = lines.next_line().await? {
            if let Some(signal) = parser.feed(&line) {
                debug!("Signal {:?}", signal);
                if !queue.send_event(AppEvent::Signal(signal)) {
                    break;
                }
                delivered += 1;
            }
        }
        let _ = child.kill().await;
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IFACE: &str = "com.moneronodo.embeddedInterface";

    fn header(member: &str) -> String {
        format!(
            "signal time=1718000000.1 sender=:1.7 -> destination=(null destination) serial=9 \
             path=/com/monero/nodo; interface={}; member={}",
            IFACE, member
        )
    }

    #[test]
    fn test_signal_without_payload() {
        let mut parser = SignalParser::new(IFACE);
        assert_eq!(
            parser.feed(&header("powerButtonPressDetected")),
            Some(SystemSignal::PowerButtonPressDetected)
        );
    }

    #[test]
    fn test_multiline_string_payload() {
        let mut parser = SignalParser::new(IFACE);
        assert_eq!(parser.feed(&header("serviceStatusReadyNotification")), None);
        assert_eq!(parser.feed("   string \"monerod:active"), None);
        assert_eq!(parser.feed("tor:inactive"), None);
        assert_eq!(
            parser.feed("i2pd:active\""),
            Some(SystemSignal::ServiceStatusReady(
                "monerod:active\ntor:inactive\ni2pd:active".to_string()
            ))
        );
    }

    #[test]
    fn test_single_line_string_and_int() {
        let mut parser = SignalParser::new(IFACE);
        parser.feed(&header("startRecoveryNotification"));
        assert_eq!(
            parser.feed("   string \"done\""),
            Some(SystemSignal::StartRecoveryNotification("done".to_string()))
        );
        parser.feed(&header("passwordChangeStatus"));
        assert_eq!(
            parser.feed("   int32 -1"),
            Some(SystemSignal::PasswordChangeStatus(-1))
        );
    }

    #[test]
    fn test_foreign_and_unknown_members_dropped() {
        let mut parser = SignalParser::new(IFACE);
        let foreign = "signal time=1.0 sender=org.freedesktop.DBus -> destination=:1.9 serial=2 \
                       path=/org/freedesktop/DBus; interface=org.freedesktop.DBus; member=NameAcquired";
        assert_eq!(parser.feed(foreign), None);
        assert_eq!(parser.feed("   string \":1.9\""), None);
        assert_eq!(parser.feed(&header("somethingNew")), None);
        assert_eq!(parser.feed("   string \"x\""), None);
    }

    #[test]
    fn test_backoff_caps() {
        let max = Duration::from_secs(60);
        assert_eq!(
            SignalListener::next_backoff(Duration::from_secs(1), max),
            Duration::from_secs(2)
        );
        assert_eq!(SignalListener::next_backoff(Duration::from_secs(40), max), max);
    }

    #[test]
    fn test_match_rule() {
        let listener = SignalListener::new(SignalsConfig::default());
        assert_eq!(
            listener.match_rule(),
            "type='signal',path='/com/monero/nodo',interface='com.moneronodo.embeddedInterface'"
        );
    }
}
