//! Service control through external programs
//!
//! Every call is bounded by the configured timeout and reports its outcome
//! as a [`CommandReport`]; nothing here returns an error to the UI loop.

use crate::config::{ControlConfig, SignalsConfig};
use crate::error::{Result, SshuiError};
use crate::messages::CommandReport;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Argument to a bus method call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusArg {
    Bool(bool),
}

impl BusArg {
    /// `dbus-send` notation
    pub fn render(&self) -> String {
        match self {
            BusArg::Bool(b) => format!("boolean:{}", b),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceControl {
    systemctl: PathBuf,
    dbus_send: PathBuf,
    destination: String,
    object_path: String,
    interface: String,
    timeout: Duration,
}

impl ServiceControl {
    pub fn new(control: &ControlConfig, signals: &SignalsConfig) -> Self {
        Self {
            systemctl: control.systemctl.clone(),
            dbus_send: control.dbus_send.clone(),
            destination: control.destination.clone(),
            object_path: signals.object_path.clone(),
            interface: signals.interface.clone(),
            timeout: Duration::from_secs(control.timeout_secs),
        }
    }

    /// Arguments for a method call on the appliance interface
    pub fn bus_call_args(&self, method: &str, args: &[BusArg]) -> Vec<String> {
        let mut argv = vec![
            "--system".to_string(),
            "--print-reply".to_string(),
            format!("--dest={}", self.destination),
            self.object_path.clone(),
            format!("{}.{}", self.interface, method),
        ];
        argv.extend(args.iter().map(BusArg::render));
        argv
    }

    /// `systemctl restart <service>`
    pub async fn restart_service(&self, service: &str) -> CommandReport {
        let action = format!("restart {}", service);
        let args = vec!["restart".to_string(), service.to_string()];
        let program = self.systemctl.clone();
        self.report(action, program, args).await
    }

    /// Method call on the appliance bus interface
    pub async fn call(&self, method: &str, args: &[BusArg]) -> CommandReport {
        let argv = self.bus_call_args(method, args);
        let program = self.dbus_send.clone();
        self.report(method.to_string(), program, argv).await
    }

    pub async fn reboot(&self) -> CommandReport {
        self.call("restart", &[]).await
    }

    pub async fn shutdown(&self) -> CommandReport {
        self.call("shutdown", &[]).await
    }

    pub async fn start_recovery(&self, filesystem: bool, resync: bool) -> CommandReport {
        self.call(
            "startRecovery",
            &[BusArg::Bool(filesystem), BusArg::Bool(resync)],
        )
        .await
    }

    async fn report(&self, action: String, program: PathBuf, args: Vec<String>) -> CommandReport {
        info!("Running {}", action);
        match self.run(program, args).await {
            Ok(output) => CommandReport::ok(action, output),
            Err(e) => {
                warn!("{} failed: {}", action, e);
                CommandReport::failed(action, e.to_string())
            }
        }
    }

    async fn run(&self, program: PathBuf, args: Vec<String>) -> Result<String> {
        let description = format!("{} {}", program.display(), args.join(" "));
        debug!("exec {}", description);
        let child = Command::new(&program)
            .args(args.iter().map(OsString::from))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = timeout(self.timeout, child)
            .await
            .map_err(|_| SshuiError::Timeout(self.timeout.as_secs(), description.clone()))??;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(SshuiError::Other(if stderr.is_empty() {
                format!("{} exited with {}", description, output.status)
            } else {
                stderr
            }))
        }
    }
}
