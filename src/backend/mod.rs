//! Outbound collaborators: the settings document and service control

pub mod control;
pub mod settings;

pub use control::{BusArg, ServiceControl};
pub use settings::SettingsStore;

use std::sync::Arc;

/// Handles screens use to reach the backend
#[derive(Debug, Clone)]
pub struct Services {
    pub settings: Arc<SettingsStore>,
    pub control: Arc<ServiceControl>,
    /// Service restarted after a successful settings save
    pub restart_on_save: String,
}
