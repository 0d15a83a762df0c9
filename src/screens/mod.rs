//! The console's tabs, built from engine components
//!
//! Screens never touch the backend directly from a handler. Saving a
//! setting returns a command that announces the change to every
//! component and writes the document off the UI loop.

pub mod dashboard;
pub mod node;
pub mod payment;
pub mod settings;
pub mod shell;
pub mod system;

use crate::backend::Services;
use crate::config::AppConfig;
use crate::messages::{AppEvent, CommandReport};
use crate::tui::{Command, Message, Palette, Screen, Toggle};
use serde_json::Value;
use std::future::Future;
use tracing::warn;

/// Dotted key used in `SettingChanged`, e.g. `banlists.dns`
pub fn setting_key(section: &[&str], key: &str) -> String {
    section
        .iter()
        .copied()
        .chain(std::iter::once(key))
        .collect::<Vec<_>>()
        .join(".")
}

/// Announce a setting change and save it in the background
pub fn persist(services: &Services, section: &[&str], key: &str, value: Value) -> Command {
    let dotted = setting_key(section, key);
    let store = services.settings.clone();
    let section: Vec<String> = section.iter().map(|s| s.to_string()).collect();
    let key = key.to_string();
    let saved = dotted.clone();
    let stored = value.clone();

    Command::Batch(vec![
        Command::Emit(AppEvent::SettingChanged {
            key: dotted,
            value,
        }),
        Command::blocking(move || {
            let section: Vec<&str> = section.iter().map(String::as_str).collect();
            let outcome = store.set(&section, &key, stored).map(|_| saved).map_err(|e| {
                warn!("Saving {} failed: {}", key, e);
                e.to_string()
            });
            Some(AppEvent::SettingsSaved(outcome))
        }),
    ])
}

/// Run a control action and report it as `CommandFinished`
pub fn control_task<F>(action: F) -> Command
where
    F: Future<Output = CommandReport> + Send + 'static,
{
    Command::task(async move { Some(AppEvent::CommandFinished(action.await)) })
}

/// Value carried by a `SettingChanged` message for `key`
pub fn changed<'a>(message: &'a Message, key: &str) -> Option<&'a Value> {
    match message {
        Message::Async(AppEvent::SettingChanged { key: k, value }) if k == key => Some(value),
        _ => None,
    }
}

/// Display form of a setting value
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Toggle bound to a boolean setting
pub fn setting_toggle(
    services: &Services,
    label: &str,
    section: &[&'static str],
    key: &'static str,
) -> Toggle {
    let mut path = section.to_vec();
    path.push(key);
    let toggled = services.settings.get_bool(&path);
    let dotted = setting_key(section, key);
    let section = section.to_vec();
    let services = services.clone();

    Toggle::new(label, Palette::GREEN)
        .toggled(toggled)
        .on_toggle(move |state, _| Some(persist(&services, &section, key, Value::Bool(state))))
        .on_receive(move |toggle, message, _| {
            if let Some(Value::Bool(state)) = changed(message, &dotted) {
                toggle.set_toggled(*state);
            }
            None
        })
}

/// Every screen in tab order
pub fn catalogue(services: &Services, config: &AppConfig) -> Vec<Screen> {
    vec![
        dashboard::screen(),
        node::screen(services),
        settings::screen(services),
        system::screen(services),
        payment::screen(services, config.payment.enabled),
        shell::screen(),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::backend::{ServiceControl, Services, SettingsStore};
    use crate::config::{ControlConfig, SignalsConfig};
    use serde_json::Value;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Services over a temporary settings document
    pub fn services(document: Value) -> (TempDir, Services) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, document.to_string()).unwrap();
        let settings = SettingsStore::with_paths(&path, &dir.path().join("config.json.bak"));
        let services = Services {
            settings: Arc::new(settings),
            control: Arc::new(ServiceControl::new(
                &ControlConfig::default(),
                &SignalsConfig::default(),
            )),
            restart_on_save: "monerod".to_string(),
        };
        (dir, services)
    }
}
