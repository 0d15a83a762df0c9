//! sshui - terminal console for a Monero node appliance
//!
//! The console runs over SSH on the appliance and shows tabs of status
//! panes, toggles and buttons. It is organised in layers:
//! - **tui**: the component tree, focus traversal, popup stack and the
//!   single-threaded dispatcher that routes every message
//! - **producers**: background tasks (daemon RPC, payment health, system
//!   bus signals, clock) that feed the inbound queue
//! - **backend**: the settings document and service control
//! - **screens**: the shipped tabs, built from `tui` components
//!
//! # Example
//!
//! ```ignore
//! use sshui_core::tui::{App, Button, Dispatcher, Palette, Screen};
//!
//! let screen = Screen::new("Demo").entry(Button::new("Press me", Palette::GREEN));
//! let mut dispatcher = Dispatcher::new(App::new(vec![screen]));
//! dispatcher.run(&mut terminal).await?;
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod messages;
pub mod producers;
pub mod screens;
pub mod tui;

pub use backend::{ServiceControl, Services, SettingsStore};
pub use config::{AppConfig, ConfigError};
pub use error::{Result, SshuiError};
pub use messages::{AppEvent, CommandReport, DaemonInfo, PaymentHealth, SystemSignal};
