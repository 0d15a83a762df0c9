//! Terminal UI state engine
//!
//! This module contains:
//! - The component tree (items, panes, screens, popups)
//! - Focus traversal over container cursors
//! - The inbound message queue and the dispatcher
//! - Terminal setup, rendering and toasts

pub mod component;
pub mod dispatcher;
pub mod events;
pub mod focus;
pub mod item;
pub mod notifications;
pub mod pane;
pub mod popup;
pub mod render;
pub mod screen;
mod terminal;
pub mod theme;

pub use component::{Command, Component, Context, FieldValue, Form};
pub use dispatcher::{App, Dispatcher};
pub use events::{queue, InputReader, Key, Message, Nav, QueueReceiver, QueueSender};
pub use focus::{advance, update_focus, Composite, Container, Step};
pub use item::{Button, InputField, Item, Label, Toggle};
pub use notifications::{NotificationKind, NotificationManager};
pub use pane::Pane;
pub use popup::{Popup, PopupId, PopupStack};
pub use screen::{Entry, Orientation, Placement, Screen};
pub use terminal::{TerminalConfig, TerminalManager};
pub use theme::Palette;
