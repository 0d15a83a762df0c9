//! The capability set shared by every element of the component tree
//!
//! Items, panes, screens and popups all implement [`Component`]. Outbound
//! side effects never happen inside a handler: handlers return a
//! [`Command`] and the dispatcher executes it once the current message has
//! been fully routed.

use super::events::Message;
use super::popup::{Popup, PopupId};
use crate::messages::AppEvent;
use ratatui::style::Color;
use ratatui::text::Text;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Future run by a [`Command::Task`]
pub type TaskFuture = Pin<Box<dyn Future<Output = Option<AppEvent>> + Send + 'static>>;

/// Handler attached to an item for incoming messages
pub type Hook<T> = Box<dyn FnMut(&mut T, &Message, &Context) -> Option<Command>>;

/// Common element capabilities
pub trait Component {
    /// Renderable representation
    fn render(&self) -> Text<'static>;

    /// Whether the element can receive focus and interaction
    fn is_enabled(&self) -> bool;

    fn is_focused(&self) -> bool;

    fn set_focus(&mut self, focus: bool);

    fn color(&self) -> Color;

    fn set_color(&mut self, color: Color);

    /// Enter was pressed on this element
    fn interact(&mut self, ctx: &Context) -> Option<Command>;

    /// Deliver a message, regardless of focus
    fn receive(&mut self, message: &Message, ctx: &Context) -> Option<Command>;
}

/// Deferred side effect returned by a handler
pub enum Command {
    /// Push a popup on top of the popup stack
    OpenPopup(Popup),
    /// Close the front popup
    ClosePopup,
    /// Close a specific popup wherever it sits in the stack
    Dismiss(PopupId),
    /// Leave the dispatch loop
    Quit,
    /// Enqueue a follow-up message
    Emit(AppEvent),
    /// Run off the UI loop; the result, if any, is enqueued
    Task(TaskFuture),
    /// Several commands executed in order
    Batch(Vec<Command>),
}

impl Command {
    /// Wrap a future as a task command
    pub fn task<F>(future: F) -> Self
    where
        F: Future<Output = Option<AppEvent>> + Send + 'static,
    {
        Command::Task(Box::pin(future))
    }

    /// Run blocking work on the blocking pool
    pub fn blocking<F>(work: F) -> Self
    where
        F: FnOnce() -> Option<AppEvent> + Send + 'static,
    {
        Command::task(async move { tokio::task::spawn_blocking(work).await.ok().flatten() })
    }

    /// Collapse a list of optional commands into at most one
    pub fn batch(commands: impl IntoIterator<Item = Option<Command>>) -> Option<Command> {
        let mut commands: Vec<Command> = commands.into_iter().flatten().collect();
        match commands.len() {
            0 => None,
            1 => commands.pop(),
            _ => Some(Command::Batch(commands)),
        }
    }

    /// Flatten nested batches into execution order
    pub fn flatten(self, out: &mut Vec<Command>) {
        match self {
            Command::Batch(inner) => {
                for command in inner {
                    command.flatten(out);
                }
            }
            other => out.push(other),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::OpenPopup(popup) => f.debug_tuple("OpenPopup").field(&popup.title()).finish(),
            Command::ClosePopup => write!(f, "ClosePopup"),
            Command::Dismiss(id) => f.debug_tuple("Dismiss").field(id).finish(),
            Command::Quit => write!(f, "Quit"),
            Command::Emit(event) => f.debug_tuple("Emit").field(event).finish(),
            Command::Task(_) => write!(f, "Task(..)"),
            Command::Batch(inner) => f.debug_tuple("Batch").field(inner).finish(),
        }
    }
}

/// Value of a named field in a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

/// Named toggle and input values of one container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: BTreeMap<String, FieldValue>,
}

impl Form {
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.fields.get(name) {
            Some(FieldValue::Flag(flag)) => Some(*flag),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// State handed to `interact` and `receive`
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub width: u16,
    pub height: u16,
    /// Whether the screen owning the element is drilled into
    pub screen_active: bool,
    /// Fields of the container that owns the element
    pub form: &'a Form,
}

impl<'a> Context<'a> {
    pub fn new(width: u16, height: u16, screen_active: bool, form: &'a Form) -> Self {
        Self {
            width,
            height,
            screen_active,
            form,
        }
    }

    /// Same context with a different form
    pub fn with_form<'b>(&self, form: &'b Form) -> Context<'b> {
        Context {
            width: self.width,
            height: self.height,
            screen_active: self.screen_active,
            form,
        }
    }
}
