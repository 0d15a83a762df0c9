//! Message protocol and the inbound queue
//!
//! Every producer (keyboard reader, pollers, signal listener, finished
//! tasks) holds a [`QueueSender`]. The dispatcher owns the single
//! [`QueueReceiver`] and drains it one message at a time.

use crate::messages::AppEvent;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

/// A message processed by one dispatch step
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Terminal was resized
    Resize { width: u16, height: u16 },
    /// Key press
    Key(Key),
    /// Application payload from a producer or a finished task
    Async(AppEvent),
}

/// Key identifiers the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Enter,
    Esc,
    Backspace,
    Delete,
    Home,
    End,
    Char(char),
    Ctrl(char),
    Other,
}

/// Meaning of a key for focus navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Prev,
    Next,
    Enter,
    Escape,
}

impl Key {
    /// Navigation role of this key, if any
    pub fn nav(self) -> Option<Nav> {
        match self {
            Key::Up | Key::BackTab => Some(Nav::Prev),
            Key::Down | Key::Tab => Some(Nav::Next),
            Key::Enter => Some(Nav::Enter),
            Key::Esc | Key::Ctrl('c') => Some(Nav::Escape),
            _ => None,
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char(c) = key.code {
                return Key::Ctrl(c.to_ascii_lowercase());
            }
        }
        match key.code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

/// Producer side of the inbound queue
#[derive(Debug, Clone)]
pub struct QueueSender {
    tx: mpsc::UnboundedSender<Message>,
}

impl QueueSender {
    /// Enqueue a message. Never blocks; returns false once the
    /// dispatcher has gone away.
    pub fn send(&self, message: Message) -> bool {
        self.tx.send(message).is_ok()
    }

    /// Enqueue an application payload
    pub fn send_event(&self, event: AppEvent) -> bool {
        self.send(Message::Async(event))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the inbound queue, owned by the dispatcher
#[derive(Debug)]
pub struct QueueReceiver {
    rx: mpsc::UnboundedReceiver<Message>,
}

impl QueueReceiver {
    /// Wait for the next message; None when every sender is gone
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Take a message if one is already queued
    pub fn try_recv(&mut self) -> Option<Message> {
        self.rx.try_recv().ok()
    }
}

/// Create the inbound queue
pub fn queue() -> (QueueSender, QueueReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueueSender { tx }, QueueReceiver { rx })
}

/// Keyboard and resize reader
///
/// Crossterm's reader is blocking, so it runs on its own blocking thread
/// and polls with a short timeout to notice shutdown.
pub struct InputReader {
    /// Poll timeout in milliseconds
    poll_ms: u64,
}

impl InputReader {
    pub fn new(poll_ms: u64) -> Self {
        Self { poll_ms }
    }

    /// Translate a terminal event into a message
    pub fn translate(event: Event) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(Message::Key(key.into())),
            Event::Resize(width, height) => Some(Message::Resize { width, height }),
            _ => None,
        }
    }

    /// Start reading on a blocking thread
    pub fn spawn(
        self,
        queue: QueueSender,
        mut shutdown: broadcast::Receiver<()>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::task::spawn_blocking(move || {
            let timeout = Duration::from_millis(self.poll_ms);
            loop {
                if !matches!(shutdown.try_recv(), Err(broadcast::error::TryRecvError::Empty)) {
                    debug!("Input reader stopping");
                    return;
                }
                match event::poll(timeout) {
                    Ok(true) => match event::read() {
                        Ok(ev) => {
                            if let Some(message) = Self::translate(ev) {
                                if !queue.send(message) {
                                    return;
                                }
                            }
                        }
                        Err(e) => warn!("Failed to read terminal event: {}", e),
                    },
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Terminal poll failed, input reader exiting: {}", e);
                        return;
                    }
                }
            }
        })
    }
}

impl Default for InputReader {
    fn default() -> Self {
        Self::new(100) // 100ms poll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_c_is_escape() {
        let key: Key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL).into();
        assert_eq!(key, Key::Ctrl('c'));
        assert_eq!(key.nav(), Some(Nav::Escape));
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(Key::Tab.nav(), Some(Nav::Next));
        assert_eq!(Key::BackTab.nav(), Some(Nav::Prev));
        assert_eq!(Key::Char('j').nav(), None);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut release = KeyEvent::from(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(InputReader::translate(Event::Key(release)), None);
        assert_eq!(
            InputReader::translate(Event::Resize(80, 24)),
            Some(Message::Resize {
                width: 80,
                height: 24
            })
        );
    }

    #[tokio::test]
    async fn test_queue_closed_after_receiver_drop() {
        let (tx, rx) = queue();
        assert!(tx.send(Message::Key(Key::Enter)));
        drop(rx);
        assert!(!tx.send(Message::Key(Key::Enter)));
        assert!(tx.is_closed());
    }
}
