use super::events::Message;
use super::theme::Palette;
use crate::messages::AppEvent;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use std::time::{Duration, Instant};

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl NotificationKind {
    pub fn color(&self) -> Color {
        match self {
            NotificationKind::Info => Palette::BLUE,
            NotificationKind::Success => Palette::SUCCESS,
            NotificationKind::Error => Palette::ERROR,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Info => "i",
            NotificationKind::Success => "+",
            NotificationKind::Error => "x",
        }
    }
}

/// A single toast
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: Instant,
    pub ttl: Duration,
}

/// Expiring toasts shown over the top-right corner
#[derive(Debug)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
    ttl: Duration,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(5))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            notifications: Vec::new(),
            ttl,
        }
    }

    pub fn notify(&mut self, kind: NotificationKind, message: String) {
        self.notifications.push(Notification {
            message,
            kind,
            timestamp: Instant::now(),
            ttl: self.ttl,
        });
    }

    /// Drop expired toasts
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.timestamp) < n.ttl);
    }

    /// Turn command and save results into toasts
    pub fn receive(&mut self, message: &Message) {
        let Message::Async(event) = message else {
            return;
        };
        match event {
            AppEvent::Tick => self.tick(),
            AppEvent::CommandFinished(report) => match &report.outcome {
                Ok(_) => self.notify(NotificationKind::Success, format!("{}: done", report.action)),
                Err(reason) => self.notify(
                    NotificationKind::Error,
                    format!("{}: {}", report.action, reason),
                ),
            },
            AppEvent::SettingsSaved(Ok(key)) => {
                self.notify(NotificationKind::Info, format!("Saved {}", key))
            }
            AppEvent::SettingsSaved(Err(reason)) => {
                self.notify(NotificationKind::Error, format!("Save failed: {}", reason))
            }
            _ => {}
        }
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &NotificationManager {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 40.min(area.width);
        let right_margin = 2;
        let height = 3;
        let mut y = area.y + 1;

        // Newest on top
        for notification in self.notifications.iter().rev() {
            if area.bottom().saturating_sub(y) < height {
                break;
            }
            let x = area.right().saturating_sub(width + right_margin).max(area.x);
            let notif_area = Rect::new(x, y, width, height);

            Clear.render(notif_area, buf);

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(notification.kind.color()));

            let text = format!("{} {}", notification.kind.icon(), notification.message);
            Paragraph::new(text)
                .block(block)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Palette::ACTIVE))
                .render(notif_area, buf);

            y += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::CommandReport;

    #[test]
    fn test_notification_manager() {
        let mut manager = NotificationManager::new();
        manager.notify(NotificationKind::Info, "Test".to_string());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_expiration_on_tick() {
        let mut manager = NotificationManager::new();
        manager.notify(NotificationKind::Info, "Test".to_string());

        manager.notifications[0].timestamp = Instant::now() - Duration::from_secs(10);

        manager.receive(&Message::Async(AppEvent::Tick));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_command_failure_becomes_error_toast() {
        let mut manager = NotificationManager::new();
        manager.receive(&Message::Async(AppEvent::CommandFinished(CommandReport::failed(
            "restart monerod",
            "timed out",
        ))));
        assert_eq!(manager.notifications[0].kind, NotificationKind::Error);
        assert_eq!(manager.notifications[0].message, "restart monerod: timed out");
    }
}
