//! Single-threaded dispatch of queued messages
//!
//! [`App`] owns all UI state: screens, the popup stack and the toasts.
//! [`Dispatcher`] drains the inbound queue one message at a time, lets
//! the app route it, then executes the resulting commands in order before
//! taking the next message. Nothing else mutates UI state.

use super::component::{Command, Component, Context, Form};
use super::events::{queue, Key, Message, Nav, QueueReceiver, QueueSender};
use super::focus::{advance, reset, resolve, update_focus, Step};
use super::notifications::NotificationManager;
use super::popup::PopupStack;
use super::render;
use super::screen::Screen;
use crate::error::Result;
use crate::messages::AppEvent;
use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::{debug, trace, warn};

/// Root of the UI state
pub struct App {
    screens: Vec<Screen>,
    current: usize,
    active: bool,
    popups: PopupStack,
    notifications: NotificationManager,
    width: u16,
    height: u16,
    should_quit: bool,
}

impl App {
    /// Resolve every cursor; a lone screen starts drilled into
    pub fn new(mut screens: Vec<Screen>) -> Self {
        let active = screens.len() == 1;
        for screen in &mut screens {
            resolve(screen, false);
        }
        if let Some(first) = screens.first_mut().filter(|_| active) {
            resolve(first, true);
        }
        Self {
            screens,
            current: 0,
            active,
            popups: PopupStack::new(),
            notifications: NotificationManager::new(),
            width: 0,
            height: 0,
            should_quit: false,
        }
    }

    pub fn with_notifications(mut self, notifications: NotificationManager) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn screen_mut(&mut self, index: usize) -> Option<&mut Screen> {
        self.screens.get_mut(index)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_screen(&self) -> Option<&Screen> {
        self.screens.get(self.current)
    }

    /// Whether the current screen is drilled into
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn popups(&self) -> &PopupStack {
        &self.popups
    }

    pub fn popups_mut(&mut self) -> &mut PopupStack {
        &mut self.popups
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Route one message; returns commands in execution order
    pub fn dispatch(&mut self, message: Message) -> Vec<Command> {
        trace!("dispatch {:?}", message);
        let command = match message {
            Message::Key(key) => self.on_key(key),
            Message::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.broadcast(&message)
            }
            Message::Async(_) => self.broadcast(&message),
        };
        let mut commands = Vec::new();
        if let Some(command) = command {
            command.flatten(&mut commands);
        }
        commands
    }

    fn on_key(&mut self, key: Key) -> Option<Command> {
        if !self.popups.is_empty() {
            return self.on_popup_key(key);
        }
        match key.nav() {
            Some(Nav::Prev) => self.navigate(Step::Prev),
            Some(Nav::Next) => self.navigate(Step::Next),
            Some(Nav::Enter) => self.on_enter(),
            Some(Nav::Escape) => self.on_escape(),
            None => self.broadcast(&Message::Key(key)),
        }
    }

    fn on_popup_key(&mut self, key: Key) -> Option<Command> {
        let form = Form::default();
        let ctx = Context::new(self.width, self.height, self.active, &form);
        let popup = self.popups.front_mut()?;
        match key.nav() {
            Some(Nav::Prev) => {
                advance(popup, Step::Prev);
                None
            }
            Some(Nav::Next) => {
                advance(popup, Step::Next);
                None
            }
            Some(Nav::Escape) => {
                self.popups.close();
                None
            }
            Some(Nav::Enter) => {
                let id = popup.id();
                let interaction = popup.activate(&ctx);
                let dismiss = interaction.closes.then_some(Command::Dismiss(id));
                Command::batch([interaction.command, dismiss])
            }
            None => popup.receive(&Message::Key(key), &ctx),
        }
    }

    fn navigate(&mut self, step: Step) -> Option<Command> {
        let count = self.screens.len();
        if count == 0 {
            return None;
        }
        if self.active {
            if let Some(screen) = self.screens.get_mut(self.current) {
                update_focus(screen, step);
            }
        } else {
            self.current = match step {
                Step::Next => (self.current + 1) % count,
                Step::Prev => (self.current + count - 1) % count,
                Step::Stay => self.current,
            };
        }
        None
    }

    fn on_enter(&mut self) -> Option<Command> {
        let form = Form::default();
        let ctx = Context::new(self.width, self.height, true, &form);
        let screen = self.screens.get_mut(self.current)?;
        if !self.active {
            self.active = true;
            reset(screen, true);
            return Some(self.activation());
        }
        if screen.entries().is_empty() {
            return None;
        }
        let command = screen.interact(&ctx);
        if command.is_none() {
            update_focus(screen, Step::Next);
        }
        command
    }

    fn on_escape(&mut self) -> Option<Command> {
        if self.active && self.screens.len() > 1 {
            self.active = false;
            if let Some(screen) = self.screens.get_mut(self.current) {
                screen.set_focus(false);
            }
            return Some(self.activation());
        }
        Some(Command::Quit)
    }

    fn activation(&self) -> Command {
        let label = self
            .current_screen()
            .map(|s| s.label().to_string())
            .unwrap_or_default();
        Command::Emit(AppEvent::ScreenActivated {
            label,
            active: self.active,
        })
    }

    /// Deliver a message to every screen, popup and the toasts
    fn broadcast(&mut self, message: &Message) -> Option<Command> {
        let form = Form::default();
        let mut commands = Vec::new();
        for (i, screen) in self.screens.iter_mut().enumerate() {
            let ctx = Context::new(
                self.width,
                self.height,
                self.active && i == self.current,
                &form,
            );
            commands.push(screen.receive(message, &ctx));
        }
        let ctx = Context::new(self.width, self.height, self.active, &form);
        for popup in self.popups.iter_mut() {
            commands.push(popup.receive(message, &ctx));
        }
        self.notifications.receive(message);
        Command::batch(commands)
    }

    /// Apply commands in order
    pub fn execute(&mut self, commands: Vec<Command>, queue: &QueueSender) {
        for command in commands {
            match command {
                Command::OpenPopup(popup) => {
                    debug!("Opening popup '{}'", popup.title());
                    self.popups.open(popup);
                }
                Command::ClosePopup => {
                    self.popups.close();
                }
                Command::Dismiss(id) => {
                    self.popups.remove(id);
                }
                Command::Quit => {
                    debug!("Quit requested");
                    self.should_quit = true;
                }
                Command::Emit(event) => {
                    queue.send_event(event);
                }
                Command::Task(future) => match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        let queue = queue.clone();
                        handle.spawn(async move {
                            if let Some(event) = future.await {
                                queue.send_event(event);
                            }
                        });
                    }
                    Err(_) => warn!("No runtime available, dropping task"),
                },
                Command::Batch(inner) => {
                    let mut flat = Vec::new();
                    Command::Batch(inner).flatten(&mut flat);
                    self.execute(flat, queue);
                }
            }
        }
    }
}

/// Drains the inbound queue into an [`App`]
pub struct Dispatcher {
    app: App,
    inbox: QueueReceiver,
    outbox: QueueSender,
}

impl Dispatcher {
    pub fn new(app: App) -> Self {
        let (outbox, inbox) = queue();
        Self { app, inbox, outbox }
    }

    /// Handle for producers
    pub fn sender(&self) -> QueueSender {
        self.outbox.clone()
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// One dispatch step: route, then execute
    pub fn process(&mut self, message: Message) {
        let commands = self.app.dispatch(message);
        self.app.execute(commands, &self.outbox);
    }

    /// Wait for and process the next message
    pub async fn step(&mut self) -> bool {
        match self.inbox.recv().await {
            Some(message) => {
                self.process(message);
                true
            }
            None => false,
        }
    }

    /// Process whatever is already queued; returns how many were handled
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while !self.app.should_quit {
            let Some(message) = self.inbox.try_recv() else {
                break;
            };
            self.process(message);
            handled += 1;
        }
        handled
    }

    /// Run until a quit command, redrawing after every message
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let size = terminal.size()?;
        self.process(Message::Resize {
            width: size.width,
            height: size.height,
        });
        terminal.draw(|frame| render::draw(frame, &self.app))?;

        while !self.app.should_quit {
            if !self.step().await {
                debug!("Inbound queue closed");
                break;
            }
            terminal.draw(|frame| render::draw(frame, &self.app))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::focus::Container;
    use crate::tui::item::{Button, Label};
    use crate::tui::pane::Pane;
    use crate::tui::popup::Popup;
    use crate::tui::theme::Palette;

    fn screens() -> Vec<Screen> {
        vec![
            Screen::new("One")
                .entry(Button::new("a", Palette::GREEN))
                .entry(Button::new("b", Palette::GREEN)),
            Screen::new("Two").entry(
                Pane::new("p", Palette::BLUE)
                    .item(Button::new("c", Palette::GREEN).on_press(|_| {
                        Some(Command::OpenPopup(Popup::ok("Hi", "there")))
                    })),
            ),
        ]
    }

    fn press(app: &mut App, key: Key) -> Vec<Command> {
        let (tx, _rx) = queue();
        let commands = app.dispatch(Message::Key(key));
        let mut emitted = Vec::new();
        for command in commands {
            match command {
                Command::Emit(_) => emitted.push(command),
                other => app.execute(vec![other], &tx),
            }
        }
        emitted
    }

    #[test]
    fn test_tab_level_cycles_with_wrap() {
        let mut app = App::new(screens());
        assert!(!app.is_active());
        press(&mut app, Key::Up);
        assert_eq!(app.current(), 1);
        press(&mut app, Key::Down);
        assert_eq!(app.current(), 0);
    }

    #[test]
    fn test_enter_activates_and_emits() {
        let mut app = App::new(screens());
        let emitted = press(&mut app, Key::Enter);
        assert!(app.is_active());
        assert!(matches!(
            emitted.as_slice(),
            [Command::Emit(AppEvent::ScreenActivated { active: true, .. })]
        ));
        assert!(app.screens()[0].entries()[0].is_focused());
    }

    #[test]
    fn test_enter_without_command_advances() {
        let mut app = App::new(screens());
        press(&mut app, Key::Enter);
        press(&mut app, Key::Enter);
        assert_eq!(app.screens()[0].cursor(), 1);
    }

    #[test]
    fn test_escape_deactivates_then_quits() {
        let mut app = App::new(screens());
        press(&mut app, Key::Enter);
        press(&mut app, Key::Esc);
        assert!(!app.is_active());
        assert!(!app.screens()[0].entries()[0].is_focused());
        assert!(!app.should_quit());
        press(&mut app, Key::Esc);
        assert!(app.should_quit());
    }

    #[test]
    fn test_single_screen_starts_active_and_escape_quits() {
        let mut app = App::new(vec![Screen::new("Only").entry(Button::new("x", Palette::GREEN))]);
        assert!(app.is_active());
        assert!(app.screens()[0].entries()[0].is_focused());
        press(&mut app, Key::Esc);
        assert!(app.should_quit());
    }

    #[test]
    fn test_popup_opens_and_is_dismissed_by_button() {
        let mut app = App::new(screens());
        press(&mut app, Key::Down);
        press(&mut app, Key::Enter);
        press(&mut app, Key::Enter);
        assert_eq!(app.popups().len(), 1);
        press(&mut app, Key::Enter);
        assert!(app.popups().is_empty());
    }

    #[test]
    fn test_popup_escape_closes_front() {
        let mut app = App::new(screens());
        let (tx, _rx) = queue();
        app.execute(
            vec![
                Command::OpenPopup(Popup::ok("one", "")),
                Command::OpenPopup(Popup::ok("two", "")),
            ],
            &tx,
        );
        press(&mut app, Key::Ctrl('c'));
        assert_eq!(app.popups().front().map(|p| p.title()), Some("one"));
    }

    #[test]
    fn test_label_sees_broadcast() {
        let mut app = App::new(screens());
        if let Some(s) = app.screen_mut(1) {
            *s = Screen::new("Two").entry(Label::new("?", Palette::INACTIVE).on_receive(
                |label, message, _| {
                    if let Message::Resize { width, .. } = message {
                        label.set_text(width.to_string());
                    }
                    None
                },
            ));
        }
        app.dispatch(Message::Resize {
            width: 99,
            height: 30,
        });
        assert_eq!(app.size(), (99, 30));
        let label = app.screens()[1].entries()[0].as_item().unwrap();
        assert_eq!(label.render().lines[0].spans[0].content, "99");
    }
}
