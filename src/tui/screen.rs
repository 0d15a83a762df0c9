//! Top-level tabs

use super::component::{Command, Component, Context, Form, Hook};
use super::events::Message;
use super::focus::{apply_focus, Composite, Container};
use super::item::{Button, InputField, Item, Label, Toggle};
use super::pane::Pane;
use super::theme::Palette;
use ratatui::style::Color;
use ratatui::text::{Line, Text};

/// Axis along which a screen lays out its entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Anchor of the content block, 0.0 = start, 0.5 = centre, 1.0 = end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            horizontal: 0.0,
            vertical: 0.0,
        }
    }
}

/// A top-level entry of a screen
pub enum Entry {
    Item(Item),
    Pane(Pane),
}

impl Entry {
    pub fn as_pane(&self) -> Option<&Pane> {
        match self {
            Entry::Pane(pane) => Some(pane),
            Entry::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Entry::Item(item) => Some(item),
            Entry::Pane(_) => None,
        }
    }

    fn inner(&self) -> &dyn Component {
        match self {
            Entry::Item(item) => item,
            Entry::Pane(pane) => pane,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Component {
        match self {
            Entry::Item(item) => item,
            Entry::Pane(pane) => pane,
        }
    }
}

impl Component for Entry {
    fn render(&self) -> Text<'static> {
        self.inner().render()
    }

    fn is_enabled(&self) -> bool {
        self.inner().is_enabled()
    }

    fn is_focused(&self) -> bool {
        self.inner().is_focused()
    }

    fn set_focus(&mut self, focus: bool) {
        self.inner_mut().set_focus(focus);
    }

    fn color(&self) -> Color {
        self.inner().color()
    }

    fn set_color(&mut self, color: Color) {
        self.inner_mut().set_color(color);
    }

    fn interact(&mut self, ctx: &Context) -> Option<Command> {
        self.inner_mut().interact(ctx)
    }

    fn receive(&mut self, message: &Message, ctx: &Context) -> Option<Command> {
        self.inner_mut().receive(message, ctx)
    }
}

impl From<Pane> for Entry {
    fn from(pane: Pane) -> Self {
        Entry::Pane(pane)
    }
}

impl From<Item> for Entry {
    fn from(item: Item) -> Self {
        Entry::Item(item)
    }
}

macro_rules! entry_from_item {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Entry {
            fn from(item: $ty) -> Self {
                Entry::Item(item.into())
            }
        })*
    };
}

entry_from_item!(Label, Toggle, Button, InputField);

/// A tab of the console
pub struct Screen {
    label: String,
    color: Color,
    entries: Vec<Entry>,
    cursor: usize,
    focus: bool,
    orientation: Orientation,
    placement: Placement,
    item_width: u16,
    hook: Option<Hook<Screen>>,
}

impl Screen {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: Palette::INACTIVE,
            entries: Vec::new(),
            cursor: 0,
            focus: false,
            orientation: Orientation::default(),
            placement: Placement::default(),
            item_width: 0,
            hook: None,
        }
    }

    pub fn entry(mut self, entry: impl Into<Entry>) -> Self {
        self.entries.push(entry.into());
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn placement(mut self, horizontal: f32, vertical: f32) -> Self {
        self.placement = Placement {
            horizontal: horizontal.clamp(0.0, 1.0),
            vertical: vertical.clamp(0.0, 1.0),
        };
        self
    }

    /// Preferred width of each entry in columns, 0 for automatic
    pub fn item_width(mut self, width: u16) -> Self {
        self.item_width = width;
        self
    }

    /// Attach a screen-level message handler
    pub fn on_receive<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Screen, &Message, &Context) -> Option<Command> + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    pub fn layout(&self) -> (Orientation, Placement, u16) {
        (self.orientation, self.placement, self.item_width)
    }

    /// Named values of the screen's bare items
    pub fn form(&self) -> Form {
        let mut form = Form::default();
        for entry in &self.entries {
            if let Entry::Item(item) = entry {
                item.collect(&mut form);
            }
        }
        form
    }
}

impl Container for Screen {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_enabled_at(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|e| e.is_enabled())
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    fn set_focus_at(&mut self, index: usize, focus: bool) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.set_focus(focus);
        }
    }
}

impl Composite for Screen {
    fn child_at(&mut self, index: usize) -> Option<&mut dyn Container> {
        match self.entries.get_mut(index) {
            Some(Entry::Pane(pane)) => Some(pane),
            _ => None,
        }
    }
}

impl Component for Screen {
    fn render(&self) -> Text<'static> {
        Text::from(Line::styled(
            self.label.clone(),
            ratatui::style::Style::default().fg(self.color),
        ))
    }

    fn is_enabled(&self) -> bool {
        self.entries.iter().any(|e| e.is_enabled())
    }

    fn is_focused(&self) -> bool {
        self.focus
    }

    fn set_focus(&mut self, focus: bool) {
        self.focus = focus;
        apply_focus(self, focus);
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn interact(&mut self, ctx: &Context) -> Option<Command> {
        let form = self.form();
        let cursor = self.cursor;
        match self.entries.get_mut(cursor) {
            Some(entry) if entry.is_enabled() => entry.interact(&ctx.with_form(&form)),
            _ => None,
        }
    }

    fn receive(&mut self, message: &Message, ctx: &Context) -> Option<Command> {
        let own = match self.hook.take() {
            Some(mut hook) => {
                let command = hook(self, message, ctx);
                self.hook = Some(hook);
                command
            }
            None => None,
        };
        let form = self.form();
        let ctx = ctx.with_form(&form);
        let mut commands = vec![own];
        commands.extend(self.entries.iter_mut().map(|e| e.receive(message, &ctx)));
        Command::batch(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::AppEvent;
    use crate::tui::focus::{update_focus, Step};

    fn sample() -> Screen {
        Screen::new("Node")
            .entry(
                Pane::new("Settings", Palette::BLUE)
                    .item(Toggle::new("Off", Palette::GREEN).enabled(false))
                    .item(Button::new("One", Palette::GREEN))
                    .item(Button::new("Two", Palette::GREEN)),
            )
            .entry(Label::new("Footer", Palette::INACTIVE).enabled(true))
    }

    #[test]
    fn test_pane_entry_is_child() {
        let mut screen = sample();
        assert!(screen.child_at(0).is_some());
        assert!(screen.child_at(1).is_none());
        assert!(screen.child_at(7).is_none());
    }

    #[test]
    fn test_backward_into_pane_focuses_last() {
        let mut screen = sample();
        screen.set_cursor(1);
        update_focus(&mut screen, Step::Prev);
        assert_eq!(screen.cursor(), 0);
        let pane = screen.entries()[0].as_pane().unwrap();
        assert_eq!(pane.cursor(), 2);
        assert!(pane.entries()[2].is_focused());
    }

    #[test]
    fn test_hook_runs_before_entries() {
        let mut screen = Screen::new("Shell").on_receive(|screen, message, _| {
            match message {
                Message::Async(AppEvent::ScreenActivated { label, active: true })
                    if label == screen.label() =>
                {
                    Some(Command::Quit)
                }
                _ => None,
            }
        });
        let form = Form::default();
        let ctx = Context::new(80, 24, true, &form);
        let activated = Message::Async(AppEvent::ScreenActivated {
            label: "Shell".into(),
            active: true,
        });
        assert!(matches!(screen.receive(&activated, &ctx), Some(Command::Quit)));
        assert!(screen.receive(&Message::Async(AppEvent::Tick), &ctx).is_none());
    }
}
