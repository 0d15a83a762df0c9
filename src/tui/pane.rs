//! Titled container of items with its own focus cursor

use super::component::{Command, Component, Context, Form};
use super::events::Message;
use super::focus::{apply_focus, Container};
use super::item::Item;
use ratatui::style::Color;
use ratatui::text::{Line, Text};

/// A bordered group of items
///
/// From its screen's point of view a pane is one entry: it is enabled
/// while any of its items is, and focusing it focuses the item under its
/// cursor.
pub struct Pane {
    title: String,
    color: Color,
    items: Vec<Item>,
    cursor: usize,
    focus: bool,
}

impl Pane {
    pub fn new(title: impl Into<String>, color: Color) -> Self {
        Self {
            title: title.into(),
            color,
            items: Vec::new(),
            cursor: 0,
            focus: false,
        }
    }

    /// Append an item; insertion order is traversal order
    pub fn item(mut self, item: impl Into<Item>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[Item] {
        &self.items
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }

    /// Item under the cursor, if it is enabled
    pub fn focused_item(&self) -> Option<&Item> {
        self.items
            .get(self.cursor)
            .filter(|item| item.is_enabled())
    }

    /// Named values of this pane's toggles and inputs
    pub fn form(&self) -> Form {
        let mut form = Form::default();
        for item in &self.items {
            item.collect(&mut form);
        }
        form
    }
}

impl Container for Pane {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_enabled_at(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|item| item.is_enabled())
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    fn set_focus_at(&mut self, index: usize, focus: bool) {
        if let Some(item) = self.items.get_mut(index) {
            item.set_focus(focus);
        }
    }
}

impl Component for Pane {
    fn render(&self) -> Text<'static> {
        let lines: Vec<Line<'static>> = self
            .items
            .iter()
            .flat_map(|item| item.render().lines)
            .collect();
        Text::from(lines)
    }

    fn is_enabled(&self) -> bool {
        self.items.iter().any(|item| item.is_enabled())
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
        match self.items.get_mut(cursor) {
            Some(item) if item.is_enabled() => item.interact(&ctx.with_form(&form)),
            _ => None,
        }
    }

    fn receive(&mut self, message: &Message, ctx: &Context) -> Option<Command> {
        let form = self.form();
        let ctx = ctx.with_form(&form);
        Command::batch(
            self.items
                .iter_mut()
                .map(|item| item.receive(message, &ctx))
                .collect::<Vec<_>>(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::focus::{advance, Step};
    use crate::tui::item::{Button, Label, Toggle};
    use crate::tui::theme::Palette;

    #[test]
    fn test_enabled_derives_from_children() {
        let labels = Pane::new("Status", Palette::BLUE).item(Label::new("a", Palette::BLUE));
        assert!(!labels.is_enabled());

        let buttons = Pane::new("Actions", Palette::BLUE)
            .item(Label::new("a", Palette::BLUE))
            .item(Button::new("Go", Palette::GREEN));
        assert!(buttons.is_enabled());
    }

    #[test]
    fn test_unfocusing_clears_items() {
        let mut pane = Pane::new("p", Palette::BLUE)
            .item(Button::new("a", Palette::GREEN))
            .item(Button::new("b", Palette::GREEN));
        advance(&mut pane, Step::Next);
        assert!(pane.entries()[1].is_focused());
        pane.set_focus(false);
        assert!(pane.entries().iter().all(|item| !item.is_focused()));
    }

    #[test]
    fn test_interact_sees_pane_form() {
        let mut pane = Pane::new("p", Palette::BLUE)
            .item(Toggle::new("Tor", Palette::GREEN).named("tor").toggled(true))
            .item(Button::new("Save", Palette::GREEN).on_press(|ctx| {
                (ctx.form.flag("tor") == Some(true)).then_some(Command::Quit)
            }));
        pane.set_cursor(1);
        let form = Form::default();
        let ctx = Context::new(80, 24, true, &form);
        assert!(matches!(pane.interact(&ctx), Some(Command::Quit)));
    }
}
