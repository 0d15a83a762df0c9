//! Modal overlays and the popup stack

use super::component::{Command, Component, Context, Form};
use super::events::Message;
use super::focus::{apply_focus, focus_first, Container};
use super::item::{Button, Item};
use super::theme::Palette;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use std::collections::VecDeque;

/// Identity assigned to a popup when it is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PopupId(u64);

/// Result of pressing Enter inside a popup
#[derive(Debug, Default)]
pub struct PopupInteraction {
    /// Command returned by the focused item
    pub command: Option<Command>,
    /// The focused item terminates the popup
    pub closes: bool,
}

/// A modal, screen-like overlay
pub struct Popup {
    id: PopupId,
    title: String,
    body: String,
    color: Color,
    items: Vec<Item>,
    cursor: usize,
}

impl Popup {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: PopupId::default(),
            title: title.into(),
            body: body.into(),
            color: Palette::LIGHT_AQUA,
            items: Vec::new(),
            cursor: 0,
        }
    }

    pub fn item(mut self, item: impl Into<Item>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Acknowledgement popup with a single OK button
    pub fn ok(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(title, body).item(Button::new("OK", Palette::GREEN))
    }

    /// Error acknowledgement
    pub fn alert(body: impl Into<String>) -> Self {
        Self::ok("Error", body).color(Palette::LIGHT_RED)
    }

    /// Confirmation with Yes and No; only Yes runs `on_yes`
    pub fn yes_no<F>(title: impl Into<String>, body: impl Into<String>, on_yes: F) -> Self
    where
        F: FnMut(&Context) -> Option<Command> + 'static,
    {
        Self::new(title, body)
            .item(Button::new("Yes", Palette::GREEN).on_press(on_yes))
            .item(Button::new("No", Palette::LIGHT_RED))
    }

    /// Form popup: OK validates fields before running `on_ok`
    pub fn ok_cancel<F>(
        title: impl Into<String>,
        body: impl Into<String>,
        fields: impl IntoIterator<Item = Item>,
        on_ok: F,
    ) -> Self
    where
        F: FnMut(&Context) -> Option<Command> + 'static,
    {
        let mut popup = Self::new(title, body);
        popup.items.extend(fields);
        popup
            .item(Button::new("OK", Palette::GREEN).submits().on_press(on_ok))
            .item(Button::new("Cancel", Palette::LIGHT_RED))
    }

    pub fn id(&self) -> PopupId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn entries(&self) -> &[Item] {
        &self.items
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }

    pub fn form(&self) -> Form {
        let mut form = Form::default();
        for item in &self.items {
            item.collect(&mut form);
        }
        form
    }

    /// Columns needed to show the popup without wrapping
    pub fn width(&self) -> u16 {
        let title = self.title.chars().count() + 4;
        let body = self
            .body
            .lines()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let items = self
            .runs()
            .into_iter()
            .map(|run| match run {
                Run::Buttons(buttons) => {
                    buttons.iter().map(|b| b.min_width()).sum::<usize>() + buttons.len()
                }
                Run::Single(item) => item.min_width(),
            })
            .max()
            .unwrap_or(0);
        title.max(body).max(items).min(u16::MAX as usize) as u16
    }

    /// Consecutive buttons share a line
    fn runs(&self) -> Vec<Run<'_>> {
        let mut runs: Vec<Run<'_>> = Vec::new();
        for item in &self.items {
            if !matches!(item, Item::Button(_)) {
                runs.push(Run::Single(item));
                continue;
            }
            if let Some(Run::Buttons(buttons)) = runs.last_mut() {
                buttons.push(item);
                continue;
            }
            runs.push(Run::Buttons(vec![item]));
        }
        runs
    }

    /// Enter on the focused item
    ///
    /// A submitting button validates every input field first; the first
    /// failure rejects the interaction and yields an alert popup instead.
    pub fn activate(&mut self, ctx: &Context) -> PopupInteraction {
        let cursor = self.cursor;
        let submits = match self.items.get(cursor) {
            Some(item) if item.is_enabled() => item.as_button().map(Button::is_submit),
            _ => return PopupInteraction::default(),
        };

        if submits == Some(true) {
            if let Some(error) = self.validate() {
                return PopupInteraction {
                    command: Some(Command::OpenPopup(Popup::alert(error))),
                    closes: false,
                };
            }
        }

        let form = self.form();
        let command = self
            .items
            .get_mut(cursor)
            .and_then(|item| item.interact(&ctx.with_form(&form)));
        PopupInteraction {
            command,
            closes: submits.is_some(),
        }
    }

    fn validate(&mut self) -> Option<String> {
        for item in &mut self.items {
            if let Some(input) = item.as_input_mut() {
                if let Err(error) = input.validate() {
                    return Some(error);
                }
            }
        }
        None
    }
}

enum Run<'a> {
    Buttons(Vec<&'a Item>),
    Single(&'a Item),
}

impl Container for Popup {
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

impl Component for Popup {
    fn render(&self) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = self
            .body
            .lines()
            .map(|line| Line::styled(line.to_string(), Style::default().fg(Palette::ACTIVE)))
            .collect();
        if !self.body.is_empty() && !self.items.is_empty() {
            lines.push(Line::default());
        }
        for run in self.runs() {
            match run {
                Run::Buttons(buttons) => {
                    let mut spans: Vec<Span<'static>> = Vec::new();
                    for (i, button) in buttons.iter().enumerate() {
                        if i > 0 {
                            spans.push(Span::raw(" "));
                        }
                        for line in button.render().lines {
                            spans.extend(line.spans);
                        }
                    }
                    lines.push(Line::from(spans).centered());
                }
                Run::Single(item) => lines.extend(item.render().lines),
            }
        }
        Text::from(lines)
    }

    fn is_enabled(&self) -> bool {
        self.items.iter().any(|item| item.is_enabled())
    }

    fn is_focused(&self) -> bool {
        true
    }

    fn set_focus(&mut self, focus: bool) {
        apply_focus(self, focus);
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn interact(&mut self, ctx: &Context) -> Option<Command> {
        self.activate(ctx).command
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

/// LIFO stack of open popups; the front is the interactive one
#[derive(Default)]
pub struct PopupStack {
    popups: VecDeque<Popup>,
    next_id: u64,
}

impl PopupStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus the popup's first enabled item and push it to the front
    pub fn open(&mut self, mut popup: Popup) -> PopupId {
        self.next_id += 1;
        popup.id = PopupId(self.next_id);
        focus_first(&mut popup);
        apply_focus(&mut popup, true);
        let id = popup.id;
        self.popups.push_front(popup);
        id
    }

    /// Pop the front popup; the next one keeps its suspended focus
    pub fn close(&mut self) -> Option<Popup> {
        self.popups.pop_front()
    }

    /// Remove a popup wherever it sits
    pub fn remove(&mut self, id: PopupId) -> Option<Popup> {
        let index = self.popups.iter().position(|p| p.id == id)?;
        self.popups.remove(index)
    }

    pub fn front(&self) -> Option<&Popup> {
        self.popups.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut Popup> {
        self.popups.front_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Popup> {
        self.popups.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Popup> {
        self.popups.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }
}
