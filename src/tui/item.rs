//! Leaf items: labels, toggles, buttons and input fields

use super::component::{Command, Component, Context, FieldValue, Form, Hook};
use super::events::{Key, Message};
use super::theme::Palette;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use tui_input::{Input, InputRequest};

/// Action run when a button is pressed
pub type ButtonAction = Box<dyn FnMut(&Context) -> Option<Command>>;

/// Action run when a toggle flips; receives the new state
pub type ToggleAction = Box<dyn FnMut(bool, &Context) -> Option<Command>>;

/// Input validation; Err carries the message shown to the user
pub type Validator = Box<dyn Fn(&str) -> Result<(), String>>;

/// Call a hook stored on `target` without aliasing it
macro_rules! run_hook {
    ($target:expr, $message:expr, $ctx:expr) => {{
        match $target.hook.take() {
            Some(mut hook) => {
                let command = hook($target, $message, $ctx);
                $target.hook = Some(hook);
                command
            }
            None => None,
        }
    }};
}

/// Static or producer-updated text
pub struct Label {
    text: String,
    color: Color,
    focus: bool,
    enabled: bool,
    bold: bool,
    hook: Option<Hook<Label>>,
}

impl Label {
    /// Labels are disabled unless explicitly enabled
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            focus: false,
            enabled: false,
            bold: false,
            hook: None,
        }
    }

    /// Horizontal rule of `width` dashes
    pub fn rule(width: usize, color: Color) -> Self {
        Self::new("-".repeat(width), color)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Attach a message handler
    pub fn on_receive<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Label, &Message, &Context) -> Option<Command> + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Component for Label {
    fn render(&self) -> Text<'static> {
        let mut style = Style::default().fg(self.color);
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        Text::from(
            self.text
                .lines()
                .map(|line| Line::styled(line.to_string(), style))
                .collect::<Vec<_>>(),
        )
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_focused(&self) -> bool {
        self.focus
    }

    fn set_focus(&mut self, focus: bool) {
        self.focus = focus;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn interact(&mut self, _ctx: &Context) -> Option<Command> {
        None
    }

    fn receive(&mut self, message: &Message, ctx: &Context) -> Option<Command> {
        run_hook!(self, message, ctx)
    }
}

/// Checkbox-style item
pub struct Toggle {
    label: String,
    name: Option<String>,
    color: Color,
    focus: bool,
    enabled: bool,
    toggled: bool,
    action: Option<ToggleAction>,
    hook: Option<Hook<Toggle>>,
}

impl Toggle {
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            name: None,
            color,
            focus: false,
            enabled: true,
            toggled: false,
            action: None,
            hook: None,
        }
    }

    /// Field name used when the owning container builds its form
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn toggled(mut self, toggled: bool) -> Self {
        self.toggled = toggled;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn on_toggle<F>(mut self, action: F) -> Self
    where
        F: FnMut(bool, &Context) -> Option<Command> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    pub fn on_receive<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Toggle, &Message, &Context) -> Option<Command> + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    pub fn set_toggled(&mut self, toggled: bool) {
        self.toggled = toggled;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Component for Toggle {
    fn render(&self) -> Text<'static> {
        let mark = if self.toggled { "X" } else { " " };
        let line = if !self.enabled {
            Line::styled(
                format!("({}) {}", mark, self.label),
                Style::default().fg(Palette::DISABLED),
            )
        } else if self.focus {
            let frame = Style::default().fg(self.color);
            let label = Style::default().fg(Palette::INACTIVE);
            Line::from(vec![
                Span::styled("[", frame),
                Span::styled(mark.to_string(), label),
                Span::styled("] ", frame),
                Span::styled(self.label.clone(), label),
            ])
        } else {
            Line::styled(
                format!("({}) {}", mark, self.label),
                Style::default().fg(self.color),
            )
        };
        Text::from(line)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_focused(&self) -> bool {
        self.focus
    }

    fn set_focus(&mut self, focus: bool) {
        self.focus = focus;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn interact(&mut self, ctx: &Context) -> Option<Command> {
        self.toggled = !self.toggled;
        let toggled = self.toggled;
        self.action.as_mut().and_then(|action| action(toggled, ctx))
    }

    fn receive(&mut self, message: &Message, ctx: &Context) -> Option<Command> {
        run_hook!(self, message, ctx)
    }
}

/// Push button
///
/// Inside a popup every button terminates the popup once its command has
/// run. A `submits` button also validates the popup's input fields first.
pub struct Button {
    label: String,
    color: Color,
    focus: bool,
    enabled: bool,
    submits: bool,
    action: Option<ButtonAction>,
    hook: Option<Hook<Button>>,
}

impl Button {
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
            focus: false,
            enabled: true,
            submits: false,
            action: None,
            hook: None,
        }
    }

    pub fn on_press<F>(mut self, action: F) -> Self
    where
        F: FnMut(&Context) -> Option<Command> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    pub fn on_receive<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Button, &Message, &Context) -> Option<Command> + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Validate the popup's fields before running the action
    pub fn submits(mut self) -> Self {
        self.submits = true;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_submit(&self) -> bool {
        self.submits
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Component for Button {
    fn render(&self) -> Text<'static> {
        let line = if !self.enabled {
            Line::styled(
                format!("  {}  ", self.label),
                Style::default().fg(Palette::DISABLED),
            )
        } else if self.focus {
            let frame = Style::default().fg(self.color);
            Line::from(vec![
                Span::styled("[ ", frame),
                Span::styled(self.label.clone(), Style::default().fg(Palette::INACTIVE)),
                Span::styled(" ]", frame),
            ])
        } else {
            Line::styled(
                format!("  {}  ", self.label),
                Style::default().fg(self.color),
            )
        };
        Text::from(line)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_focused(&self) -> bool {
        self.focus
    }

    fn set_focus(&mut self, focus: bool) {
        self.focus = focus;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn interact(&mut self, ctx: &Context) -> Option<Command> {
        self.action.as_mut().and_then(|action| action(ctx))
    }

    fn receive(&mut self, message: &Message, ctx: &Context) -> Option<Command> {
        run_hook!(self, message, ctx)
    }
}

/// Single-line text entry
///
/// The buffer and cursor live in a [`tui_input::Input`]; this type adds
/// masking, validation and the error shown under the field.
pub struct InputField {
    name: Option<String>,
    input: Input,
    placeholder: String,
    width: usize,
    color: Color,
    focus: bool,
    enabled: bool,
    masked: bool,
    validator: Option<Validator>,
    error: Option<String>,
}

impl InputField {
    pub fn new(value: impl Into<String>, placeholder: impl Into<String>, color: Color) -> Self {
        Self {
            name: None,
            input: Input::new(value.into()),
            placeholder: placeholder.into(),
            width: 40,
            color,
            focus: false,
            enabled: true,
            masked: false,
            validator: None,
            error: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Render the value as asterisks
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Run the validator, recording the error for display
    pub fn validate(&mut self) -> Result<(), String> {
        let result = match &self.validator {
            Some(validator) => validator(self.input.value()),
            None => Ok(()),
        };
        self.error = result.as_ref().err().cloned();
        result
    }

    /// Editing request for a key, if it is an editing key
    fn request(key: Key) -> Option<InputRequest> {
        match key {
            Key::Char(c) => Some(InputRequest::InsertChar(c)),
            Key::Backspace => Some(InputRequest::DeletePrevChar),
            Key::Delete => Some(InputRequest::DeleteNextChar),
            Key::Left => Some(InputRequest::GoToPrevChar),
            Key::Right => Some(InputRequest::GoToNextChar),
            Key::Home => Some(InputRequest::GoToStart),
            Key::End => Some(InputRequest::GoToEnd),
            _ => None,
        }
    }

    /// Apply an editing key; returns whether the key was consumed
    pub fn edit(&mut self, key: Key) -> bool {
        let Some(request) = Self::request(key) else {
            return false;
        };
        if let Some(changed) = self.input.handle(request) {
            if changed.value {
                self.error = None;
            }
        }
        true
    }
}

impl Component for InputField {
    fn render(&self) -> Text<'static> {
        let style = if !self.enabled {
            Style::default().fg(Palette::DISABLED)
        } else if self.focus {
            Style::default().fg(Palette::ACTIVE)
        } else {
            Style::default().fg(self.color)
        };
        let value = self.input.value();
        let shown = if value.is_empty() {
            Span::styled(self.placeholder.clone(), Style::default().fg(Palette::DISABLED))
        } else if self.masked {
            Span::styled("*".repeat(value.chars().count()), style)
        } else {
            Span::styled(value.to_string(), style)
        };
        let mut lines = vec![Line::from(vec![Span::styled("> ", style), shown])];
        if let Some(error) = &self.error {
            lines.push(Line::styled(error.clone(), Style::default().fg(Palette::ERROR)));
        }
        Text::from(lines)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_focused(&self) -> bool {
        self.focus
    }

    fn set_focus(&mut self, focus: bool) {
        self.focus = focus;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn interact(&mut self, _ctx: &Context) -> Option<Command> {
        None
    }

    fn receive(&mut self, message: &Message, _ctx: &Context) -> Option<Command> {
        if let Message::Key(key) = message {
            if self.focus && self.enabled {
                self.edit(*key);
            }
        }
        None
    }
}

/// Any leaf item
pub enum Item {
    Label(Label),
    Toggle(Toggle),
    Button(Button),
    Input(InputField),
}

impl Item {
    /// Width hint used when sizing popups
    pub fn min_width(&self) -> usize {
        match self {
            Item::Label(label) => label.text.lines().map(|l| l.chars().count()).max().unwrap_or(0),
            Item::Toggle(toggle) => toggle.label.chars().count() + 4,
            Item::Button(button) => button.label.chars().count() + 4,
            Item::Input(input) => input.width,
        }
    }

    /// Contribute this item's named value to a form
    pub fn collect(&self, form: &mut Form) {
        match self {
            Item::Toggle(Toggle {
                name: Some(name),
                toggled,
                ..
            }) => form.insert(name.clone(), FieldValue::Flag(*toggled)),
            Item::Input(InputField {
                name: Some(name),
                input,
                ..
            }) => form.insert(name.clone(), FieldValue::Text(input.value().to_string())),
            _ => {}
        }
    }

    pub fn as_button(&self) -> Option<&Button> {
        match self {
            Item::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_input_mut(&mut self) -> Option<&mut InputField> {
        match self {
            Item::Input(input) => Some(input),
            _ => None,
        }
    }

    /// Enable or disable the item
    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            Item::Label(item) => item.set_enabled(enabled),
            Item::Toggle(item) => item.set_enabled(enabled),
            Item::Button(item) => item.set_enabled(enabled),
            Item::Input(item) => item.set_enabled(enabled),
        }
    }

    fn inner(&self) -> &dyn Component {
        match self {
            Item::Label(item) => item,
            Item::Toggle(item) => item,
            Item::Button(item) => item,
            Item::Input(item) => item,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Component {
        match self {
            Item::Label(item) => item,
            Item::Toggle(item) => item,
            Item::Button(item) => item,
            Item::Input(item) => item,
        }
    }
}

impl Component for Item {
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

impl From<Label> for Item {
    fn from(item: Label) -> Self {
        Item::Label(item)
    }
}

impl From<Toggle> for Item {
    fn from(item: Toggle) -> Self {
        Item::Toggle(item)
    }
}

impl From<Button> for Item {
    fn from(item: Button) -> Self {
        Item::Button(item)
    }
}

impl From<InputField> for Item {
    fn from(item: InputField) -> Self {
        Item::Input(item)
    }
}
