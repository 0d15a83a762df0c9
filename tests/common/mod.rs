//! Common test utilities and builders
#![allow(dead_code)]

use sshui_core::tui::{
    App, Button, Command, Component, Context, Entry, Form, Item, Label, Message, Pane, Palette,
    Popup, Screen, Toggle,
};

/// Screen with one pane `[disabled toggle, button, button]` and a trailing label
pub fn mixed_screen() -> Screen {
    Screen::new("Mixed")
        .entry(
            Pane::new("Pane", Palette::BLUE)
                .item(Toggle::new("Off", Palette::GREEN).enabled(false))
                .item(Button::new("First", Palette::GREEN))
                .item(Button::new("Second", Palette::GREEN)),
        )
        .entry(Label::new("Footer", Palette::INACTIVE).enabled(true))
}

/// Screen whose only button opens an OK popup
pub fn popup_screen(label: &str) -> Screen {
    Screen::new(label)
        .entry(
            Button::new("Open", Palette::GREEN)
                .on_press(|_| Some(Command::OpenPopup(Popup::ok("Notice", "Hello")))),
        )
        .entry(Button::new("Other", Palette::GREEN))
}

/// Screen from an enabled-flag layout: `Some(flags)` is a pane, `None` a bare button
pub fn screen_from_layout(layout: &[Option<Vec<bool>>]) -> Screen {
    let mut screen = Screen::new("Generated");
    for (i, entry) in layout.iter().enumerate() {
        screen = match entry {
            Some(flags) => {
                let items = flags.iter().enumerate().map(|(j, enabled)| {
                    Item::from(Button::new(format!("{}.{}", i, j), Palette::GREEN).enabled(*enabled))
                });
                screen.entry(Pane::new(format!("Pane {}", i), Palette::BLUE).items(items))
            }
            None => screen.entry(Button::new(format!("{}", i), Palette::GREEN)),
        };
    }
    screen
}

/// Labels of focused leaves, across panes
pub fn focused_leaves(screen: &Screen) -> Vec<String> {
    let mut out = Vec::new();
    for entry in screen.entries() {
        match entry {
            Entry::Item(item) if item.is_focused() => out.push(item_label(item)),
            Entry::Pane(pane) => out.extend(
                pane.entries()
                    .iter()
                    .filter(|item| item.is_focused())
                    .map(item_label),
            ),
            _ => {}
        }
    }
    out
}

pub fn item_label(item: &Item) -> String {
    match item {
        Item::Label(label) => label.text().to_string(),
        Item::Toggle(toggle) => toggle.label().to_string(),
        Item::Button(button) => button.label().to_string(),
        Item::Input(input) => input.value().to_string(),
    }
}

/// Deliver a message straight to a component
pub fn deliver<C: Component>(component: &mut C, message: &Message) -> Option<Command> {
    let form = Form::default();
    let ctx = Context::new(80, 24, true, &form);
    component.receive(message, &ctx)
}

/// An app over the given screens, already sized
pub fn app(screens: Vec<Screen>) -> App {
    let mut app = App::new(screens);
    app.dispatch(Message::Resize {
        width: 80,
        height: 24,
    });
    app
}
