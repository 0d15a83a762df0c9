//! Dispatcher routing, popup modality and queue ordering

mod common;

use serde_json::json;
use sshui_core::messages::AppEvent;
use sshui_core::screens::shell;
use sshui_core::tui::{
    App, Button, Command, Component, Container, Dispatcher, InputField, Item, Key, Label, Message,
    Palette, Popup, Screen,
};
use std::cell::RefCell;
use std::rc::Rc;

fn press(dispatcher: &mut Dispatcher, key: Key) {
    dispatcher.process(Message::Key(key));
}

/// Dispatcher over `screens` with the first one drilled into
fn activated(screens: Vec<Screen>) -> Dispatcher {
    let mut dispatcher = Dispatcher::new(common::app(screens));
    press(&mut dispatcher, Key::Enter);
    dispatcher.drain();
    assert!(dispatcher.app().is_active());
    dispatcher
}

fn ticking_label(text: &str) -> Label {
    Label::new(text, Palette::INACTIVE)
        .enabled(true)
        .on_receive(|label, message, _| {
            if let Message::Async(AppEvent::Tick) = message {
                label.set_text("ticked");
            }
            None
        })
}

#[test]
fn popup_blocks_screen_navigation() {
    let mut dispatcher = activated(vec![common::popup_screen("One"), common::popup_screen("Two")]);
    press(&mut dispatcher, Key::Enter);
    assert_eq!(dispatcher.app().popups().len(), 1);

    let cursor_before = dispatcher.app().screens()[0].cursor();
    let focus_before = common::focused_leaves(&dispatcher.app().screens()[0]);

    for key in [Key::Down, Key::Up, Key::Tab, Key::BackTab] {
        press(&mut dispatcher, key);
    }

    let app = dispatcher.app();
    assert_eq!(app.current(), 0);
    assert_eq!(app.screens()[0].cursor(), cursor_before);
    assert_eq!(common::focused_leaves(&app.screens()[0]), focus_before);
    assert_eq!(app.popups().len(), 1);
}

#[test]
fn async_update_reaches_hidden_screens_while_popup_open() {
    let mut dispatcher = activated(vec![
        common::popup_screen("One").entry(ticking_label("visible")),
        Screen::new("Two").entry(ticking_label("hidden")),
    ]);
    press(&mut dispatcher, Key::Enter);
    let popup = dispatcher.app().popups().front().unwrap();
    let (id, cursor) = (popup.id(), popup.cursor());

    dispatcher.process(Message::Async(AppEvent::Tick));

    let app = dispatcher.app();
    for screen in app.screens() {
        let labels: Vec<&str> = screen
            .entries()
            .iter()
            .filter_map(|e| match e.as_item() {
                Some(Item::Label(label)) => Some(label.text()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["ticked"]);
    }
    assert_eq!(app.popups().len(), 1);
    let popup = app.popups().front().unwrap();
    assert_eq!(popup.id(), id);
    assert_eq!(popup.cursor(), cursor);
    assert!(popup.entries()[cursor].is_focused());
}

#[tokio::test]
async fn messages_from_two_producers_all_processed_in_order() {
    let seen: Rc<RefCell<Vec<(String, i64)>>> = Rc::new(RefCell::new(Vec::new()));
    let record = seen.clone();
    let screen = Screen::new("Recorder").on_receive(move |_, message, _| {
        if let Message::Async(AppEvent::SettingChanged { key, value }) = message {
            record
                .borrow_mut()
                .push((key.clone(), value.as_i64().unwrap_or(-1)));
        }
        None
    });
    let mut dispatcher = Dispatcher::new(App::new(vec![screen]));

    let producers: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|key| {
            let queue = dispatcher.sender();
            tokio::spawn(async move {
                for i in 0..3 {
                    queue.send_event(AppEvent::SettingChanged {
                        key: key.to_string(),
                        value: json!(i),
                    });
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();
    for producer in producers {
        producer.await.unwrap();
    }

    for _ in 0..6 {
        assert!(dispatcher.step().await);
    }
    assert_eq!(dispatcher.drain(), 0);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 6);
    for key in ["a", "b"] {
        let values: Vec<i64> = seen.iter().filter(|(k, _)| k == key).map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 1, 2]);
    }
}

#[test]
fn failed_validation_keeps_popup_and_shows_alert() {
    let screen = Screen::new("Form")
        .entry(Button::new("Edit", Palette::GREEN).on_press(|_| {
            let field = InputField::new("", "name", Palette::INACTIVE)
                .named("name")
                .with_validator(|v| {
                    if v.is_empty() {
                        Err("Name is required".to_string())
                    } else {
                        Ok(())
                    }
                });
            Some(Command::OpenPopup(Popup::ok_cancel(
                "Name",
                "Enter a name",
                [Item::from(field)],
                |_| Some(Command::Quit),
            )))
        }))
        .entry(Button::new("Other", Palette::GREEN));
    let mut dispatcher = activated(vec![screen, Screen::new("Spare")]);

    press(&mut dispatcher, Key::Enter);
    press(&mut dispatcher, Key::Down);
    press(&mut dispatcher, Key::Enter);

    let app = dispatcher.app();
    assert!(!app.should_quit());
    assert_eq!(app.popups().len(), 2);
    assert_eq!(app.popups().front().unwrap().title(), "Error");
    let form = app.popups().iter().nth(1).unwrap();
    assert_eq!(form.title(), "Name");
    assert!(matches!(&form.entries()[0], Item::Input(input) if input.error() == Some("Name is required")));

    press(&mut dispatcher, Key::Enter);
    assert_eq!(dispatcher.app().popups().len(), 1);
    assert_eq!(dispatcher.app().popups().front().unwrap().title(), "Name");
}

#[test]
fn terminator_dismisses_its_own_popup_only() {
    let screen = Screen::new("Confirm")
        .entry(Button::new("Go", Palette::GREEN).on_press(|_| {
            Some(Command::OpenPopup(Popup::yes_no("Sure", "Are you sure?", |_| {
                Some(Command::OpenPopup(Popup::ok("Done", "It worked")))
            })))
        }))
        .entry(Button::new("Other", Palette::GREEN));
    let mut dispatcher = activated(vec![screen, Screen::new("Spare")]);

    press(&mut dispatcher, Key::Enter);
    press(&mut dispatcher, Key::Enter);

    let popups = dispatcher.app().popups();
    assert_eq!(popups.len(), 1);
    assert_eq!(popups.front().unwrap().title(), "Done");
}

#[test]
fn typing_goes_to_the_popup_field() {
    let screen = Screen::new("Edit")
        .entry(Button::new("Edit", Palette::GREEN).on_press(|_| {
            Some(Command::OpenPopup(Popup::ok_cancel(
                "Value",
                "",
                [Item::from(InputField::new("", "", Palette::INACTIVE).named("v"))],
                |_| None,
            )))
        }))
        .entry(Button::new("Other", Palette::GREEN));
    let mut dispatcher = activated(vec![screen, Screen::new("Spare")]);
    press(&mut dispatcher, Key::Enter);

    for c in "42".chars() {
        press(&mut dispatcher, Key::Char(c));
    }
    let popup = dispatcher.app().popups().front().unwrap();
    assert_eq!(popup.form().text("v"), Some("42"));
}

#[test]
fn drop_to_shell_quits_when_activated() {
    let mut dispatcher = Dispatcher::new(common::app(vec![
        common::popup_screen("One"),
        shell::screen(),
    ]));
    press(&mut dispatcher, Key::Down);
    assert_eq!(dispatcher.app().current(), 1);
    press(&mut dispatcher, Key::Enter);
    dispatcher.drain();
    assert!(dispatcher.app().should_quit());
}

#[test]
fn escape_returns_to_tabs_then_quits() {
    let mut dispatcher = activated(vec![common::popup_screen("One"), common::popup_screen("Two")]);
    press(&mut dispatcher, Key::Esc);
    assert!(!dispatcher.app().is_active());
    assert!(common::focused_leaves(&dispatcher.app().screens()[0]).is_empty());
    press(&mut dispatcher, Key::Esc);
    assert!(dispatcher.app().should_quit());
}
