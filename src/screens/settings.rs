//! Daemon limits, RPC credentials and banlists

use super::{changed, control_task, display_value, persist, setting_toggle};
use crate::backend::Services;
use crate::messages::AppEvent;
use crate::tui::{
    Button, Command, InputField, Item, Label, Message, Orientation, Pane, Palette, Popup, Screen,
};
use serde_json::Value;

/// Form field carrying the edited value
const VALUE_FIELD: &str = "value";

pub fn validate_count(value: &str) -> Result<(), String> {
    value
        .trim()
        .parse::<u32>()
        .map(|_| ())
        .map_err(|_| format!("'{}' is not a whole number", value.trim()))
}

pub fn validate_text(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("Value cannot be empty".to_string())
    } else if value.chars().any(|c| c.is_whitespace()) {
        Err("Value cannot contain spaces".to_string())
    } else {
        Ok(())
    }
}

/// Payment settings are read by their own service
fn restarts_daemon(key: &str) -> bool {
    !key.starts_with("moneropay.")
}

fn caption(label: &str, value: &str) -> String {
    format!("{}: {}", label, value)
}

/// Button that edits a numeric setting through a popup
fn count_button(services: &Services, label: &'static str, key: &'static str) -> Button {
    let current = services
        .settings
        .get_i64(&[key])
        .map(|n| n.to_string())
        .unwrap_or_default();
    let services = services.clone();

    Button::new(caption(label, &current), Palette::GREEN)
        .on_press(move |_| {
            let current = services
                .settings
                .get_i64(&[key])
                .map(|n| n.to_string())
                .unwrap_or_default();
            let field = InputField::new(current.clone(), current, Palette::INACTIVE)
                .named(VALUE_FIELD)
                .with_validator(validate_count);
            let services = services.clone();
            Some(Command::OpenPopup(Popup::ok_cancel(
                label,
                "Set new value",
                [Item::from(field)],
                move |ctx| {
                    let count: i64 = ctx.form.text(VALUE_FIELD)?.trim().parse().ok()?;
                    Some(persist(&services, &[], key, Value::from(count)))
                },
            )))
        })
        .on_receive(move |button, message, _| {
            if let Some(value) = changed(message, key) {
                button.set_label(caption(label, &display_value(value)));
            }
            None
        })
}

/// Button that edits a string setting; secret values are never displayed
fn text_button(
    services: &Services,
    label: &'static str,
    key: &'static str,
    secret: bool,
) -> Button {
    let initial = if secret {
        label.to_string()
    } else {
        caption(label, &services.settings.get_str(&[key]).unwrap_or_default())
    };
    let services = services.clone();

    Button::new(initial, Palette::GREEN)
        .on_press(move |_| {
            let current = if secret {
                String::new()
            } else {
                services.settings.get_str(&[key]).unwrap_or_default()
            };
            let mut field = InputField::new(current.clone(), current, Palette::INACTIVE)
                .named(VALUE_FIELD)
                .with_validator(validate_text);
            if secret {
                field = field.masked();
            }
            let services = services.clone();
            Some(Command::OpenPopup(Popup::ok_cancel(
                label,
                "Set new value",
                [Item::from(field)],
                move |ctx| {
                    let value = ctx.form.text(VALUE_FIELD)?.to_string();
                    Some(persist(&services, &[], key, Value::String(value)))
                },
            )))
        })
        .on_receive(move |button, message, _| {
            if secret {
                return None;
            }
            if let Some(value) = changed(message, key) {
                button.set_label(caption(label, &display_value(value)));
            }
            None
        })
}

fn banlist_button(services: &Services) -> Button {
    let services = services.clone();
    Button::new("Banlist Settings", Palette::YELLOW).on_press(move |_| {
        Some(Command::OpenPopup(
            Popup::new("Banlist Settings", "")
                .color(Palette::YELLOW)
                .item(setting_toggle(&services, "Boog900", &["banlists"], "boog900"))
                .item(setting_toggle(&services, "DNS", &["banlists"], "dns"))
                .item(setting_toggle(&services, "gui.xmr.pm", &["banlists"], "gui-xmr-pm"))
                .item(Button::new("OK", Palette::GREEN)),
        ))
    })
}

pub fn screen(services: &Services) -> Screen {
    let restart = services.clone();

    Screen::new("Settings")
        .orientation(Orientation::Horizontal)
        .placement(0.5, 0.8)
        .entry(
            Pane::new("Data", Palette::LIGHT_AQUA)
                .item(count_button(services, "Incoming Peers", "in_peers"))
                .item(count_button(services, "Outgoing Peers", "out_peers"))
                .item(count_button(services, "Upload Speed (kB/s)", "limit_rate_up"))
                .item(count_button(services, "Download Speed (kB/s)", "limit_rate_down")),
        )
        .entry(
            Pane::new("Privacy", Palette::LIGHT_PURPLE)
                .item(setting_toggle(services, "RPC Authentication", &[], "rpc_enabled"))
                .item(text_button(services, "RPC Username", "rpcu", false))
                .item(text_button(services, "RPC Password", "rpcp", true))
                .item(Label::rule(20, Palette::DISABLED))
                .item(banlist_button(services)),
        )
        .on_receive(move |_, message, _| match message {
            Message::Async(AppEvent::SettingsSaved(Ok(key)))
                if restarts_daemon(key) && !restart.restart_on_save.is_empty() =>
            {
                let control = restart.control.clone();
                let service = restart.restart_on_save.clone();
                Some(control_task(async move { control.restart_service(&service).await }))
            }
            _ => None,
        })
}
