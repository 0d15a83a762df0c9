//! Payment service status and deposit address

use super::{changed, display_value, persist};
use crate::backend::Services;
use crate::messages::{AppEvent, PaymentHealth};
use crate::producers::payment::describe;
use crate::tui::{
    Button, Command, Component, InputField, Item, Label, Message, Orientation, Pane, Palette,
    Popup, Screen,
};
use serde_json::Value;

const SECTION: &str = "moneropay";
const ADDRESS_KEY: &str = "deposit_address";
const ADDRESS_FIELD: &str = "address";

const BASE58: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Mainnet standard, subaddress or integrated address
pub fn validate_address(address: &str) -> Result<(), String> {
    let address = address.trim();
    let valid_length = matches!(address.len(), 95 | 106);
    let valid_prefix = matches!(address.chars().next(), Some('4') | Some('8'));
    let valid_chars = address.chars().all(|c| BASE58.contains(c));
    if valid_length && valid_prefix && valid_chars {
        Ok(())
    } else {
        Err("Not a valid Monero address".to_string())
    }
}

pub fn status_text(health: &PaymentHealth) -> String {
    if health.status == 0 {
        return "dead".to_string();
    }
    let state = |up: bool| if up { "ready" } else { "dead" };
    format!(
        "Wallet {}, SQLite {} ({})",
        state(health.walletrpc),
        state(health.sqlite),
        describe(health)
    )
}

fn status_color(health: &PaymentHealth) -> ratatui::style::Color {
    match health.status {
        200 => Palette::SUCCESS,
        503 => Palette::WARNING,
        _ => Palette::ERROR,
    }
}

fn status_label(enabled: bool) -> Label {
    let initial = if enabled {
        "status pending..."
    } else {
        "MoneroPay disabled"
    };
    Label::new(initial, Palette::LIGHT_AQUA)
        .bold()
        .on_receive(|label, message, _| {
            match message {
                Message::Async(AppEvent::Payment(Ok(health))) => {
                    label.set_text(status_text(health));
                    label.set_color(status_color(health));
                }
                Message::Async(AppEvent::Payment(Err(_))) => {
                    label.set_text("dead");
                    label.set_color(Palette::ERROR);
                }
                _ => {}
            }
            None
        })
}

fn address_label(services: &Services) -> Label {
    let dotted = format!("{}.{}", SECTION, ADDRESS_KEY);
    let address = services
        .settings
        .get_str(&[SECTION, ADDRESS_KEY])
        .unwrap_or_default();
    Label::new(address, Palette::INACTIVE).on_receive(move |label, message, _| {
        if let Some(value) = changed(message, &dotted) {
            label.set_text(display_value(value));
        }
        None
    })
}

/// Save the address and the matching enabled flag
fn set_address(services: &Services, address: String) -> Command {
    let enabled = !address.is_empty();
    Command::Batch(vec![
        persist(services, &[SECTION], ADDRESS_KEY, Value::String(address)),
        persist(services, &[SECTION], "enabled", Value::Bool(enabled)),
    ])
}

fn update_button(services: &Services) -> Button {
    let services = services.clone();
    Button::new("Update Address", Palette::YELLOW).on_press(move |_| {
        let current = services
            .settings
            .get_str(&[SECTION, ADDRESS_KEY])
            .unwrap_or_default();
        let field = InputField::new(current, "address", Palette::ACTIVE)
            .named(ADDRESS_FIELD)
            .with_validator(validate_address);
        let services = services.clone();
        Some(Command::OpenPopup(Popup::ok_cancel(
            "Deposit Address",
            "Enter the address payments are swept to.",
            [Item::from(field)],
            move |ctx| {
                let address = ctx.form.text(ADDRESS_FIELD)?.trim().to_string();
                Some(set_address(&services, address))
            },
        )))
    })
}

fn clear_button(services: &Services) -> Button {
    let services = services.clone();
    Button::new("Clear Address (disable MoneroPay)", Palette::YELLOW).on_press(move |_| {
        let services = services.clone();
        Some(Command::OpenPopup(
            Popup::yes_no("Clear Address", "Are you sure?", move |_| {
                Some(set_address(&services, String::new()))
            })
            .color(Palette::LIGHT_RED),
        ))
    })
}

pub fn screen(services: &Services, enabled: bool) -> Screen {
    Screen::new("MoneroPay")
        .orientation(Orientation::Vertical)
        .placement(0.5, 0.8)
        .entry(
            Pane::new("MoneroPay", Palette::YELLOW)
                .item(status_label(enabled))
                .item(Label::rule(40, Palette::DISABLED))
                .item(address_label(services))
                .item(update_button(services))
                .item(clear_button(services)),
        )
}
