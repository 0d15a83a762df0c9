//! Power and recovery actions

use super::control_task;
use crate::backend::Services;
use crate::tui::{Button, Command, Item, Orientation, Pane, Palette, Popup, Screen, Toggle};

const RECOVER_FS: &str = "recover_fs";
const RESYNC: &str = "resync";

/// Button opening a Yes/No confirmation before `action` runs
fn confirm(
    services: &Services,
    label: &str,
    title: &'static str,
    action: fn(&Services) -> Command,
) -> Button {
    let services = services.clone();
    Button::new(label, Palette::AQUA).on_press(move |_| {
        let services = services.clone();
        Some(Command::OpenPopup(Popup::yes_no(
            title,
            "Are you sure?",
            move |_| Some(action(&services)),
        )))
    })
}

fn reboot(services: &Services) -> Command {
    let control = services.control.clone();
    control_task(async move { control.reboot().await })
}

fn shutdown(services: &Services) -> Command {
    let control = services.control.clone();
    control_task(async move { control.shutdown().await })
}

fn recovery_button(services: &Services) -> Button {
    let services = services.clone();
    Button::new("Start Recovery", Palette::AQUA).on_press(move |_| {
        let control = services.control.clone();
        let fields = [
            Item::from(Toggle::new("Recover Filesystem", Palette::GREEN).named(RECOVER_FS)),
            Item::from(Toggle::new("Purge & Resync Blockchain", Palette::GREEN).named(RESYNC)),
        ];
        Some(Command::OpenPopup(Popup::ok_cancel(
            "Recovery",
            "Select your recovery options, then press OK.",
            fields,
            move |ctx| {
                let filesystem = ctx.form.flag(RECOVER_FS).unwrap_or(false);
                let resync = ctx.form.flag(RESYNC).unwrap_or(false);
                let control = control.clone();
                Some(control_task(async move {
                    control.start_recovery(filesystem, resync).await
                }))
            },
        )))
    })
}

pub fn screen(services: &Services) -> Screen {
    Screen::new("System")
        .orientation(Orientation::Vertical)
        .placement(0.5, 0.8)
        .entry(
            Pane::new("Power", Palette::AQUA)
                .item(confirm(services, "Reboot", "Restart", reboot))
                .item(confirm(services, "Shutdown", "Shutdown", shutdown))
                .item(recovery_button(services)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing;
    use crate::tui::{Component, Context, FieldValue, Form};
    use serde_json::json;

    fn press(screen: &mut Screen, index: usize) -> Popup {
        let form = Form::default();
        let ctx = Context::new(80, 24, true, &form);
        let pane = match screen.entry_mut(0) {
            Some(crate::tui::Entry::Pane(pane)) => pane,
            _ => panic!("expected a pane"),
        };
        match pane.entry_mut(index).unwrap().interact(&ctx) {
            Some(Command::OpenPopup(popup)) => popup,
            other => panic!("expected a popup, got {:?}", other),
        }
    }

    #[test]
    fn test_reboot_confirms_first() {
        let (_dir, services) = testing::services(json!({ "config": {} }));
        let mut screen = screen(&services);
        let mut popup = press(&mut screen, 0);
        assert_eq!(popup.title(), "Restart");
        assert_eq!(popup.body(), "Are you sure?");

        let form = Form::default();
        let ctx = Context::new(80, 24, true, &form);
        let yes = popup.entry_mut(0).unwrap().interact(&ctx);
        assert!(matches!(yes, Some(Command::Task(_))));
        let no = popup.entry_mut(1).unwrap().interact(&ctx);
        assert!(no.is_none());
    }

    #[test]
    fn test_recovery_reads_toggles() {
        let (_dir, services) = testing::services(json!({ "config": {} }));
        let mut screen = screen(&services);
        let mut popup = press(&mut screen, 2);
        assert_eq!(popup.title(), "Recovery");
        assert_eq!(popup.entries().len(), 4);

        let mut form = Form::default();
        form.insert(RECOVER_FS, FieldValue::Flag(true));
        let ctx = Context::new(80, 24, true, &form);
        let ok = popup.entry_mut(2).unwrap().interact(&ctx);
        assert!(matches!(ok, Some(Command::Task(_))));
    }
}
