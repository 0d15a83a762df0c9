//! Leaves the console for a login shell

use crate::messages::AppEvent;
use crate::tui::{Command, Message, Screen};

pub const LABEL: &str = "<Drop to Shell>";

/// Quits as soon as it is activated
pub fn screen() -> Screen {
    Screen::new(LABEL).on_receive(|_, message, _| match message {
        Message::Async(AppEvent::ScreenActivated { label, active: true }) if label == LABEL => {
            Some(Command::Quit)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::{Component, Context, Form};

    #[test]
    fn test_quits_on_activation_only() {
        let mut screen = screen();
        let form = Form::default();
        let ctx = Context::new(80, 24, true, &form);
        let activated = |label: &str, active| {
            Message::Async(AppEvent::ScreenActivated {
                label: label.to_string(),
                active,
            })
        };
        assert!(matches!(
            screen.receive(&activated(LABEL, true), &ctx),
            Some(Command::Quit)
        ));
        assert!(screen.receive(&activated(LABEL, false), &ctx).is_none());
        assert!(screen.receive(&activated("Node", true), &ctx).is_none());
    }
}
