//! Frame drawing for the application state

use super::component::Component;
use super::dispatcher::App;
use super::popup::Popup;
use super::screen::{Entry, Orientation, Screen};
use super::theme::Palette;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Width of the tab column
pub const TAB_AREA_WIDTH: u16 = 12;

/// Draw the whole UI
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }
    let Some(screen) = app.current_screen() else {
        return;
    };
    if area.width < TAB_AREA_WIDTH * 2 || (area.height as usize) < app.screens().len() {
        frame.render_widget(Paragraph::new("..."), area);
        return;
    }

    let (tab_color, content_color) = if app.is_active() {
        (Palette::INACTIVE, Palette::ACTIVE)
    } else {
        (Palette::ACTIVE, Palette::INACTIVE)
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(TAB_AREA_WIDTH), Constraint::Min(1)])
        .split(area);

    draw_tabs(frame, app, chunks[0], tab_color);

    let content = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(content_color));
    let inner = content.inner(chunks[1]);
    frame.render_widget(content, chunks[1]);
    draw_entries(frame, screen, inner, content_color);

    if let Some(popup) = app.popups().front() {
        draw_popup(frame, popup, area);
    }

    frame.render_widget(app.notifications(), area);
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect, color: Color) {
    let lines: Vec<Line> = app
        .screens()
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            if i == app.current() {
                Line::styled(
                    screen.label().to_string(),
                    Style::default().fg(Palette::TAB_HIGHLIGHT_FG).bg(color),
                )
            } else {
                Line::styled(screen.label().to_string(), Style::default().fg(color))
            }
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::RIGHT)),
        area,
    );
}

/// Outer size of an entry box
/// Terminal cells for a character count
fn cells(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}

fn entry_size(entry: &Entry, text: &Text, item_width: u16) -> (u16, u16) {
    let title = entry
        .as_pane()
        .map(|p| cells(p.title().chars().count()).saturating_add(2))
        .unwrap_or(0);
    let width = if item_width > 0 {
        item_width
    } else {
        cells(text.width()).max(title)
    };
    (width.saturating_add(2), cells(text.height()).saturating_add(2))
}

fn draw_entries(frame: &mut Frame, screen: &Screen, area: Rect, color: Color) {
    let (orientation, placement, item_width) = screen.layout();
    let boxes: Vec<(&Entry, Text<'static>, (u16, u16))> = screen
        .entries()
        .iter()
        .map(|entry| {
            let text = entry.render();
            let size = entry_size(entry, &text, item_width);
            (entry, text, size)
        })
        .collect();

    let (total_w, total_h) = match orientation {
        Orientation::Vertical => (
            boxes.iter().map(|b| b.2 .0).max().unwrap_or(0),
            boxes.iter().fold(0u16, |acc, b| acc.saturating_add(b.2 .1)),
        ),
        Orientation::Horizontal => (
            boxes.iter().fold(0u16, |acc, b| acc.saturating_add(b.2 .0)),
            boxes.iter().map(|b| b.2 .1).max().unwrap_or(0),
        ),
    };
    let offset_x = (area.width.saturating_sub(total_w) as f32 * placement.horizontal) as u16;
    let offset_y = (area.height.saturating_sub(total_h) as f32 * placement.vertical) as u16;

    let mut x = area.x + offset_x;
    let mut y = area.y + offset_y;
    for (entry, text, (w, h)) in boxes {
        let rect = Rect::new(x, y, w, h).intersection(area);
        if rect.width > 2 && rect.height > 2 {
            let border = if entry.is_focused() {
                entry.color()
            } else {
                Palette::INACTIVE
            };
            let mut block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border));
            if let Some(pane) = entry.as_pane() {
                block = block.title(pane.title().to_string());
            }
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(color)).block(block),
                rect,
            );
        }
        match orientation {
            Orientation::Vertical => y = y.saturating_add(h),
            Orientation::Horizontal => x = x.saturating_add(w),
        }
    }
}

/// Popup width: its natural width, at least 20 columns and 60% of the screen
pub fn popup_width(popup: &Popup, screen_width: u16) -> u16 {
    let floor = ((screen_width as f32 * 0.6) as u16).max(20);
    popup.width().max(floor).saturating_add(4).min(screen_width)
}

fn draw_popup(frame: &mut Frame, popup: &Popup, area: Rect) {
    let text = popup.render();
    let width = popup_width(popup, area.width);
    let height = cells(text.height()).saturating_add(2).min(area.height);
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(popup.title().to_string())
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(popup.color()))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(Paragraph::new(text).block(block), rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::item::{Button, Label};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_small_terminal_renders_ellipsis() {
        let app = App::new(vec![Screen::new("A"), Screen::new("B")]);
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
        assert!(buffer_text(&terminal).starts_with("..."));
    }

    #[test]
    fn test_tabs_and_entries_are_drawn() {
        let app = App::new(vec![
            Screen::new("Dashboard").entry(Label::new("Height: 42", Palette::PURPLE)),
            Screen::new("Node").entry(Button::new("Go", Palette::GREEN)),
        ]);
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Dashboard"));
        assert!(text.contains("Height: 42"));
    }

    #[test]
    fn test_oversized_label_saturates() {
        let huge = "x".repeat(usize::from(u16::MAX) + 10);
        let entry = Entry::from(Label::new(huge, Palette::INACTIVE));
        let text = entry.render();
        assert_eq!(entry_size(&entry, &text, 0), (u16::MAX, 3));

        let app = App::new(vec![
            Screen::new("Wide")
                .entry(entry)
                .entry(Label::new("tail", Palette::INACTIVE)),
            Screen::new("Other"),
        ]);
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
    }

    #[test]
    fn test_popup_width_floor() {
        let popup = Popup::ok("Hi", "");
        assert_eq!(popup_width(&popup, 100), 64);
        assert_eq!(popup_width(&popup, 30), 24);
    }
}
