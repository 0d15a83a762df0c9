//! Focus traversal and dispatch throughput
//!
//! Targets:
//! - Full walk of a 10x10 screen: <100us
//! - Broadcast of one async message to the shipped-size tree: <50us

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sshui_core::messages::AppEvent;
use sshui_core::tui::focus::reset;
use sshui_core::tui::{update_focus, App, Button, Item, Label, Message, Palette, Pane, Screen, Step};

fn grid(panes: usize, items: usize) -> Screen {
    let mut screen = Screen::new("Bench");
    for p in 0..panes {
        let entries = (0..items).map(|i| {
            Item::from(Button::new(format!("{}.{}", p, i), Palette::GREEN).enabled(i % 3 != 0))
        });
        screen = screen.entry(Pane::new(format!("Pane {}", p), Palette::BLUE).items(entries));
    }
    screen
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_focus_walk");
    for size in [2usize, 5, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut screen = grid(size, size);
            b.iter(|| {
                reset(&mut screen, true);
                while update_focus(&mut screen, Step::Next) == Step::Stay {}
                while update_focus(&mut screen, Step::Prev) == Step::Stay {}
                black_box(&screen);
            });
        });
    }
    group.finish();
}

fn bench_broadcast(c: &mut Criterion) {
    let screens: Vec<Screen> = (0..6)
        .map(|s| {
            grid(3, 5).entry(
                Label::new(format!("status {}", s), Palette::YELLOW).on_receive(|label, message, _| {
                    if let Message::Async(AppEvent::Tick) = message {
                        label.set_text("tick");
                    }
                    None
                }),
            )
        })
        .collect();
    let mut app = App::new(screens);

    c.bench_function("broadcast_tick", |b| {
        b.iter(|| black_box(app.dispatch(Message::Async(AppEvent::Tick))));
    });
}

criterion_group!(benches, bench_walk, bench_broadcast);
criterion_main!(benches);
