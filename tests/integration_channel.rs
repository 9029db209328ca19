use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use ratatui::layout::Rect;
use term_frontend::channel::{AsyncNotification, UiChannel};
use term_frontend::component_context::ComponentContext;
use term_frontend::components::ProgressNotification;
use term_frontend::config::{self, Settings};
use term_frontend::screen::{Screen, StackRequests};
use term_frontend::theme::Theme;
use term_frontend::ui::UiFrame;
use term_frontend::window::Window;

fn popup_text(window: &Window) -> Option<String> {
    window.info_popup().map(|p| p.text().to_string())
}

#[test]
fn messages_surface_newest_first_one_per_tick() {
    let mut window = Window::default();
    let handle = window.handle();
    handle.display_notification("M1", 5000);
    handle.display_notification("M2", 5000);

    window.update(16);
    assert_eq!(popup_text(&window).as_deref(), Some("M2"));
    window.update(16);
    assert_eq!(popup_text(&window).as_deref(), Some("M1"));
    window.update(16);
    assert_eq!(popup_text(&window).as_deref(), Some("M1"));
}

#[test]
fn non_positive_duration_uses_configured_default() {
    let mut window = Window::default();
    window.display_notification("default", 0);
    window.update(0);
    assert_eq!(window.info_popup().map(|p| p.remaining_ms()), Some(10_000));

    let mut settings = Settings::default();
    settings.set_int(config::DISPLAY_TITLES_TIME, 500);
    let mut window = Window::new(settings);
    window.display_notification("clamped", -3);
    window.update(0);
    assert_eq!(window.info_popup().map(|p| p.remaining_ms()), Some(120_000));
}

#[test]
fn work_posted_during_a_drain_waits_for_the_next_tick() {
    let mut window = Window::default();
    let runs = Arc::new(AtomicUsize::new(0));
    let outer = Arc::clone(&runs);
    window.post_to_ui_thread(move |window| {
        outer.fetch_add(1, Ordering::SeqCst);
        let inner = Arc::clone(&outer);
        window.post_to_ui_thread(move |_| {
            inner.fetch_add(10, Ordering::SeqCst);
        });
    });

    window.update(16);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    window.update(16);
    assert_eq!(runs.load(Ordering::SeqCst), 11);
}

struct Counter(Arc<AtomicUsize>);

impl Screen for Counter {
    fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}

    fn update(&mut self, _delta_ms: u32, _requests: &mut StackRequests) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn posted_functions_run_in_order_before_the_stack_updates() {
    let mut window = Window::default();
    let order = Arc::new(Mutex::new(Vec::new()));
    for n in 0..3 {
        let order = Arc::clone(&order);
        window.post_to_ui_thread(move |_| order.lock().unwrap().push(n));
    }
    let updates = Arc::new(AtomicUsize::new(0));
    let counter = Counter(Arc::clone(&updates));
    window.post_to_ui_thread(move |window| {
        window.push_screen(counter);
    });

    window.update(16);
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    // The screen pushed by the posted function is updated in the same tick.
    assert_eq!(updates.load(Ordering::SeqCst), 1);
}

#[test]
fn producers_on_many_threads_are_all_delivered() {
    let channel: UiChannel<Vec<usize>> = UiChannel::new();
    let workers: Vec<_> = (0..4)
        .map(|t| {
            let handle = channel.handle();
            thread::spawn(move || {
                for i in 0..25 {
                    handle.post_to_ui_thread(move |seen: &mut Vec<usize>| seen.push(t * 100 + i));
                    handle.display_notification(format!("{t}-{i}"), 1000);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let mut seen = Vec::new();
    for func in channel.take_deferred() {
        func(&mut seen);
    }
    assert_eq!(seen.len(), 100);
    assert_eq!(channel.pending_messages(), 100);
    // Each producer's own posts keep their order.
    for t in 0..4 {
        let mine: Vec<_> = seen.iter().filter(|v| **v / 100 == t).collect();
        assert!(mine.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn registering_twice_keeps_one_entry() {
    let window = Window::default();
    let progress: Arc<dyn AsyncNotification> = Arc::new(ProgressNotification::new("sync"));
    assert!(window.register_notification(Arc::clone(&progress)));
    assert!(!window.register_notification(Arc::clone(&progress)));

    let other: Arc<dyn AsyncNotification> = Arc::new(ProgressNotification::new("other"));
    assert!(!window.unregister_notification(&other));
    assert!(window.unregister_notification(&progress));
    assert!(!window.unregister_notification(&progress));
}

struct Marker(&'static str);

impl AsyncNotification for Marker {
    fn size(&self) -> (u16, u16) {
        (6, 1)
    }

    fn render(&self, frame: &mut UiFrame<'_>, area: Rect, _theme: &Theme) {
        frame.set_string(area.x, area.y, self.0, Default::default());
    }
}

#[test]
fn registered_widgets_stack_down_the_right_edge() {
    let mut window = Window::default();
    window.register_notification(Arc::new(Marker("first")));
    window.register_notification(Arc::new(Marker("second")));

    let area = Rect::new(0, 0, 30, 8);
    let mut buffer = ratatui::buffer::Buffer::empty(area);
    {
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        window.render(&mut frame);
    }
    let row = |y| term_frontend::ui::row_text(&buffer, y);
    assert_eq!(&row(1)[23..29], "first ");
    assert_eq!(&row(3)[23..29], "second");
}
