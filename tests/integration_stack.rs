use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use term_frontend::component_context::ComponentContext;
use term_frontend::keybindings::{InputAction, InputEvent, KeyBindings};
use term_frontend::screen::{Screen, ScreenId, ScreenStack, StackRequests};
use term_frontend::ui::UiFrame;
use term_frontend::window::Window;

type Log = Rc<RefCell<Vec<String>>>;

struct Tracked {
    name: String,
    log: Log,
    modal: bool,
}

impl Tracked {
    fn new(name: impl Into<String>, log: &Log) -> Self {
        Self {
            name: name.into(),
            log: Rc::clone(log),
            modal: false,
        }
    }

    fn modal(name: impl Into<String>, log: &Log) -> Self {
        let mut screen = Self::new(name, log);
        screen.modal = true;
        screen
    }

    fn note(&self, what: String) {
        self.log.borrow_mut().push(what);
    }
}

impl Screen for Tracked {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {
        self.note(format!("render {}", self.name));
    }

    fn handle_input(
        &mut self,
        _bindings: &KeyBindings,
        event: &InputEvent,
        requests: &mut StackRequests,
    ) -> bool {
        if event.is(InputAction::B) {
            self.note(format!("close {}", self.name));
            requests.close_self();
        }
        true
    }

    fn set_top_window(&mut self, top: bool) {
        self.note(format!("top {} {top}", self.name));
    }

    fn is_modal(&self) -> bool {
        self.modal
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.note(format!("drop {}", self.name));
    }
}

fn draw(window: &mut Window) -> Buffer {
    let area = Rect::new(0, 0, 80, 24);
    let mut buffer = Buffer::empty(area);
    {
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        window.render(&mut frame);
    }
    buffer
}

#[test]
fn modal_over_screen_renders_both_and_pop_renotifies_once() {
    let log = Log::default();
    let mut window = Window::default();
    let a = window.push_screen(Tracked::new("A", &log));
    let b = window.push_screen(Tracked::modal("B", &log));
    assert_eq!(window.peek(), Some(b));

    log.borrow_mut().clear();
    let buffer = draw(&mut window);
    assert_eq!(*log.borrow(), vec!["render A", "render B"]);
    // The wash dims the cells between the two screens.
    let cell = buffer.cell((40, 12)).map(|c| c.modifier);
    assert!(cell.is_some_and(|m| m.contains(ratatui::style::Modifier::DIM)));

    log.borrow_mut().clear();
    drop(window.remove_screen(b));
    assert_eq!(window.peek(), Some(a));
    assert_eq!(*log.borrow(), vec!["top A true", "drop B"]);
}

#[test]
fn dialog_over_dialog_keeps_middle_visible_once() {
    let log = Log::default();
    let mut window = Window::default();
    window.push_screen(Tracked::new("base", &log));
    window.push_screen(Tracked::new("list", &log));
    window.push_screen(Tracked::modal("confirm", &log));
    log.borrow_mut().clear();
    draw(&mut window);
    assert_eq!(
        *log.borrow(),
        vec!["render base", "render list", "render confirm"]
    );

    // With only two entries the middle is the bottom and is drawn once.
    let log = Log::default();
    let mut window = Window::default();
    window.push_screen(Tracked::new("base", &log));
    window.push_screen(Tracked::modal("confirm", &log));
    log.borrow_mut().clear();
    draw(&mut window);
    assert_eq!(*log.borrow(), vec!["render base", "render confirm"]);
}

#[test]
fn screen_can_close_itself_from_input() {
    let log = Log::default();
    let mut window = Window::default();
    let a = window.push_screen(Tracked::new("A", &log));
    window.push_screen(Tracked::modal("B", &log));
    log.borrow_mut().clear();

    window.dispatch(&InputEvent::press(window.bindings(), InputAction::B));
    assert_eq!(window.peek(), Some(a));
    assert_eq!(*log.borrow(), vec!["close B", "top A true", "drop B"]);
}

#[test]
fn dropping_the_window_destroys_screens_top_first() {
    let log = Log::default();
    let mut window = Window::default();
    window.push_screen(Tracked::new("a", &log));
    window.push_screen(Tracked::new("b", &log));
    window.push_screen(Tracked::new("c", &log));
    log.borrow_mut().clear();
    drop(window);
    assert_eq!(*log.borrow(), vec!["drop c", "drop b", "drop a"]);
}

#[test]
fn empty_stack_renders_overlays_only() {
    let mut window = Window::default();
    window.display_notification("still here", 1000);
    window.update(16);
    let buffer = draw(&mut window);
    let text: String = (0..24)
        .map(|y| term_frontend::ui::row_text(&buffer, y))
        .collect();
    assert!(text.contains("still here"));
}

#[derive(Debug, Clone)]
enum Op {
    Push,
    Pop(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Push), (0usize..16).prop_map(Op::Pop)]
}

proptest! {
    #[test]
    fn top_is_latest_surviving_push(ops in proptest::collection::vec(op(), 0..40)) {
        let log = Log::default();
        let mut stack = ScreenStack::new();
        let mut model: Vec<ScreenId> = Vec::new();
        let mut everything: Vec<ScreenId> = Vec::new();
        for (n, op) in ops.into_iter().enumerate() {
            match op {
                Op::Push => {
                    let id = stack.push(Box::new(Tracked::new(format!("s{n}"), &log)));
                    model.push(id);
                    everything.push(id);
                }
                Op::Pop(pick) => {
                    if everything.is_empty() {
                        continue;
                    }
                    let id = everything[pick % everything.len()];
                    let was_present = model.contains(&id);
                    let removed = stack.pop(id);
                    prop_assert_eq!(removed.is_some(), was_present);
                    model.retain(|m| *m != id);
                }
            }
            prop_assert_eq!(stack.top(), model.last().copied());
            prop_assert_eq!(stack.ids(), model.clone());
        }
    }
}
