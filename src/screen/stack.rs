use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::{Screen, ScreenId, StackRequest, StackRequests};
use crate::component_context::ComponentContext;
use crate::constants::SLIDE_TRANSITION_MS;
use crate::keybindings::{InputEvent, KeyBindings};
use crate::ui::UiFrame;

struct Slot {
    id: ScreenId,
    screen: Box<dyn Screen>,
}

/// A horizontal slide from the previous top to the newly pushed screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub outgoing: ScreenId,
    pub elapsed_ms: u32,
    pub duration_ms: u32,
}

impl Transition {
    fn offset(&self, width: u16) -> i32 {
        let duration = self.duration_ms.max(1) as u64;
        let elapsed = (self.elapsed_ms as u64).min(duration);
        (width as u64 * elapsed / duration) as i32
    }

    fn finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// Ordered screens with stack discipline. The last slot is the top: the
/// only screen receiving input and the one whose help prompts are shown.
#[derive(Default)]
pub struct ScreenStack {
    slots: Vec<Slot>,
    next_id: u64,
    transition: Option<Transition>,
    help_dirty: bool,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn top(&self) -> Option<ScreenId> {
        self.slots.last().map(|slot| slot.id)
    }

    pub fn bottom(&self) -> Option<ScreenId> {
        self.slots.first().map(|slot| slot.id)
    }

    /// Ids from bottom to top.
    pub fn ids(&self) -> Vec<ScreenId> {
        self.slots.iter().map(|slot| slot.id).collect()
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.slots.iter().any(|slot| slot.id == id)
    }

    pub fn get(&self, id: ScreenId) -> Option<&dyn Screen> {
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| slot.screen.as_ref())
    }

    pub fn get_mut(&mut self, id: ScreenId) -> Option<&mut (dyn Screen + 'static)> {
        self.slots
            .iter_mut()
            .find(|slot| slot.id == id)
            .map(|slot| slot.screen.as_mut())
    }

    pub fn top_screen(&self) -> Option<&dyn Screen> {
        self.slots.last().map(|slot| slot.screen.as_ref())
    }

    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    /// Push `screen` on top. The previous top is told it is no longer
    /// topmost and any running transition is dropped.
    pub fn push(&mut self, screen: Box<dyn Screen>) -> ScreenId {
        self.transition = None;
        if let Some(top) = self.slots.last_mut() {
            top.screen.set_top_window(false);
        }
        let id = ScreenId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        tracing::debug!(screen = screen.name(), %id, depth = self.slots.len() + 1, "push screen");
        self.slots.push(Slot { id, screen });
        self.help_dirty = true;
        id
    }

    /// Like [`push`](Self::push) but slides the new screen in over the old top.
    pub fn push_sliding(&mut self, screen: Box<dyn Screen>) -> ScreenId {
        let outgoing = self.top();
        let id = self.push(screen);
        self.transition = outgoing.map(|outgoing| Transition {
            outgoing,
            elapsed_ms: 0,
            duration_ms: SLIDE_TRANSITION_MS,
        });
        id
    }

    /// Remove `id` wherever it sits. When it was the top, the new top is
    /// told it is topmost again. Absent ids are ignored.
    pub fn pop(&mut self, id: ScreenId) -> Option<Box<dyn Screen>> {
        let idx = self.slots.iter().position(|slot| slot.id == id)?;
        let was_top = idx + 1 == self.slots.len();
        let slot = self.slots.remove(idx);
        tracing::debug!(screen = slot.screen.name(), %id, depth = self.slots.len(), "pop screen");
        if self.transition.is_some_and(|t| t.outgoing == id) || was_top {
            self.transition = None;
        }
        if was_top {
            if let Some(top) = self.slots.last_mut() {
                top.screen.set_top_window(true);
            }
            // An emptied stack still needs its help bar cleared.
            self.help_dirty = true;
        }
        Some(slot.screen)
    }

    /// Returns true once after the top changed or a screen asked for its
    /// help prompts to be rebuilt.
    pub fn take_help_refresh(&mut self) -> bool {
        std::mem::take(&mut self.help_dirty)
    }

    pub fn mark_help_dirty(&mut self) {
        self.help_dirty = true;
    }

    pub fn is_processing(&self) -> bool {
        self.slots.iter().any(|slot| slot.screen.is_processing())
    }

    /// Visit every screen from bottom to top.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut dyn Screen)) {
        for slot in &mut self.slots {
            f(slot.screen.as_mut());
        }
    }

    /// Deliver `event` to the top screen and then apply whatever it asked
    /// for. Returns whether the screen consumed the event.
    pub fn dispatch_input(&mut self, bindings: &KeyBindings, event: &InputEvent) -> bool {
        let Some(top) = self.slots.last_mut() else {
            return false;
        };
        let mut requests = StackRequests::new(top.id);
        let consumed = top.screen.handle_input(bindings, event, &mut requests);
        self.apply(requests);
        consumed
    }

    pub fn text_input(&mut self, text: &str) {
        if let Some(top) = self.slots.last_mut() {
            top.screen.text_input(text);
        }
    }

    /// Advance the running transition and update the top screen. Requests
    /// from a sliding-out screen are applied after the top's.
    pub fn update(&mut self, delta_ms: u32) {
        let mut outgoing_requests = None;
        if let Some(mut transition) = self.transition.take() {
            transition.elapsed_ms = transition.elapsed_ms.saturating_add(delta_ms);
            if let Some(outgoing) = self.get_mut(transition.outgoing) {
                let mut requests = StackRequests::new(transition.outgoing);
                outgoing.update(delta_ms, &mut requests);
                outgoing_requests = Some(requests);
            }
            if !transition.finished() {
                self.transition = Some(transition);
            }
        }
        if let Some(top) = self.slots.last_mut() {
            let mut requests = StackRequests::new(top.id);
            top.screen.update(delta_ms, &mut requests);
            self.apply(requests);
        }
        if let Some(requests) = outgoing_requests {
            self.apply(requests);
        }
    }

    fn apply(&mut self, requests: StackRequests) {
        for request in requests.into_queued() {
            match request {
                StackRequest::Close(id) => {
                    drop(self.pop(id));
                }
                StackRequest::Push(screen) => {
                    self.push(screen);
                }
                StackRequest::RefreshHelp => self.help_dirty = true,
            }
        }
    }

    /// Composite the stack: the bottom screen is the persistent background;
    /// when the top differs it is drawn above an optional wash. A modal top
    /// also keeps the screen beneath it visible, unless that is the bottom.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, wash: bool) {
        let len = self.slots.len();
        if len == 0 {
            return;
        }
        let top_idx = len - 1;
        let single = len == 1;
        self.slots[0].screen.render(
            frame,
            area,
            &ComponentContext::background(single),
        );
        if single {
            return;
        }

        let transition = self.transition;
        if transition.is_none() && self.slots[top_idx].screen.is_modal() && len > 2 {
            let middle_idx = len - 2;
            if middle_idx != 0 {
                self.slots[middle_idx].screen.render(
                    frame,
                    area,
                    &ComponentContext::beneath(),
                );
            }
        }

        if wash {
            frame.dim(area);
        }

        let top_ctx = ComponentContext::top();
        match transition {
            Some(t) => {
                let offset = t.offset(area.width);
                if let Some(idx) = self.slots.iter().position(|s| s.id == t.outgoing) {
                    let ctx = ComponentContext::beneath().with_sliding(true);
                    render_shifted(self.slots[idx].screen.as_mut(), frame, area, -offset, &ctx);
                }
                let incoming = area.width as i32 - offset;
                render_shifted(
                    self.slots[top_idx].screen.as_mut(),
                    frame,
                    area,
                    incoming,
                    &top_ctx.with_sliding(true),
                );
            }
            None => self.slots[top_idx].screen.render(frame, area, &top_ctx),
        }
    }
}

fn render_shifted(
    screen: &mut dyn Screen,
    frame: &mut UiFrame<'_>,
    area: Rect,
    dx: i32,
    ctx: &ComponentContext,
) {
    let mut offscreen = Buffer::empty(area);
    {
        let mut sub = UiFrame::from_parts(area, &mut offscreen);
        screen.render(&mut sub, area, ctx);
    }
    frame.blit_shifted(&offscreen, dx);
}

impl Drop for ScreenStack {
    fn drop(&mut self) {
        while let Some(slot) = self.slots.pop() {
            tracing::debug!(screen = slot.screen.name(), id = %slot.id, "destroy screen");
            drop(slot);
        }
    }
}
