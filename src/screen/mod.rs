//! Capability traits consumed by the orchestrator.
//!
//! A [`Screen`] is one entry of the navigation stack: a full view or a
//! modal dialog. A [`ScreenExtra`] is a theme-provided decoration drawn on
//! top of everything. A [`Screensaver`] takes over the display once the
//! idle threshold is reached. Every hook except `render` has a no-op
//! default so simple screens only implement what they need.

pub mod stack;

use std::fmt;

use ratatui::layout::Rect;

use crate::component_context::ComponentContext;
use crate::help::{HelpPrompt, HelpStyle};
use crate::keybindings::{InputEvent, KeyBindings};
use crate::ui::UiFrame;

pub use stack::{ScreenStack, Transition};

/// Stable identity of a pushed screen. Ids are never reused by a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScreenId(pub(crate) u64);

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait Screen {
    /// Short name used in logs.
    fn name(&self) -> &str {
        "screen"
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn update(&mut self, _delta_ms: u32, _requests: &mut StackRequests) {}

    /// Returns true when the event was consumed.
    fn handle_input(
        &mut self,
        _bindings: &KeyBindings,
        _event: &InputEvent,
        _requests: &mut StackRequests,
    ) -> bool {
        false
    }

    fn text_input(&mut self, _text: &str) {}

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        Vec::new()
    }

    /// Overrides the theme's help bar style while this screen is on top.
    fn help_style(&self) -> Option<HelpStyle> {
        None
    }

    fn on_show(&mut self) {}

    fn on_hide(&mut self) {}

    fn on_screensaver_activate(&mut self) {}

    fn on_screensaver_deactivate(&mut self) {}

    /// A busy screen keeps the system from going to sleep.
    fn is_processing(&self) -> bool {
        false
    }

    /// Called with `false` when another screen is pushed over this one and
    /// with `true` when it becomes the top again after a pop.
    fn set_top_window(&mut self, _top: bool) {}

    /// Modal dialogs keep the screen directly beneath them visible.
    fn is_modal(&self) -> bool {
        false
    }
}

/// Theme-provided decorations drawn above the screensaver.
pub trait ScreenExtra {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn z_index(&self) -> i32 {
        0
    }

    fn on_show(&mut self) {}

    fn on_hide(&mut self) {}

    fn on_screensaver_activate(&mut self) {}

    fn on_screensaver_deactivate(&mut self) {}

    fn is_processing(&self) -> bool {
        false
    }
}

pub trait Screensaver {
    fn start(&mut self);

    fn stop(&mut self);

    /// Step to the next slideshow item.
    fn advance_to_next(&mut self);

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect);

    fn allow_sleep(&self) -> bool;

    fn update(&mut self, delta_ms: u32);

    fn is_active(&self) -> bool;

    /// Label of the item currently on display, if any.
    fn current_item(&self) -> Option<String>;

    fn launch_current_item(&mut self);

    fn reset_counts(&mut self);
}

pub(crate) enum StackRequest {
    Close(ScreenId),
    Push(Box<dyn Screen>),
    RefreshHelp,
}

/// Changes a screen asks for while it is being dispatched to. They are
/// applied after the screen's call returns, so a screen can close itself
/// without the stack touching it again in the same dispatch.
pub struct StackRequests {
    current: ScreenId,
    queued: Vec<StackRequest>,
}

impl StackRequests {
    pub(crate) fn new(current: ScreenId) -> Self {
        Self {
            current,
            queued: Vec::new(),
        }
    }

    /// Id of the screen being dispatched to.
    pub fn id(&self) -> ScreenId {
        self.current
    }

    pub fn close_self(&mut self) {
        self.queued.push(StackRequest::Close(self.current));
    }

    pub fn close(&mut self, id: ScreenId) {
        self.queued.push(StackRequest::Close(id));
    }

    pub fn push<S: Screen + 'static>(&mut self, screen: S) {
        self.queued.push(StackRequest::Push(Box::new(screen)));
    }

    /// Ask for the help bar to be rebuilt, e.g. after the screen changed
    /// its prompts or help style.
    pub fn refresh_help(&mut self) {
        self.queued.push(StackRequest::RefreshHelp);
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub(crate) fn into_queued(self) -> Vec<StackRequest> {
        self.queued
    }
}
