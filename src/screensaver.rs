//! Ready-made [`Screensaver`] covering the four configured behaviors.
//!
//! `dim` washes whatever is on screen, `black` blanks it, and the two
//! browsable modes cycle through a list of item labels. Launching an item
//! hands its label to a callback supplied by the application.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::components::centered_rect;
use crate::config::ScreenSaverBehavior;
use crate::screen::Screensaver;
use crate::ui::UiFrame;

const ITEM_INTERVAL_MS: u32 = 10_000;

type LaunchFn = Box<dyn FnMut(&str)>;

pub struct BasicScreensaver {
    behavior: ScreenSaverBehavior,
    items: Vec<String>,
    index: usize,
    active: bool,
    on_item_ms: u32,
    shown: u32,
    launch: Option<LaunchFn>,
}

impl BasicScreensaver {
    pub fn new(behavior: ScreenSaverBehavior) -> Self {
        Self {
            behavior,
            items: Vec::new(),
            index: 0,
            active: false,
            on_item_ms: 0,
            shown: 0,
            launch: None,
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_launch(mut self, launch: impl FnMut(&str) + 'static) -> Self {
        self.launch = Some(Box::new(launch));
        self
    }

    pub fn behavior(&self) -> ScreenSaverBehavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: ScreenSaverBehavior) {
        self.behavior = behavior;
    }

    /// Number of items displayed since the last `reset_counts`.
    pub fn shown(&self) -> u32 {
        self.shown
    }
}

fn blank(frame: &mut UiFrame<'_>, area: Rect) {
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Color::Black)), area);
}

impl Screensaver for BasicScreensaver {
    fn start(&mut self) {
        self.active = true;
        self.on_item_ms = 0;
        if self.current_item().is_some() {
            self.shown = self.shown.saturating_add(1);
        }
        tracing::debug!(behavior = %self.behavior, "screensaver started");
    }

    fn stop(&mut self) {
        self.active = false;
        tracing::debug!("screensaver stopped");
    }

    fn advance_to_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.items.len();
        self.on_item_ms = 0;
        self.shown = self.shown.saturating_add(1);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if !self.active {
            return;
        }
        match self.behavior {
            ScreenSaverBehavior::Dim => frame.dim(area),
            ScreenSaverBehavior::Black => blank(frame, area),
            ScreenSaverBehavior::Slideshow | ScreenSaverBehavior::RandomVideo => {
                blank(frame, area);
                if let Some(item) = self.current_item() {
                    let rect = centered_rect(area, area.width, 1);
                    frame.render_widget(
                        Paragraph::new(item)
                            .alignment(Alignment::Center)
                            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                        rect,
                    );
                }
            }
        }
    }

    /// Sleep would cut a running slideshow short, so only plain modes or an
    /// empty item list permit it.
    fn allow_sleep(&self) -> bool {
        self.current_item().is_none()
    }

    fn update(&mut self, delta_ms: u32) {
        if !self.active || !self.behavior.is_browsable() {
            return;
        }
        self.on_item_ms = self.on_item_ms.saturating_add(delta_ms);
        if self.on_item_ms >= ITEM_INTERVAL_MS {
            self.advance_to_next();
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn current_item(&self) -> Option<String> {
        if !self.behavior.is_browsable() {
            return None;
        }
        self.items.get(self.index).cloned()
    }

    fn launch_current_item(&mut self) {
        let Some(item) = self.current_item() else {
            return;
        };
        tracing::info!(item = %item, "launching screensaver item");
        if let Some(launch) = self.launch.as_mut() {
            launch(&item);
        }
    }

    fn reset_counts(&mut self) {
        self.shown = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dim_mode_has_no_items_and_allows_sleep() {
        let mut saver = BasicScreensaver::new(ScreenSaverBehavior::Dim).with_items(["one"]);
        saver.start();
        assert!(saver.is_active());
        assert_eq!(saver.current_item(), None);
        assert!(saver.allow_sleep());
    }

    #[test]
    fn slideshow_cycles_and_blocks_sleep() {
        let mut saver =
            BasicScreensaver::new(ScreenSaverBehavior::Slideshow).with_items(["one", "two"]);
        saver.start();
        assert_eq!(saver.current_item().as_deref(), Some("one"));
        assert!(!saver.allow_sleep());
        saver.update(ITEM_INTERVAL_MS);
        assert_eq!(saver.current_item().as_deref(), Some("two"));
        saver.advance_to_next();
        assert_eq!(saver.current_item().as_deref(), Some("one"));
        assert_eq!(saver.shown(), 3);
        saver.reset_counts();
        assert_eq!(saver.shown(), 0);
    }

    #[test]
    fn launch_passes_current_item() {
        let launched = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&launched);
        let mut saver = BasicScreensaver::new(ScreenSaverBehavior::RandomVideo)
            .with_items(["clip"])
            .on_launch(move |item| sink.borrow_mut().push(item.to_string()));
        saver.start();
        saver.launch_current_item();
        assert_eq!(*launched.borrow(), vec!["clip".to_string()]);
    }
}
