use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Gauge};

use crate::channel::AsyncNotification;
use crate::theme::Theme;
use crate::ui::UiFrame;

const WIDTH: u16 = 32;
const HEIGHT: u16 = 3;

/// Progress box for long-running background work. The owning thread keeps
/// an `Arc` to it, updates it freely, and registers it through a
/// `UiHandle` while the work runs.
#[derive(Debug, Default)]
pub struct ProgressNotification {
    title: Mutex<String>,
    percent: AtomicU8,
}

impl ProgressNotification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Mutex::new(title.into()),
            percent: AtomicU8::new(0),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        if let Ok(mut current) = self.title.lock() {
            *current = title.into();
        }
    }

    pub fn title(&self) -> String {
        self.title
            .lock()
            .map(|title| title.clone())
            .unwrap_or_default()
    }

    pub fn set_percent(&self, percent: u8) {
        self.percent.store(percent.min(100), Ordering::Relaxed);
    }

    pub fn percent(&self) -> u8 {
        self.percent.load(Ordering::Relaxed)
    }
}

impl AsyncNotification for ProgressNotification {
    fn size(&self) -> (u16, u16) {
        (WIDTH, HEIGHT)
    }

    fn render(&self, frame: &mut UiFrame<'_>, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let title = self.title();
        let gauge = Gauge::default()
            .block(Block::default().title(title.as_str()).borders(Borders::ALL))
            .gauge_style(Style::default().fg(theme.loading_bar).bg(theme.popup_bg))
            .percent(self.percent() as u16);
        frame.render_widget(gauge, area);
    }
}
