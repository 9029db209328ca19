use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::channel::NotificationMessage;
use crate::components::Component;
use crate::theme::Theme;
use crate::ui::UiFrame;

const MAX_WIDTH: u16 = 50;

/// Transient message box shown near the top of the frame until its
/// duration runs out.
#[derive(Debug, Clone)]
pub struct InfoPopup {
    text: String,
    remaining_ms: u32,
}

impl InfoPopup {
    pub fn new(message: NotificationMessage) -> Self {
        Self {
            text: message.text,
            remaining_ms: message.duration_ms,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    pub fn expired(&self) -> bool {
        self.remaining_ms == 0
    }

    fn rect_for(&self, area: Rect) -> Rect {
        let text_width = self.text.chars().count() as u16;
        let width = text_width
            .saturating_add(4)
            .min(MAX_WIDTH)
            .min(area.width)
            .max(1);
        let inner = width.saturating_sub(2).max(1);
        let lines = text_width.div_ceil(inner).max(1);
        let height = lines.saturating_add(2).min(area.height).max(1);
        Rect {
            x: area.x.saturating_add(area.width.saturating_sub(width) / 2),
            y: area.y.saturating_add(1u16.min(area.height.saturating_sub(height))),
            width,
            height,
        }
    }
}

impl Component for InfoPopup {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, theme: &Theme) {
        if self.expired() || area.width == 0 || area.height == 0 {
            return;
        }
        let rect = self.rect_for(area);
        frame.render_widget(Clear, rect);
        let paragraph = Paragraph::new(self.text.as_str())
            .style(Style::default().fg(theme.popup_fg).bg(theme.popup_bg))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, rect);
    }

    fn update(&mut self, delta_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(delta_ms);
    }
}
