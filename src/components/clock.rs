use chrono::Local;
use ratatui::layout::Rect;

use crate::components::Component;
use crate::constants::CLOCK_REFRESH_MS;
use crate::theme::Theme;
use crate::ui::UiFrame;

/// `HH:MM` in the bottom-right corner, refreshed once per second.
#[derive(Debug, Default)]
pub struct Clock {
    text: String,
    until_refresh_ms: i64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Make the next `update` re-read the time.
    pub fn force_refresh(&mut self) {
        self.until_refresh_ms = -1;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.until_refresh_ms = CLOCK_REFRESH_MS;
    }
}

impl Component for Clock {
    fn update(&mut self, delta_ms: u32) {
        self.until_refresh_ms -= delta_ms as i64;
        if self.until_refresh_ms <= 0 {
            self.set_text(Local::now().format("%H:%M").to_string());
        }
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, theme: &Theme) {
        let width = self.text.chars().count() as u16;
        if self.text.is_empty() || area.width <= width || area.height == 0 {
            return;
        }
        let x = area.x + area.width - width - 1;
        let y = area.y + area.height - 1;
        frame.set_string(x, y, &self.text, theme.clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::row_text;
    use ratatui::buffer::Buffer;

    #[test]
    fn refreshes_after_interval() {
        let mut clock = Clock::new();
        clock.set_text("old");
        clock.update(999);
        assert_eq!(clock.text(), "old");
        clock.update(1);
        assert_eq!(clock.text().len(), 5);
        assert_eq!(clock.text().as_bytes()[2], b':');
    }

    #[test]
    fn renders_right_aligned_on_last_row() {
        let mut clock = Clock::new();
        clock.set_text("12:34");
        let area = Rect::new(0, 0, 10, 2);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        clock.render(&mut frame, area, &Theme::default());
        assert_eq!(row_text(&buffer, 1), "    12:34 ");
    }
}
