use ratatui::layout::Rect;

use crate::components::Component;
use crate::constants::ACTIVITY_FLASH_MS;
use crate::theme::Theme;
use crate::ui::UiFrame;

/// Small dot in the bottom-left corner that lights up briefly whenever
/// input arrives.
#[derive(Debug, Default)]
pub struct ActivityIndicator {
    lit_ms: u32,
}

impl ActivityIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_input(&mut self) {
        self.lit_ms = ACTIVITY_FLASH_MS;
    }

    pub fn is_lit(&self) -> bool {
        self.lit_ms > 0
    }
}

impl Component for ActivityIndicator {
    fn update(&mut self, delta_ms: u32) {
        self.lit_ms = self.lit_ms.saturating_sub(delta_ms);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (symbol, style) = if self.is_lit() {
            ("●", theme.activity_lit)
        } else {
            ("○", theme.activity_idle)
        };
        frame.set_string(area.x, area.y + area.height - 1, symbol, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_fades_out() {
        let mut a = ActivityIndicator::new();
        assert!(!a.is_lit());
        a.on_input();
        assert!(a.is_lit());
        a.update(ACTIVITY_FLASH_MS);
        assert!(!a.is_lit());
    }
}
