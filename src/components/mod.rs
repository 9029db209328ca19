use ratatui::layout::Rect;

use crate::theme::Theme;
use crate::ui::UiFrame;

pub mod activity;
pub mod clock;
pub mod debug_log;
pub mod help_bar;
pub mod info_popup;
pub mod loading;
pub mod progress;

pub use activity::ActivityIndicator;
pub use clock::Clock;
pub use debug_log::{LogBuffer, LogTail};
pub use help_bar::HelpBar;
pub use info_popup::InfoPopup;
pub use loading::render_loading_screen;
pub use progress::ProgressNotification;

pub use crate::component_context::ComponentContext;

/// Built-in overlays owned by the orchestrator.
pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, theme: &Theme);

    fn update(&mut self, _delta_ms: u32) {}
}

/// Center a `width` x `height` box inside `area`, clamped to fit.
pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = area.width.min(width).max(1);
    let height = area.height.min(height).max(1);
    let x = area.x.saturating_add(area.width.saturating_sub(width) / 2);
    let y = area
        .y
        .saturating_add(area.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 10, 2);
        let r = centered_rect(area, 40, 5);
        assert_eq!(r, Rect::new(0, 0, 10, 2));
        let r = centered_rect(Rect::new(0, 0, 80, 24), 20, 4);
        assert_eq!(r, Rect::new(30, 10, 20, 4));
    }
}
