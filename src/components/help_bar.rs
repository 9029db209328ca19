use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::components::Component;
use crate::help::{HelpPrompt, HelpStyle, aggregate};
use crate::theme::Theme;
use crate::ui::UiFrame;

/// Contextual help line drawn along the bottom of the frame.
#[derive(Debug, Default)]
pub struct HelpBar {
    prompts: Vec<HelpPrompt>,
    style: Option<HelpStyle>,
}

impl HelpBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the prompts. The raw list is aggregated on every call.
    pub fn set_prompts(&mut self, prompts: Vec<HelpPrompt>, style: Option<HelpStyle>) {
        self.prompts = aggregate(prompts);
        self.style = style;
    }

    pub fn clear(&mut self) {
        self.prompts.clear();
    }

    pub fn prompts(&self) -> &[HelpPrompt] {
        &self.prompts
    }

    pub fn style(&self) -> Option<HelpStyle> {
        self.style
    }
}

impl Component for HelpBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, theme: &Theme) {
        if self.prompts.is_empty() || area.width == 0 || area.height == 0 {
            return;
        }
        let style = self.style.unwrap_or(theme.help);
        if style.bottom_offset >= area.height {
            return;
        }
        let y = area.y + area.height - 1 - style.bottom_offset;
        let base = Style::default();
        let base = match style.bg {
            Some(bg) => base.bg(bg),
            None => base,
        };
        let max_x = area.x.saturating_add(area.width);
        let mut x = area.x.saturating_add(1);
        for prompt in &self.prompts {
            if x >= max_x {
                break;
            }
            let glyph = format!("[{}]", prompt.glyph);
            frame.set_string(x, y, &glyph, base.fg(style.glyph_fg));
            x = x.saturating_add(glyph.chars().count() as u16 + 1);
            frame.set_string(x, y, &prompt.action, base.fg(style.text_fg));
            x = x.saturating_add(prompt.action.chars().count() as u16 + 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::row_text;
    use ratatui::buffer::Buffer;

    #[test]
    fn renders_aggregated_prompts_on_last_row() {
        let mut bar = HelpBar::new();
        bar.set_prompts(
            vec![
                HelpPrompt::new("b", "back"),
                HelpPrompt::new("up", "move"),
                HelpPrompt::new("down", "move"),
            ],
            None,
        );
        assert_eq!(bar.prompts().len(), 2);
        let area = Rect::new(0, 0, 30, 3);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        bar.render(&mut frame, area, &Theme::default());
        assert_eq!(row_text(&buffer, 2).trim_end(), " [up/down] move  [b] back");
    }
}
