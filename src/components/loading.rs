use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Clear, Gauge, Paragraph};

use crate::theme::Theme;
use crate::ui::UiFrame;

/// Full-frame splash with a caption and, when `percent` is given, a
/// progress bar underneath. `percent` is a fraction in `0.0..=1.0`; a
/// negative or NaN value hides the bar.
pub fn render_loading_screen(
    frame: &mut UiFrame<'_>,
    theme: &Theme,
    title: &str,
    text: &str,
    percent: Option<f32>,
) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }
    frame.render_widget(Clear, area);

    let title_y = area.y + area.height * 2 / 5;
    let title_rect = Rect::new(area.x, title_y, area.width, 1);
    frame.render_widget(
        Paragraph::new(title)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD)),
        title_rect,
    );

    let text_rect = Rect::new(area.x, title_y.saturating_add(2), area.width, 1);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.loading_fg)),
        text_rect,
    );

    if let Some(percent) = percent
        && percent >= 0.0
    {
        let width = area.width / 2;
        let bar = Rect::new(
            area.x + (area.width - width) / 2,
            title_y.saturating_add(4),
            width,
            1,
        );
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(theme.loading_bar))
                .ratio(percent.clamp(0.0, 1.0) as f64),
            bar,
        );
    }
}
