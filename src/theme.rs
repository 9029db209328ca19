use ratatui::style::{Color, Style};

use crate::help::HelpStyle;

// Centralized palette. The built-in overlays read their colors from a
// `Theme` value so a skin change can restyle them in one place.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);
pub const ACCENT_ALT_RGB: (u8, u8, u8) = (255, 165, 0);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

pub fn accent_alt() -> Color {
    rgb_to_color(ACCENT_ALT_RGB)
}

/// Style bundle applied to the orchestrator's own overlays. Opaque to the
/// core: it is stored, handed to overlays, and replaced on theme change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    /// Dim the screens underneath the top screen.
    pub wash: bool,
    pub clock: Style,
    pub activity_idle: Style,
    pub activity_lit: Style,
    pub popup_fg: Color,
    pub popup_bg: Color,
    pub help: HelpStyle,
    pub loading_fg: Color,
    pub loading_bar: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            wash: true,
            clock: Style::default().fg(Color::Gray),
            activity_idle: Style::default().fg(Color::DarkGray),
            activity_lit: Style::default().fg(accent_alt()),
            popup_fg: Color::White,
            popup_bg: Color::Black,
            help: HelpStyle::default(),
            loading_fg: Color::Gray,
            loading_bar: accent(),
        }
    }
}
