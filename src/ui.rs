//! UiFrame: a thin wrapper around a `ratatui` buffer that clamps drawing to
//! the visible area.
//!
//! Screens, extras and built-in overlays all draw through this type. Rects
//! that drift outside the frame are clipped instead of panicking inside the
//! underlying `Buffer`, so screen code can lay itself out without guarding
//! every draw call.
//!
//! The orchestrator also uses `UiFrame` for offscreen rendering: a sliding
//! transition draws each screen into its own buffer and then blits it onto
//! the visible frame at a horizontal offset.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{StatefulWidget, Widget};

/// Wrapper around a frame buffer that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer.
    ///
    /// Used for offscreen composition and for rendering into an in-memory
    /// buffer in tests.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer(&self) -> &Buffer {
        self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    pub fn render_stateful_widget<W>(&mut self, widget: W, area: Rect, state: &mut W::State)
    where
        W: StatefulWidget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer, state);
        }
    }

    /// Write `text` at `(x, y)`, truncated to the frame.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        safe_set_string(self.buffer, self.area, x, y, text, style);
    }

    /// Dim every cell inside `area`. This is the background wash drawn
    /// between the bottom screen and the top screen.
    pub fn dim(&mut self, area: Rect) {
        let Some(clip) = self.clip_rect(area) else {
            return;
        };
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        for y in clip.y..clip.y.saturating_add(clip.height) {
            for x in clip.x..clip.x.saturating_add(clip.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_style(dim_style);
                }
            }
        }
    }

    /// Copy `src` onto this frame shifted horizontally by `dx` columns.
    /// Cells that land outside the frame are dropped.
    pub fn blit_shifted(&mut self, src: &Buffer, dx: i32) {
        let frame_x0 = self.area.x as i32;
        let frame_x1 = frame_x0 + self.area.width as i32;
        let src_area = src.area;
        for sy in src_area.y..src_area.y.saturating_add(src_area.height) {
            if sy < self.area.y || sy >= self.area.y.saturating_add(self.area.height) {
                continue;
            }
            for sx in src_area.x..src_area.x.saturating_add(src_area.width) {
                let tx = sx as i32 + dx;
                if tx < frame_x0 || tx >= frame_x1 {
                    continue;
                }
                if let (Some(src_cell), Some(dst_cell)) =
                    (src.cell((sx, sy)), self.buffer.cell_mut((tx as u16, sy)))
                {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    let bounds = bounds.intersection(buffer.area);
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Read back one row of a buffer as a plain string. Handy for assertions.
pub fn row_text(buffer: &Buffer, y: u16) -> String {
    let area = buffer.area;
    (area.x..area.x.saturating_add(area.width))
        .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol().to_string()))
        .collect()
}
