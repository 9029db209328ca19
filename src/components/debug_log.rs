use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::components::Component;
use crate::theme::Theme;
use crate::ui::UiFrame;

const DEFAULT_MAX_LINES: usize = 500;
static GLOBAL_LOG: OnceLock<LogBuffer> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

pub fn set_global_log_buffer(buffer: LogBuffer) -> bool {
    GLOBAL_LOG.set(buffer).is_ok()
}

pub fn global_log_buffer() -> Option<LogBuffer> {
    GLOBAL_LOG.get().cloned()
}

/// Copy panic messages into the global log buffer before the previous hook
/// runs, so they survive the terminal being restored.
pub fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(log) = GLOBAL_LOG.get() {
            log.push("=== PANIC ===");
            if let Some(location) = info.location() {
                log.push(format!(
                    "{}:{}:{}",
                    location.file(),
                    location.line(),
                    location.column()
                ));
            }
            if let Some(msg) = info.payload().downcast_ref::<&str>() {
                log.push(format!("message: {msg}"));
            } else if let Some(msg) = info.payload().downcast_ref::<String>() {
                log.push(format!("message: {msg}"));
            }
        }
        prev(info);
    }));
}

#[derive(Debug)]
struct Lines {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl Lines {
    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Bounded, shareable ring of log lines.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    inner: Arc<Mutex<Lines>>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl LogBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Lines {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut lines) = self.inner.lock() {
            lines.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|l| l.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `count` most recent lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let Ok(lines) = self.inner.lock() else {
            return Vec::new();
        };
        let skip = lines.lines.len().saturating_sub(count);
        lines.lines.iter().skip(skip).cloned().collect()
    }

    pub fn writer(&self) -> LogBufferWriter {
        LogBufferWriter {
            log: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// `io::Write` adapter that splits its input into lines.
#[derive(Debug)]
pub struct LogBufferWriter {
    log: LogBuffer,
    pending: Vec<u8>,
}

impl LogBufferWriter {
    fn flush_pending(&mut self, force: bool) {
        if self.pending.is_empty() {
            return;
        }
        let end = if force {
            self.pending.len()
        } else {
            match self.pending.iter().rposition(|b| *b == b'\n') {
                Some(pos) => pos + 1,
                None => return,
            }
        };
        let drained: Vec<u8> = self.pending.drain(..end).collect();
        let text = String::from_utf8_lossy(&drained);
        for line in text.split('\n').filter(|line| !line.is_empty()) {
            self.log.push(line.to_string());
        }
    }
}

impl Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.flush_pending(false);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending(true);
        Ok(())
    }
}

impl Drop for LogBufferWriter {
    fn drop(&mut self) {
        self.flush_pending(true);
    }
}

/// Log overlay drawn over the lower third of the frame.
#[derive(Debug, Clone)]
pub struct LogTail {
    log: LogBuffer,
}

impl LogTail {
    pub fn new(log: LogBuffer) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }
}

impl Component for LogTail {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, theme: &Theme) {
        let height = (area.height / 3).max(3).min(area.height);
        if area.width < 3 || height < 3 {
            return;
        }
        let rect = Rect {
            x: area.x,
            y: area.y + area.height - height,
            width: area.width,
            height,
        };
        let lines: Vec<Line> = self
            .log
            .tail(height.saturating_sub(2) as usize)
            .into_iter()
            .map(Line::from)
            .collect();
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().fg(theme.popup_fg).bg(theme.popup_bg))
                .block(Block::default().title("log").borders(Borders::ALL)),
            rect,
        );
    }
}
