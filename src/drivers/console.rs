use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

/// Drops key releases (reported on some platforms) and folds Shift+Tab
/// into `BackTab` so bindings see one event per keystroke.
fn normalize(event: Event) -> Option<Event> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Release => None,
        Event::Key(mut key)
            if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) =>
        {
            key.code = KeyCode::BackTab;
            key.modifiers.remove(KeyModifiers::SHIFT);
            Some(Event::Key(key))
        }
        other => Some(other),
    }
}

#[derive(Default)]
pub struct ConsoleInputDriver {
    event_queue: VecDeque<Event>,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event ahead of the terminal's own input.
    pub fn inject(&mut self, event: Event) {
        self.event_queue.push_back(event);
    }

    fn read_internal(&mut self) -> io::Result<Event> {
        loop {
            if let Some(event) = normalize(crossterm::event::read()?) {
                return Ok(event);
            }
        }
    }
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.event_queue.is_empty() {
            return Ok(true);
        }
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        if let Some(event) = self.event_queue.pop_front() {
            return Ok(event);
        }
        self.read_internal()
    }
}

pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableBracketedPaste
        )?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.terminal
            .draw(move |frame| f(UiFrame::new(frame)))
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn shift_tab_becomes_backtab() {
        let evt = Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT));
        match normalize(evt) {
            Some(Event::Key(k)) => {
                assert_eq!(k.code, KeyCode::BackTab);
                assert!(!k.modifiers.contains(KeyModifiers::SHIFT));
            }
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn releases_are_dropped() {
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(normalize(Event::Key(key)).is_none());
        assert!(normalize(Event::Resize(10, 20)).is_some());
    }

    #[test]
    fn injected_events_are_read_first() {
        let mut d = ConsoleInputDriver::new();
        d.inject(Event::Key(KeyEvent::new(
            KeyCode::Char('z'),
            KeyModifiers::NONE,
        )));
        assert!(d.poll(Duration::from_millis(0)).unwrap());
        match d.read().unwrap() {
            Event::Key(k) => assert_eq!(k.code, KeyCode::Char('z')),
            other => panic!("expected key, got {other:?}"),
        }
    }
}
