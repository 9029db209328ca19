use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::window::Window;

/// Drive `window` until `should_quit` says so.
///
/// `should_quit` sees every input event before the window does, and is
/// also asked with `None` once per tick. Each tick updates the window with
/// the wall-clock time since the previous tick and then draws it.
pub fn run_window<O, D, FQuit>(
    output: &mut O,
    driver: D,
    window: &mut Window,
    poll_interval: Duration,
    mut should_quit: FQuit,
) -> io::Result<()>
where
    O: OutputDriver,
    D: InputDriver,
    FQuit: FnMut(Option<&Event>, &mut Window) -> bool,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    let mut last_tick = Instant::now();

    event_loop.run(|event| {
        if should_quit(event.as_ref(), window) {
            return Ok(ControlFlow::Quit);
        }
        match event {
            Some(Event::Resize(..)) => window.normalize_next_update(),
            Some(event) => window.input(&event),
            None => {
                let now = Instant::now();
                let delta_ms = now.duration_since(last_tick).as_millis();
                last_tick = now;
                window.update(u32::try_from(delta_ms).unwrap_or(u32::MAX));
                output.draw(|mut frame| window.render(&mut frame))?;
            }
        }
        Ok(ControlFlow::Continue)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Screen;
    use crate::ui::{UiFrame, row_text};
    use crate::component_context::ComponentContext;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("no scripted events left"))
        }
    }

    struct Offscreen {
        buffer: Buffer,
        frames: usize,
    }

    impl OutputDriver for Offscreen {
        fn enter(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn exit(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn draw<F>(&mut self, f: F) -> io::Result<()>
        where
            F: FnOnce(UiFrame<'_>),
        {
            self.buffer.reset();
            let area = self.buffer.area;
            f(UiFrame::from_parts(area, &mut self.buffer));
            self.frames += 1;
            Ok(())
        }
    }

    struct Title;

    impl Screen for Title {
        fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
            frame.set_string(area.x, area.y, "title", Default::default());
        }
    }

    #[test]
    fn quit_key_stops_the_loop_after_drawing() {
        let mut output = Offscreen {
            buffer: Buffer::empty(Rect::new(0, 0, 20, 3)),
            frames: 0,
        };
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        let driver = Scripted(VecDeque::from([quit]));
        let mut window = Window::default();
        window.push_screen(Title);

        run_window(
            &mut output,
            driver,
            &mut window,
            Duration::from_millis(0),
            |event, _| {
                matches!(event, Some(Event::Key(key)) if key.code == KeyCode::Char('q'))
            },
        )
        .unwrap();

        assert_eq!(output.frames, 1);
        assert!(row_text(&output.buffer, 0).starts_with("title"));
    }
}
