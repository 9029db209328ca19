use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Poll-driven loop that owns the UI thread.
///
/// Each iteration calls the handler once with `None` (a tick: update and
/// draw), then waits up to `poll_interval` for input and hands every queued
/// event to the handler as `Some(event)`.
///
/// Background threads never touch the UI directly. They post into the
/// window's mailbox and the next tick picks their work up.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(None)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (key repeat, paste) in one go so input never
                // lags a frame behind per event.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
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

    #[test]
    fn bursts_are_drained_between_ticks() {
        let key = |c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        let driver = Scripted(VecDeque::from([key('a'), key('b')]));
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(0));
        let mut seen = Vec::new();
        event_loop
            .run(|event| {
                let tick = event.is_none();
                seen.push(tick);
                Ok(if tick && seen.len() > 1 {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(seen, vec![true, false, false, true]);
    }
}
