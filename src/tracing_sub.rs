//! Logging setup.
//!
//! While the front-end owns the terminal, anything printed to stderr would
//! tear the frame, so log lines go into the shared [`LogBuffer`] and show up
//! in the `DrawLog` overlay. Without a buffer they fall back to stderr.
//!
//! [`LogBuffer`]: crate::components::LogBuffer

use std::io::{self, Write};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::components::debug_log::{LogBufferWriter, global_log_buffer};

/// Destination of one formatted log event.
pub enum LogSink {
    Buffer(LogBufferWriter),
    Stderr(io::Stderr),
}

impl LogSink {
    /// The global log buffer if one was installed, stderr otherwise.
    pub fn current() -> Self {
        match global_log_buffer() {
            Some(log) => Self::Buffer(log.writer()),
            None => Self::Stderr(io::stderr()),
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Buffer(w) => w.write(buf),
            Self::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Buffer(w) => w.flush(),
            Self::Stderr(s) => s.flush(),
        }
    }
}

/// Picks a [`LogSink`] per event, so a buffer installed after the
/// subscriber still receives output.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrontendLogs;

impl<'a> MakeWriter<'a> for FrontendLogs {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        LogSink::current()
    }
}

pub fn max_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::INFO }
}

/// Install the global subscriber. Repeated calls keep the first one.
pub fn init_default(verbose: bool) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(max_level(verbose))
        .with_writer(FrontendLogs)
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(verbose, "logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::LogBuffer;

    #[test]
    fn verbose_raises_the_level() {
        assert_eq!(max_level(false), Level::INFO);
        assert_eq!(max_level(true), Level::DEBUG);
    }

    #[test]
    fn buffer_sink_lands_in_the_log() {
        let log = LogBuffer::new(4);
        {
            let mut sink = LogSink::Buffer(log.writer());
            sink.write_all(b"screensaver activated\n").unwrap();
        }
        assert_eq!(log.tail(1), vec!["screensaver activated"]);
    }
}
