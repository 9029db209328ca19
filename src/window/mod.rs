//! The orchestrator that ties the screen stack, the mailbox, idle handling
//! and the built-in overlays together on the UI thread.

mod orchestrator;

pub use orchestrator::Window;

/// Source of "now playing" titles from an audio subsystem. Shared with the
/// playback thread.
pub trait NowPlaying: Send + Sync {
    /// Title of a song that started since the last call, taken once.
    fn take_song_name(&self) -> Option<String>;
}

/// Side effects run when the system goes to sleep and wakes up again.
pub trait PowerHooks {
    fn on_sleep(&mut self) {}

    fn on_wake(&mut self) {}
}
