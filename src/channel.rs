//! Cross-thread mailbox feeding the UI thread.
//!
//! Background threads hold a cloneable [`UiHandle`] and use it to queue
//! display messages, queue closures that must run on the UI thread, and
//! register long-lived notification widgets. The UI thread owns the
//! matching [`UiChannel`] and drains it once per tick.
//!
//! Ordering is part of the contract:
//! - deferred functions drain first-in first-out, as a batch; work queued
//!   while a batch runs waits for the next drain;
//! - display messages pop last-in first-out, one per tick, so the newest
//!   message preempts older ones that have not been shown yet.
//!
//! Every operation takes the one mailbox lock only long enough to touch a
//! list. Closures and widget rendering run after the lock is released.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ratatui::layout::Rect;

use crate::constants::{NOTIFICATION_MAX_SECS, NOTIFICATION_MIN_SECS};
use crate::theme::Theme;
use crate::ui::UiFrame;

/// A closure queued from any thread and run once on the UI thread.
pub type DeferredFn<T> = Box<dyn FnOnce(&mut T) + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub text: String,
    pub duration_ms: u32,
}

/// A persistent overlay widget (for example a download progress bar)
/// owned by background code and drawn every frame while registered.
///
/// Implementations are shared with the owning thread, so any state they
/// expose must be internally synchronized.
pub trait AsyncNotification: Send + Sync {
    /// Size in cells as `(width, height)`.
    fn size(&self) -> (u16, u16);

    fn render(&self, frame: &mut UiFrame<'_>, area: Rect, theme: &Theme);
}

/// Resolve a requested duration. Positive values are milliseconds and pass
/// through; zero or negative values fall back to `default_secs` clamped to
/// the allowed range.
pub fn resolve_duration(duration_ms: i64, default_secs: i64) -> u32 {
    if duration_ms > 0 {
        return duration_ms.min(u32::MAX as i64) as u32;
    }
    let secs = default_secs.clamp(NOTIFICATION_MIN_SECS, NOTIFICATION_MAX_SECS);
    (secs * 1000) as u32
}

struct Mailbox<T> {
    messages: Vec<NotificationMessage>,
    functions: Vec<DeferredFn<T>>,
    components: Vec<Arc<dyn AsyncNotification>>,
    default_duration_secs: i64,
}

fn lock<T>(inner: &Mutex<Mailbox<T>>) -> MutexGuard<'_, Mailbox<T>> {
    // The mailbox only holds plain lists; a panic mid-push leaves them usable.
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Producer side. Cheap to clone and safe to move to other threads.
pub struct UiHandle<T> {
    inner: Arc<Mutex<Mailbox<T>>>,
}

impl<T> Clone for UiHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> UiHandle<T> {
    /// Queue a message for display. See [`resolve_duration`] for how
    /// `duration_ms` is interpreted.
    pub fn display_notification(&self, text: impl Into<String>, duration_ms: i64) {
        let mut mailbox = lock(&self.inner);
        let duration_ms = resolve_duration(duration_ms, mailbox.default_duration_secs);
        mailbox.messages.push(NotificationMessage {
            text: text.into(),
            duration_ms,
        });
    }

    /// Queue `func` to run on the UI thread during the next drain.
    pub fn post_to_ui_thread<F>(&self, func: F)
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        lock(&self.inner).functions.push(Box::new(func));
    }

    /// Register a persistent notification widget. Returns false if it was
    /// already registered.
    pub fn register_notification(&self, component: Arc<dyn AsyncNotification>) -> bool {
        let mut mailbox = lock(&self.inner);
        if mailbox
            .components
            .iter()
            .any(|c| Arc::ptr_eq(c, &component))
        {
            return false;
        }
        mailbox.components.push(component);
        true
    }

    /// Remove a registered widget. Returns false if it was not registered.
    pub fn unregister_notification(&self, component: &Arc<dyn AsyncNotification>) -> bool {
        let mut mailbox = lock(&self.inner);
        let before = mailbox.components.len();
        mailbox.components.retain(|c| !Arc::ptr_eq(c, component));
        mailbox.components.len() != before
    }
}

/// Consumer side, owned by the UI thread.
pub struct UiChannel<T> {
    inner: Arc<Mutex<Mailbox<T>>>,
}

impl<T> Default for UiChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UiChannel<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Mailbox {
                messages: Vec::new(),
                functions: Vec::new(),
                components: Vec::new(),
                default_duration_secs: crate::constants::NOTIFICATION_DEFAULT_SECS,
            })),
        }
    }

    pub fn handle(&self) -> UiHandle<T> {
        UiHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Default used for messages queued with a non-positive duration.
    pub fn set_default_duration_secs(&self, secs: i64) {
        lock(&self.inner).default_duration_secs = secs;
    }

    /// Swap out the pending deferred functions. The caller invokes them
    /// after this returns, so they may queue more work without deadlock.
    pub fn take_deferred(&self) -> Vec<DeferredFn<T>> {
        std::mem::take(&mut lock(&self.inner).functions)
    }

    /// Remove and return the most recently queued message.
    pub fn pop_next_message(&self) -> Option<NotificationMessage> {
        lock(&self.inner).messages.pop()
    }

    /// Snapshot of the registered widgets, in registration order.
    pub fn notifications(&self) -> Vec<Arc<dyn AsyncNotification>> {
        lock(&self.inner).components.clone()
    }

    pub fn pending_messages(&self) -> usize {
        lock(&self.inner).messages.len()
    }

    pub fn pending_deferred(&self) -> usize {
        lock(&self.inner).functions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    struct Tag;
    impl AsyncNotification for Tag {
        fn size(&self) -> (u16, u16) {
            (1, 1)
        }
        fn render(&self, _frame: &mut UiFrame<'_>, _area: Rect, _theme: &Theme) {}
    }

    #[test]
    fn durations_resolve_to_clamped_default() {
        assert_eq!(resolve_duration(0, 10), 10_000);
        assert_eq!(resolve_duration(-5, 10), 10_000);
        assert_eq!(resolve_duration(0, 1), 2_000);
        assert_eq!(resolve_duration(0, 500), 120_000);
        assert_eq!(resolve_duration(750, 10), 750);
    }

    #[test]
    fn messages_pop_newest_first() {
        let channel: UiChannel<()> = UiChannel::new();
        let handle = channel.handle();
        handle.display_notification("first", 0);
        handle.display_notification("second", 0);
        assert_eq!(channel.pop_next_message().unwrap().text, "second");
        assert_eq!(channel.pop_next_message().unwrap().text, "first");
        assert!(channel.pop_next_message().is_none());
    }

    #[test]
    fn deferred_functions_keep_arrival_order() {
        let channel: UiChannel<Vec<u32>> = UiChannel::new();
        let handle = channel.handle();
        for i in 0..3 {
            handle.post_to_ui_thread(move |log: &mut Vec<u32>| log.push(i));
        }
        let mut log = Vec::new();
        for func in channel.take_deferred() {
            func(&mut log);
        }
        assert_eq!(log, vec![0, 1, 2]);
        assert_eq!(channel.pending_deferred(), 0);
    }

    #[test]
    fn registration_is_idempotent() {
        let channel: UiChannel<()> = UiChannel::new();
        let handle = channel.handle();
        let tag: Arc<dyn AsyncNotification> = Arc::new(Tag);
        let other: Arc<dyn AsyncNotification> = Arc::new(Tag);
        assert!(handle.register_notification(Arc::clone(&tag)));
        assert!(!handle.register_notification(Arc::clone(&tag)));
        assert_eq!(channel.notifications().len(), 1);
        assert!(!handle.unregister_notification(&other));
        assert!(handle.unregister_notification(&tag));
        assert!(channel.notifications().is_empty());
    }

    #[test]
    fn producers_on_many_threads() {
        let channel: UiChannel<u32> = UiChannel::new();
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = channel.handle();
                thread::spawn(move || {
                    for _ in 0..25 {
                        handle.post_to_ui_thread(|n: &mut u32| *n += 1);
                        handle.display_notification("tick", 0);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        let mut total = 0;
        for func in channel.take_deferred() {
            func(&mut total);
        }
        assert_eq!(total, 100);
        assert_eq!(channel.pending_messages(), 100);
    }
}
