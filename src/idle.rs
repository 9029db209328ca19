//! Idle tracking for the screensaver and sleep lifecycle.
//!
//! The state machine only decides; the orchestrator performs the side
//! effects (starting the screensaver, notifying screens, firing power
//! hooks) based on what these methods report.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleState {
    Active,
    ScreensaverActive,
    Sleeping,
}

/// What to do with an input event after the idle machine has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputGate {
    /// Deliver the event to the screen stack.
    Forward,
    /// The event cancelled the screensaver and must not be forwarded.
    CancelScreensaver,
    /// The event woke the system from sleep and must not be forwarded.
    Wake,
}

#[derive(Debug, Clone)]
pub struct IdleStateMachine {
    threshold_ms: u64,
    since_input_ms: u64,
    screensaver: bool,
    sleeping: bool,
    allow_sleep: bool,
}

impl IdleStateMachine {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            threshold_ms,
            since_input_ms: 0,
            screensaver: false,
            sleeping: false,
            allow_sleep: true,
        }
    }

    pub fn state(&self) -> IdleState {
        if self.sleeping {
            IdleState::Sleeping
        } else if self.screensaver {
            IdleState::ScreensaverActive
        } else {
            IdleState::Active
        }
    }

    pub fn is_screensaver_active(&self) -> bool {
        self.screensaver
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn since_input_ms(&self) -> u64 {
        self.since_input_ms
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    pub fn set_threshold_ms(&mut self, threshold_ms: u64) {
        self.threshold_ms = threshold_ms;
    }

    pub fn allow_sleep(&self) -> bool {
        self.allow_sleep
    }

    pub fn set_allow_sleep(&mut self, allow: bool) {
        self.allow_sleep = allow;
    }

    pub fn advance(&mut self, delta_ms: u32) {
        self.since_input_ms = self.since_input_ms.saturating_add(delta_ms as u64);
    }

    /// True once the idle threshold has been reached. A zero threshold
    /// disables idle handling entirely.
    pub fn threshold_reached(&self) -> bool {
        self.threshold_ms != 0 && self.since_input_ms >= self.threshold_ms
    }

    /// Enter `ScreensaverActive`. Returns false when already there, so the
    /// caller fires lifecycle notifications once per idle period.
    pub fn enter_screensaver(&mut self) -> bool {
        if self.screensaver {
            return false;
        }
        self.screensaver = true;
        true
    }

    /// Leave `ScreensaverActive`. Returns false when it was not active.
    pub fn leave_screensaver(&mut self) -> bool {
        if !self.screensaver {
            return false;
        }
        self.screensaver = false;
        true
    }

    /// Whether sleep may begin now. `busy` is true when any screen or
    /// extra reports itself processing; `screensaver_permits` is the
    /// installed screensaver's answer, or true when none is installed.
    pub fn should_sleep(&self, busy: bool, screensaver_permits: bool) -> bool {
        !self.sleeping
            && self.threshold_reached()
            && !busy
            && self.allow_sleep
            && screensaver_permits
    }

    /// Enter `Sleeping`. Returns false when already asleep.
    pub fn enter_sleep(&mut self) -> bool {
        if self.sleeping {
            return false;
        }
        self.sleeping = true;
        true
    }

    /// Record an input event and decide whether it reaches the stack.
    pub fn register_input(&mut self) -> InputGate {
        self.since_input_ms = 0;
        if self.sleeping {
            self.sleeping = false;
            self.screensaver = false;
            InputGate::Wake
        } else if self.screensaver {
            self.screensaver = false;
            InputGate::CancelScreensaver
        } else {
            InputGate::Forward
        }
    }
}
