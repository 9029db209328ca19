//! Frame pacing: a windowed average of frame durations plus a one-shot
//! clamp that absorbs a single stalled frame.

use crate::constants::{FRAME_PACING_WINDOW_MS, INITIAL_AVERAGE_FRAME_MS};

/// One-shot request to clamp the next frame delta. Consumed on first read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeGate {
    #[default]
    Idle,
    Armed,
}

impl NormalizeGate {
    pub fn arm(&mut self) {
        *self = Self::Armed;
    }

    /// Returns whether the gate was armed, disarming it in the same step.
    pub fn take(&mut self) -> bool {
        std::mem::take(self) == Self::Armed
    }
}

/// Summary of a closed pacing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub fps: f32,
    pub frame_ms: f32,
}

impl FrameStats {
    pub fn label(&self) -> String {
        format!("{:.1}fps, {:.2}ms", self.fps, self.frame_ms)
    }
}

#[derive(Debug, Clone)]
pub struct FramePacer {
    elapsed_ms: u32,
    frames: u32,
    average_ms: u32,
    normalize: NormalizeGate,
    last_stats: Option<FrameStats>,
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new()
    }
}

impl FramePacer {
    pub fn new() -> Self {
        Self {
            elapsed_ms: 0,
            frames: 0,
            average_ms: INITIAL_AVERAGE_FRAME_MS,
            normalize: NormalizeGate::Idle,
            last_stats: None,
        }
    }

    /// Ask for the next frame delta to be clamped to the current average.
    pub fn normalize_next_update(&mut self) {
        self.normalize.arm();
    }

    pub fn average_ms(&self) -> u32 {
        self.average_ms
    }

    pub fn last_stats(&self) -> Option<FrameStats> {
        self.last_stats
    }

    /// Account for one frame and return the delta the rest of the tick
    /// should use.
    pub fn advance(&mut self, delta_ms: u32) -> u32 {
        let delta_ms = if self.normalize.take() {
            delta_ms.min(self.average_ms)
        } else {
            delta_ms
        };

        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        self.frames = self.frames.saturating_add(1);
        if self.elapsed_ms >= FRAME_PACING_WINDOW_MS {
            self.average_ms = self.elapsed_ms / self.frames;
            self.last_stats = Some(FrameStats {
                fps: 1000.0 * self.frames as f32 / self.elapsed_ms as f32,
                frame_ms: self.elapsed_ms as f32 / self.frames as f32,
            });
            self.elapsed_ms = 0;
            self.frames = 0;
        }
        delta_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_is_consumed_once() {
        let mut gate = NormalizeGate::default();
        assert!(!gate.take());
        gate.arm();
        assert!(gate.take());
        assert!(!gate.take());
    }

    #[test]
    fn average_recomputed_when_window_closes() {
        let mut pacer = FramePacer::new();
        assert_eq!(pacer.average_ms(), 10);
        for _ in 0..24 {
            pacer.advance(20);
        }
        // 480ms accumulated, window still open
        assert_eq!(pacer.average_ms(), 10);
        pacer.advance(20);
        assert_eq!(pacer.average_ms(), 20);
        let stats = pacer.last_stats().unwrap();
        assert_eq!(stats.label(), "50.0fps, 20.00ms");
    }

    #[test]
    fn normalize_clamps_a_single_long_frame() {
        let mut pacer = FramePacer::new();
        pacer.normalize_next_update();
        assert_eq!(pacer.advance(3000), 10);
        // consumed: later slow frames pass through untouched
        assert_eq!(pacer.advance(3000), 3000);
    }

    #[test]
    fn normalize_keeps_short_frames() {
        let mut pacer = FramePacer::new();
        pacer.normalize_next_update();
        assert_eq!(pacer.advance(4), 4);
        assert_eq!(pacer.advance(400), 400);
    }
}
