//! Self-rescheduling per-frame loop.
//!
//! The loop never sleeps or blocks; the caller drives it with monotonic
//! timestamps and it yields a tick for each frame while running.

use std::time::Duration;

/// Lifecycle of a frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
    Cancelled,
}

/// One scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    pub index: u64,
    /// Seconds since the loop started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
}

/// Per-frame loop state machine.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    state: LoopState,
    started_at: Duration,
    last: Option<Duration>,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the loop at `now`.
    pub fn start(&mut self, now: Duration) {
        self.state = LoopState::Running;
        self.started_at = now;
        self.last = None;
        self.frames = 0;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether another frame callback is scheduled.
    pub fn is_scheduled(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. Returns `None` unless the loop is running.
    pub fn advance(&mut self, now: Duration) -> Option<FrameTick> {
        if self.state != LoopState::Running {
            return None;
        }
        let now = now.max(self.started_at);
        let delta = self
            .last
            .map(|last| now.saturating_sub(last).as_secs_f32())
            .unwrap_or(0.0);
        let tick = FrameTick {
            index: self.frames,
            elapsed: (now - self.started_at).as_secs_f32(),
            delta,
        };
        self.last = Some(now);
        self.frames += 1;
        Some(tick)
    }

    /// Cancel the pending frame. A cancelled loop only runs again after `start`.
    pub fn cancel(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Cancelled;
        }
    }
}
