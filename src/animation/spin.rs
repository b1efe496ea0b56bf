//! Periodic ring spin with a randomized axis per cycle.

use super::Ease;
use crate::rng::Rng;
use glam::{Quat, Vec3};
use std::f32::consts::TAU;

/// Timing of a ring spin cycle, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTiming {
    /// Wait before the first cycle.
    pub delay: f32,
    /// Length of one full turn.
    pub duration: f32,
    /// Rest between turns.
    pub pause: f32,
    pub ease: Ease,
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self {
            delay: 3.0,
            duration: 7.0,
            pause: 5.0,
            ease: Ease::SineInOut,
        }
    }
}

impl SpinTiming {
    pub fn period(&self) -> f32 {
        self.duration + self.pause
    }
}

/// Phase of a spin at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinPhase {
    Waiting,
    Turning { cycle: u64, progress: f32 },
    Resting { cycle: u64 },
}

/// A ring's repeating full-turn animation.
///
/// Each cycle rotates 360 degrees about a freshly drawn unit axis, so the
/// orientation is identity again at every cycle boundary and swapping the
/// axis never causes a jump.
#[derive(Debug, Clone)]
pub struct RingSpin {
    timing: SpinTiming,
    rng: Rng,
    axis: Vec3,
    cycle: u64,
    killed: bool,
}

impl RingSpin {
    pub fn new(timing: SpinTiming, mut rng: Rng) -> Self {
        let axis = rng.unit_vector();
        Self {
            timing,
            rng,
            axis,
            cycle: 0,
            killed: false,
        }
    }

    pub fn timing(&self) -> &SpinTiming {
        &self.timing
    }

    /// Axis of the current (or most recent) cycle.
    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Stop the spin; subsequent samples return identity.
    pub fn kill(&mut self) {
        self.killed = true;
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// Phase at `elapsed` seconds since the scene started.
    pub fn phase(&self, elapsed: f32) -> SpinPhase {
        let local = elapsed - self.timing.delay;
        if self.killed || local < 0.0 {
            return SpinPhase::Waiting;
        }
        let period = self.timing.period().max(f32::EPSILON);
        let cycle = (local / period).floor() as u64;
        let t = local - cycle as f32 * period;
        if t < self.timing.duration {
            SpinPhase::Turning {
                cycle,
                progress: t / self.timing.duration,
            }
        } else {
            SpinPhase::Resting { cycle }
        }
    }

    /// Rotation at `elapsed` seconds. Advances the axis when a new cycle starts.
    pub fn sample(&mut self, elapsed: f32) -> Quat {
        match self.phase(elapsed) {
            SpinPhase::Waiting => Quat::IDENTITY,
            SpinPhase::Resting { cycle } => {
                self.advance_to(cycle);
                Quat::IDENTITY
            }
            SpinPhase::Turning { cycle, progress } => {
                self.advance_to(cycle);
                let angle = self.timing.ease.apply(progress) * TAU;
                Quat::from_axis_angle(self.axis, angle)
            }
        }
    }

    fn advance_to(&mut self, cycle: u64) {
        while self.cycle < cycle {
            self.axis = self.rng.unit_vector();
            self.cycle += 1;
        }
    }
}
