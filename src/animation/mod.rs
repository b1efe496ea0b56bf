//! Time- and scroll-driven animation.
//!
//! This module provides:
//! - Easing curves
//! - Ring spin timeline (delay, eased full turn, pause, new random axis)
//! - Scroll trigger, parallax style mapping, and scrub smoothing
//! - Entrance tweens for the hero layers

pub mod easing;
pub mod entrance;
pub mod scroll;
pub mod spin;

pub use easing::Ease;
pub use entrance::{LayerEntrance, Tween};
pub use scroll::{parallax_style, ParallaxStyle, ScrollTrigger, ScrubSmoother, PARALLAX_TRAVEL};
pub use spin::{RingSpin, SpinPhase, SpinTiming};
