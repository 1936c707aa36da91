//! Animation primitives: springs, timing curves and shared controls

pub mod controls;
pub mod easing;
pub mod spring;

pub use controls::{AnimationControls, ControlCommand, Variant};
pub use easing::{blink_opacity, CubicBezier, EASE, LINEAR};
pub use spring::{Spring, SpringTransition};
