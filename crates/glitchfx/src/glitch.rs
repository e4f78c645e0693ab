//! Intermittent horizontal tearing.
//!
//! The gate is hashed from time alone, so a frame either glitches on every
//! pixel or on none. That produces discrete "glitch frames" instead of a
//! constant wobble.

use glam::Vec2;

use crate::hash::random_scalar;
use crate::params::{
    GLITCH_AMPLITUDE, GLITCH_GATE_RATE, GLITCH_THRESHOLD, GLITCH_WAVE_FREQUENCY,
    GLITCH_WAVE_SPEED,
};
use crate::step;

/// Per-frame gate value in `[0, 1)`.
#[inline]
pub fn glitch_gate(time: f32) -> f32 {
    random_scalar(time * GLITCH_GATE_RATE)
}

/// True when the frame at `time` gets the horizontal offset.
pub fn is_glitch_frame(time: f32) -> bool {
    glitch_gate(time) >= GLITCH_THRESHOLD
}

/// Horizontal displacement before gating.
#[inline]
pub fn glitch_offset(uv: Vec2, time: f32) -> f32 {
    (uv.y * GLITCH_WAVE_FREQUENCY + time * GLITCH_WAVE_SPEED).sin() * GLITCH_AMPLITUDE
}

/// Applies the offset to `uv.x` when `gate` clears the threshold.
pub fn distort_with_gate(uv: Vec2, time: f32, gate: f32) -> Vec2 {
    let enabled = step(GLITCH_THRESHOLD, gate);
    Vec2::new(uv.x + enabled * glitch_offset(uv, time), uv.y)
}

/// Distorts `uv` using the gate derived from `time`.
pub fn distort(uv: Vec2, time: f32) -> Vec2 {
    distort_with_gate(uv, time, glitch_gate(time))
}
