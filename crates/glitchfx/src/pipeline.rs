//! Full per-fragment evaluation: distort, halftone, compose.
//!
//! [`shade_stages`] is the single place the stage order lives; [`shade`]
//! keeps only its final colour.

use glam::Vec2;

use crate::glitch::{distort_with_gate, glitch_gate};
use crate::halftone::{grain, grid, halftone, pulse};
use crate::palette::{base_color, color_shift, compose, gradient, Rgb};
use crate::params::GLITCH_THRESHOLD;

/// Every intermediate value produced while shading one coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTrace {
    pub uv: Vec2,
    pub time: f32,
    pub gate: f32,
    pub glitching: bool,
    pub distorted: Vec2,
    pub pulse: f32,
    pub grid: f32,
    pub grain: f32,
    pub halftone: f32,
    pub gradient: f32,
    pub color_shift: f32,
    pub base_color: Rgb,
    pub color: Rgb,
}

/// Colours the surface coordinate `uv` at frame time `time`.
pub fn shade(uv: Vec2, time: f32) -> Rgb {
    shade_stages(uv, time).color
}

/// Same as [`shade`] but keeps the intermediates.
pub fn shade_stages(uv: Vec2, time: f32) -> StageTrace {
    let gate = glitch_gate(time);
    let distorted = distort_with_gate(uv, time, gate);

    let halftone = halftone(distorted, time);
    let color = compose(distorted, time, halftone);

    let color_shift = color_shift(time);

    StageTrace {
        uv,
        time,
        gate,
        glitching: gate >= GLITCH_THRESHOLD,
        distorted,
        pulse: pulse(time),
        grid: grid(distorted, time),
        grain: grain(distorted, time),
        halftone,
        gradient: gradient(distorted),
        color_shift,
        base_color: base_color(color_shift),
        color,
    }
}
