//! Frame shader pipeline for the glitch sphere.
//!
//! Every pixel of the sphere is coloured by a pure function of its surface
//! coordinate and the frame time. The stages run in a fixed order:
//!
//! ```text
//!   uv, time ──▶ glitch (distort x) ──▶ halftone (grid + noise) ──▶ palette (red/blue over black)
//! ```
//!
//! The GPU fragment shader in the `renderer` crate is generated from the same
//! constants in [`params`], so this crate doubles as the reference used to
//! check what the shader should be drawing.

pub mod glitch;
pub mod halftone;
pub mod hash;
pub mod noise;
pub mod palette;
pub mod params;
pub mod pipeline;

pub use glam::Vec2;
pub use palette::Rgb;
pub use pipeline::{shade, shade_stages, StageTrace};

/// GLSL `fract`: `x - floor(x)`, always in `[0, 1)` for finite input.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL `mod` for floats; the result takes the sign of `y`.
#[inline]
pub fn modulo(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

/// GLSL `step`: `0.0` when `x < edge`, otherwise `1.0`.
#[inline]
pub fn step(edge: f32, x: f32) -> f32 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

/// GLSL `mix` for scalars.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}
