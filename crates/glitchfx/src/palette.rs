//! Red/blue base colour faded to black along a diagonal gradient.

use glam::{Vec2, Vec3};

use crate::params::{COLOR_SHIFT_RATE, GRADIENT_Y_WEIGHT};

/// Linear colour with three channels; opacity is always `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb(pub Vec3);

impl Rgb {
    pub const RED: Self = Self(Vec3::new(1.0, 0.0, 0.0));
    pub const BLUE: Self = Self(Vec3::new(0.0, 0.0, 1.0));
    pub const BLACK: Self = Self(Vec3::ZERO);

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self(Vec3::new(r, g, b))
    }

    pub fn r(self) -> f32 {
        self.0.x
    }

    pub fn g(self) -> f32 {
        self.0.y
    }

    pub fn b(self) -> f32 {
        self.0.z
    }

    /// Component-wise `mix(self, other, t)`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self(self.0 * (1.0 - t) + other.0 * t)
    }

    pub fn to_rgba(self) -> [f32; 4] {
        [self.0.x, self.0.y, self.0.z, 1.0]
    }

    /// Quantises to 8-bit RGBA, clamping out-of-range channels.
    pub fn to_rgba8(self) -> [u8; 4] {
        let quantise = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantise(self.0.x), quantise(self.0.y), quantise(self.0.z), 255]
    }

    /// True when every channel lies in `[0, 1]`.
    pub fn is_normalised(self) -> bool {
        self.0.cmpge(Vec3::ZERO).all() && self.0.cmple(Vec3::ONE).all()
    }
}

/// Diagonal ramp `x + 0.5 * y`, from `0` at the bottom-left to `1.5` at the top-right.
#[inline]
pub fn gradient(uv: Vec2) -> f32 {
    uv.x + uv.y * GRADIENT_Y_WEIGHT
}

/// Red-to-blue blend factor, oscillating in `[0, 1]`.
#[inline]
pub fn color_shift(time: f32) -> f32 {
    (time * COLOR_SHIFT_RATE).sin() * 0.5 + 0.5
}

pub fn base_color(shift: f32) -> Rgb {
    Rgb::RED.lerp(Rgb::BLUE, shift)
}

/// Darkens the base colour by `gradient * halftone`.
pub fn compose(uv: Vec2, time: f32, halftone: f32) -> Rgb {
    let base = base_color(color_shift(time));
    base.lerp(Rgb::BLACK, gradient(uv) * halftone)
}
