//! Pulsing dot grid blended with drifting grain.

use glam::Vec2;

use crate::noise::value_noise;
use crate::params::{
    GRID_DRIFT, GRID_SCALE, GRID_THRESHOLD, NOISE_BLEND, NOISE_DRIFT, NOISE_SCALE,
    PULSE_AMPLITUDE, PULSE_RATE,
};
use crate::{mix, modulo, step};

/// Grid density factor, oscillating in `[0.5, 1.5]`.
#[inline]
pub fn pulse(time: f32) -> f32 {
    1.0 + (time * PULSE_RATE).sin() * PULSE_AMPLITUDE
}

/// Thresholds one axis of the grid: `step(0.5, mod(c * 40 * pulse + time * 5, 1))`.
#[inline]
fn grid_axis(coordinate: f32, density: f32, time: f32) -> f32 {
    step(
        GRID_THRESHOLD,
        modulo(coordinate * (GRID_SCALE * density) + time * GRID_DRIFT, 1.0),
    )
}

/// Checkerboard-like dot mask, either `0.0` or `1.0`.
pub fn grid(uv: Vec2, time: f32) -> f32 {
    let density = pulse(time);
    grid_axis(uv.x, density, time) * grid_axis(uv.y, density, time)
}

/// Animated value-noise grain in `[0, 1]`.
pub fn grain(uv: Vec2, time: f32) -> f32 {
    value_noise(uv * NOISE_SCALE + Vec2::splat(time * NOISE_DRIFT))
}

/// Final halftone scalar: grid and grain blended 3:1.
pub fn halftone(uv: Vec2, time: f32) -> f32 {
    mix(grid(uv, time), grain(uv, time), NOISE_BLEND)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::fract;

    #[test]
    fn pulse_oscillates_between_half_and_one_and_a_half() {
        for step in 0..500 {
            let value = pulse(step as f32 * 0.031);
            assert!((0.5..=1.5).contains(&value));
        }
        assert_eq!(pulse(0.0), 1.0);
        assert_abs_diff_eq!(pulse(std::f32::consts::FRAC_PI_4), 1.5, epsilon = 1e-6);
    }

    #[test]
    fn grid_at_time_zero_thresholds_forty_cells() {
        for ix in 0..37 {
            for iy in 0..37 {
                let uv = Vec2::new(ix as f32 / 37.0, iy as f32 / 37.0);
                let expected =
                    step(0.5, fract(40.0 * uv.x)) * step(0.5, fract(40.0 * uv.y));
                assert_eq!(grid(uv, 0.0), expected, "uv = {uv:?}");
            }
        }
    }

    #[test]
    fn grid_is_binary() {
        for step in 0..300 {
            let uv = Vec2::new(step as f32 / 300.0, 1.0 - step as f32 / 300.0);
            let value = grid(uv, step as f32 * 0.01);
            assert!(value == 0.0 || value == 1.0);
        }
    }

    #[test]
    fn halftone_at_time_zero_weights_noise_by_a_quarter() {
        let uv = Vec2::new(0.0125, 0.0125);
        let expected = 0.75 * grid(uv, 0.0) + 0.25 * grain(uv, 0.0);
        assert_abs_diff_eq!(halftone(uv, 0.0), expected, epsilon = 1e-6);
    }

    #[test]
    fn halftone_stays_in_unit_interval() {
        for ix in 0..40 {
            for step in 0..10 {
                let uv = Vec2::new(ix as f32 / 40.0, (ix * 7 % 40) as f32 / 40.0);
                let value = halftone(uv, step as f32 * 0.29);
                assert!((0.0..=1.0).contains(&value), "{value} out of range");
            }
        }
    }

    #[test]
    fn grid_phase_drifts_with_time() {
        // One tenth of a time unit shifts the grid by half a cell.
        let uv = Vec2::new(0.0, 0.0);
        assert_eq!(grid(uv, 0.0), 0.0);
        let later = grid(uv, 0.1);
        let density = pulse(0.1);
        let expected = step(0.5, modulo(0.1 * GRID_DRIFT, 1.0)).powi(2);
        assert_eq!(later, expected);
        assert!(density > 1.0);
    }
}
