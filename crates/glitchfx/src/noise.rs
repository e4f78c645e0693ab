//! Single-octave value noise over the integer lattice.

use glam::Vec2;

use crate::hash::random;
use crate::mix;

/// Hermite ease `f*f*(3-2f)`, zero slope at both ends of the cell.
#[inline]
pub fn smooth_weight(f: f32) -> f32 {
    f * f * (3.0 - 2.0 * f)
}

/// Bilinear blend of the four lattice hashes around `st`, eased per axis.
///
/// Output is in `[0, 1]`. On lattice points the weights vanish and the
/// result is exactly `random(st)`.
pub fn value_noise(st: Vec2) -> f32 {
    let cell = st.floor();
    let local = st - cell;

    let a = random(cell);
    let b = random(cell + Vec2::new(1.0, 0.0));
    let c = random(cell + Vec2::new(0.0, 1.0));
    let d = random(cell + Vec2::new(1.0, 1.0));

    let ux = smooth_weight(local.x);
    let uy = smooth_weight(local.y);

    mix(mix(a, b, ux), mix(c, d, ux), uy)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn smooth_weight_endpoints() {
        assert_eq!(smooth_weight(0.0), 0.0);
        assert_eq!(smooth_weight(1.0), 1.0);
        assert_abs_diff_eq!(smooth_weight(0.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn lattice_points_reduce_to_hash() {
        for ix in -5..5 {
            for iy in -5..5 {
                let point = Vec2::new(ix as f32, iy as f32);
                assert_eq!(value_noise(point).to_bits(), random(point).to_bits());
            }
        }
    }

    #[test]
    fn noise_stays_in_unit_interval() {
        for step in 0..400 {
            let t = step as f32 * 0.173;
            let value = value_noise(Vec2::new(t, t * 0.61 + 3.0));
            assert!((0.0..=1.0).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn noise_is_continuous_across_cell_edges() {
        let edge = Vec2::new(7.0, 2.25);
        let left = value_noise(edge - Vec2::new(1e-3, 0.0));
        let right = value_noise(edge + Vec2::new(1e-3, 0.0));
        assert_abs_diff_eq!(left, right, epsilon = 1e-2);
    }

    #[test]
    fn noise_midpoint_averages_corners() {
        let cell = Vec2::new(4.0, 9.0);
        let expected = (random(cell)
            + random(cell + Vec2::X)
            + random(cell + Vec2::Y)
            + random(cell + Vec2::ONE))
            / 4.0;
        assert_abs_diff_eq!(
            value_noise(cell + Vec2::splat(0.5)),
            expected,
            epsilon = 1e-5
        );
    }
}
