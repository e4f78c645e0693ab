//! Trigonometric pseudo-random hash.
//!
//! This is the classic shader one-liner, not a statistically sound
//! generator. Results depend on how the platform evaluates `sin` at large
//! magnitudes, so two math libraries can disagree in the low bits; callers
//! compare outputs with tolerances rather than exact golden values.
//!
//! The scaled sine reaches about `4e4`, where neighbouring `f32` values are
//! `1/256` apart, so most results are multiples of `1/256` and nearby cells
//! can collide.

use glam::Vec2;

use crate::fract;
use crate::params::{HASH_SCALE, HASH_WEIGHTS};

/// Hashes a 2D coordinate into `[0, 1)`.
#[inline]
pub fn random(st: Vec2) -> f32 {
    let dot = st.dot(Vec2::from(HASH_WEIGHTS));
    fract(dot.sin() * HASH_SCALE)
}

/// Hashes a scalar into `[0, 1)`.
#[inline]
pub fn random_scalar(x: f32) -> f32 {
    fract(x.sin() * HASH_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_is_deterministic() {
        let point = Vec2::new(3.25, -17.5);
        let first = random(point);
        for _ in 0..8 {
            assert_eq!(random(point).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn random_stays_in_unit_interval() {
        for ix in -20..20 {
            for iy in -20..20 {
                let value = random(Vec2::new(ix as f32 * 0.37, iy as f32 * 1.13));
                assert!((0.0..1.0).contains(&value), "{value} out of range");
            }
        }
    }

    #[test]
    fn random_at_origin_is_zero() {
        // sin(0) == 0 exactly, so the hash collapses to fract(0).
        assert_eq!(random(Vec2::ZERO), 0.0);
        assert_eq!(random_scalar(0.0), 0.0);
    }

    #[test]
    fn lattice_spreads_over_many_values() {
        let mut seen = std::collections::BTreeSet::new();
        for ix in 0..32 {
            for iy in 0..32 {
                seen.insert(random(Vec2::new(ix as f32, iy as f32)).to_bits());
            }
        }
        assert!(seen.len() > 100, "only {} distinct values", seen.len());
    }

    #[test]
    fn scalar_hash_stays_in_unit_interval() {
        for step in 0..500 {
            let value = random_scalar(step as f32 * 0.05);
            assert!((0.0..1.0).contains(&value));
        }
    }
}
