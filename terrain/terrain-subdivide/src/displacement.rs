//! Displacement-magnitude schedule.
//!
//! Each refinement halves the displacement scale `s`; a new midpoint is moved
//! vertically by `g * s * 2^(-s)` with `g` a standard normal draw. Finer
//! levels therefore displace less, which gives the fractal roughness profile.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Standard deviation of the vertical offset at displacement scale `scale`.
///
/// # Example
///
/// ```
/// use terrain_subdivide::displacement::amplitude;
///
/// assert!((amplitude(1.0) - 0.5).abs() < 1e-12);
/// assert!(amplitude(0.5) < amplitude(1.0));
/// ```
#[inline]
#[must_use]
pub fn amplitude(scale: f64) -> f64 {
    scale * (-scale).exp2()
}

/// Displacement scale after `level` refinements from `initial_scale`.
#[inline]
#[must_use]
pub fn scale_at_level(initial_scale: f64, level: u32) -> f64 {
    initial_scale * (-f64::from(level)).exp2()
}

/// Standard deviation applied by the refinement that produces `level + 1`.
#[inline]
#[must_use]
pub fn amplitude_at_level(initial_scale: f64, level: u32) -> f64 {
    amplitude(scale_at_level(initial_scale, level))
}

/// Draw one vertical offset for a new midpoint.
pub fn sample<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    let g: f64 = StandardNormal.sample(rng);
    g * amplitude(scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_scale_halves_per_level() {
        assert_relative_eq!(scale_at_level(1.0, 0), 1.0);
        assert_relative_eq!(scale_at_level(1.0, 1), 0.5);
        assert_relative_eq!(scale_at_level(1.5, 3), 0.1875);
    }

    #[test]
    fn test_amplitude_decays() {
        for initial in [0.25, 1.0, 1.9] {
            let mut previous = amplitude_at_level(initial, 0);
            for level in 1..12 {
                let current = amplitude_at_level(initial, level);
                assert!(
                    current < previous,
                    "level {level} from {initial}: {current} >= {previous}"
                );
                previous = current;
            }
        }
    }

    #[test]
    fn test_sample_is_deterministic_for_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            assert_relative_eq!(sample(&mut a, 1.0), sample(&mut b, 1.0));
        }
    }

    #[test]
    fn test_sample_spread_matches_amplitude() {
        let mut rng = StdRng::seed_from_u64(1234);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| sample(&mut rng, 1.0)).collect();

        #[allow(clippy::cast_precision_loss)]
        let len = n as f64;
        let mean = draws.iter().sum::<f64>() / len;
        let var = draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / len;

        assert!(mean.abs() < 0.02, "mean {mean}");
        assert_relative_eq!(var.sqrt(), amplitude(1.0), epsilon = 0.02);
    }

    #[test]
    fn test_zero_scale_never_moves() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..8 {
            assert_relative_eq!(sample(&mut rng, 0.0), 0.0);
        }
    }
}
