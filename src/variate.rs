// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Queue Arena - Exponential Variates
//
// Inverse-transform sampling: X = -ln(1 - U) / rate, U uniform on [0, 1).

use rand::Rng;
use serde::Serialize;

/// Draw one exponential sample with the given `rate` (mean `1 / rate`).
pub fn exponential<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> f64 {
    let u: f64 = rng.gen();
    from_uniform(u, rate)
}

/// Map a uniform draw to an exponential sample.
///
/// `1 - u` is clamped to the smallest positive normal so a source that can
/// return exactly 1.0 yields a large finite value instead of infinity.
pub fn from_uniform(u: f64, rate: f64) -> f64 {
    let tail = (1.0 - u).max(f64::MIN_POSITIVE);
    -tail.ln() / rate
}

// ─── Sample moments ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SampleMoments {
    pub rate: f64,
    pub samples: usize,
    pub mean: f64,
    pub variance: f64,
    pub expected_mean: f64,
    pub expected_variance: f64,
}

/// Draw `n` samples and compare their moments with `1/rate` and `1/rate²`.
pub fn sample_moments<R: Rng + ?Sized>(rng: &mut R, rate: f64, n: usize) -> SampleMoments {
    let draws: Vec<f64> = (0..n).map(|_| exponential(rng, rate)).collect();
    let mean = if n > 0 { draws.iter().sum::<f64>() / n as f64 } else { 0.0 };
    // Population variance (divides by n).
    let variance = if n > 0 {
        draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64
    } else {
        0.0
    };
    SampleMoments {
        rate,
        samples: n,
        mean,
        variance,
        expected_mean: 1.0 / rate,
        expected_variance: (1.0 / rate).powi(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn boundary_uniform_stays_finite() {
        let x = from_uniform(1.0, 75.0);
        assert!(x.is_finite());
        assert!(x > 0.0);
        assert_eq!(from_uniform(0.0, 75.0), 0.0);
    }

    #[test]
    fn inverse_transform_matches_closed_form() {
        let x = from_uniform(0.5, 2.0);
        assert!((x - std::f64::consts::LN_2 / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_moments() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let m = sample_moments(&mut rng, 75.0, 100_000);
        let rel_mean = (m.mean - m.expected_mean).abs() / m.expected_mean;
        let rel_var = (m.variance - m.expected_variance).abs() / m.expected_variance;
        assert!(rel_mean < 0.02, "mean {} far from {}", m.mean, m.expected_mean);
        assert!(rel_var < 0.05, "variance {} far from {}", m.variance, m.expected_variance);
    }

    #[test]
    fn samples_are_non_negative() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!((0..10_000).all(|_| {
            let x = exponential(&mut rng, 0.001);
            x.is_finite() && x >= 0.0
        }));
    }
}
