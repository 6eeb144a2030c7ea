//! Synthetic lens ensembles with a known true H0.
//!
//! Each mock lens is drawn as follows:
//!
//! - quad with probability `quad_fraction`, otherwise a double
//! - true delays `dt ~ 20 + 2·N(0,1)` days
//! - normalization `Q ~ 4e5 + 0.5e5·N(0,1)` km/s
//! - true Fermat potential differences `ΔFP = c·dt·H0/Q`
//! - measurement error `σ = ΔFP · pct/100`, observed `ΔFP + σ·N(0,1)`
//! - posterior samples `dt + dt_sigma·N(0,1)`

use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use slcosmo_core::likelihood::predicted_delta_fp;
use slcosmo_core::{ImageCount, InferenceError, LensEnsemble};

/// True H0 used by default when generating mock data.
pub const DEFAULT_TRUE_H0: f64 = 72.3;

/// Fraction of mock lenses that are quads.
pub const DEFAULT_QUAD_FRACTION: f64 = 0.17;

/// Parameters of a mock dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockConfig {
    /// Number of lens systems. Default: 10.
    pub num_lenses: usize,
    /// Posterior time-delay samples per lens. Default: 100.
    pub num_samples: usize,
    /// Fermat potential error as a percentage of its true value. Default: 4.0.
    pub percentage_dfp_err: f64,
    /// Width of the posterior time-delay samples, in days. Default: 2.0.
    pub dt_sigma: f64,
    /// Probability that a lens has four images. Default: 0.17.
    pub quad_fraction: f64,
    /// H0 the data are generated from. Default: 72.3.
    pub true_h0: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            num_lenses: 10,
            num_samples: 100,
            percentage_dfp_err: 4.0,
            dt_sigma: 2.0,
            quad_fraction: DEFAULT_QUAD_FRACTION,
            true_h0: DEFAULT_TRUE_H0,
        }
    }
}

impl MockConfig {
    /// Mock config with the given lens and sample counts.
    pub fn new(num_lenses: usize, num_samples: usize) -> Self {
        Self {
            num_lenses,
            num_samples,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), InferenceError> {
        if self.num_lenses == 0 {
            return Err(InferenceError::invalid("num_lenses must be > 0"));
        }
        if self.num_samples < 2 {
            return Err(InferenceError::invalid(format!(
                "num_samples must be > 1, got {}",
                self.num_samples
            )));
        }
        if !(self.percentage_dfp_err.is_finite() && self.percentage_dfp_err > 0.0) {
            return Err(InferenceError::invalid(format!(
                "percentage_dfp_err must be > 0, got {}",
                self.percentage_dfp_err
            )));
        }
        if !(self.dt_sigma.is_finite() && self.dt_sigma > 0.0) {
            return Err(InferenceError::invalid(format!(
                "dt_sigma must be > 0, got {}",
                self.dt_sigma
            )));
        }
        if !(0.0..=1.0).contains(&self.quad_fraction) {
            return Err(InferenceError::invalid(format!(
                "quad_fraction must be in [0, 1], got {}",
                self.quad_fraction
            )));
        }
        if !(self.true_h0.is_finite() && self.true_h0 > 0.0) {
            return Err(InferenceError::invalid(format!(
                "true_h0 must be > 0, got {}",
                self.true_h0
            )));
        }
        Ok(())
    }
}

/// Mock lenses plus the truth they were generated from.
#[derive(Debug, Clone)]
pub struct MockDataset {
    /// Generated lens ensembles.
    pub lenses: Vec<LensEnsemble>,
    /// The H0 used to generate them.
    pub true_h0: f64,
}

fn normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// RNG for mock data derived from `seed`.
///
/// Jumps 2^192 steps ahead of `Xoshiro256PlusPlus::seed_from_u64(seed)`, the
/// stream the prior draw uses, so the two never overlap for the same seed.
pub fn mock_rng(seed: u64) -> Xoshiro256PlusPlus {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    rng.long_jump();
    rng
}

/// Generate a mock dataset.
///
/// # Errors
///
/// Returns `InvalidParameter` for out-of-range config values.
pub fn generate_mock_lenses<R: Rng + ?Sized>(
    config: &MockConfig,
    rng: &mut R,
) -> Result<MockDataset, InferenceError> {
    config.validate()?;

    let lenses = (0..config.num_lenses)
        .map(|_| generate_lens(config, rng))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MockDataset {
        lenses,
        true_h0: config.true_h0,
    })
}

fn generate_lens<R: Rng + ?Sized>(
    config: &MockConfig,
    rng: &mut R,
) -> Result<LensEnsemble, InferenceError> {
    let images = if rng.random::<f64>() < config.quad_fraction {
        ImageCount::Quad
    } else {
        ImageCount::Double
    };
    let num_delays = images.num_delays();

    let dt_true: Vec<f64> = (0..num_delays).map(|_| 20.0 + 2.0 * normal(rng)).collect();
    // An 8σ downward fluctuation would make Q negative; clamp far out in the tail.
    let q = (4.0e5 + 0.5e5 * normal(rng)).max(1.0e4);

    let fp_true: Vec<f64> = dt_true
        .iter()
        .map(|&dt| predicted_delta_fp(dt, config.true_h0, q))
        .collect();
    // Delays near zero would give a vanishing error bar.
    let fp_err: Vec<f64> = fp_true
        .iter()
        .map(|fp| (fp.abs() * config.percentage_dfp_err / 100.0).max(f64::MIN_POSITIVE))
        .collect();
    let fp_obs: Vec<f64> = fp_true
        .iter()
        .zip(&fp_err)
        .map(|(fp, err)| fp + err * normal(rng))
        .collect();

    let mut samples = Vec::with_capacity(config.num_samples * num_delays);
    for _ in 0..config.num_samples {
        for &dt in &dt_true {
            samples.push(dt + config.dt_sigma * normal(rng));
        }
    }

    LensEnsemble::from_flat(images, fp_obs, fp_err, q, samples, config.num_samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_shapes() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let data = generate_mock_lenses(&MockConfig::new(25, 40), &mut rng).unwrap();

        assert_eq!(data.lenses.len(), 25);
        assert_eq!(data.true_h0, DEFAULT_TRUE_H0);
        for lens in &data.lenses {
            assert_eq!(lens.num_samples(), 40);
            assert!(lens.num_images() == 2 || lens.num_images() == 4);
        }
    }

    #[test]
    fn test_mock_all_quads() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let config = MockConfig {
            quad_fraction: 1.0,
            ..MockConfig::new(5, 10)
        };
        let data = generate_mock_lenses(&config, &mut rng).unwrap();
        assert!(data.lenses.iter().all(|l| l.num_delays() == 3));
    }

    #[test]
    fn test_mock_error_is_percentage() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let config = MockConfig {
            percentage_dfp_err: 4.0,
            ..MockConfig::new(20, 5)
        };
        let data = generate_mock_lenses(&config, &mut rng).unwrap();
        for lens in &data.lenses {
            for (obs, err) in lens.delta_fp_obs().iter().zip(lens.delta_fp_err()) {
                // Observed values scatter around truth by a few σ = 4%.
                let ratio = err / obs;
                assert!(ratio > 0.02 && ratio < 0.08, "err/obs = {}", ratio);
            }
        }
    }

    #[test]
    fn test_mock_rejects_bad_config() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        assert!(generate_mock_lenses(&MockConfig::new(0, 10), &mut rng).is_err());
        assert!(generate_mock_lenses(&MockConfig::new(3, 1), &mut rng).is_err());

        let config = MockConfig {
            dt_sigma: 0.0,
            ..MockConfig::default()
        };
        assert!(generate_mock_lenses(&config, &mut rng).is_err());
    }

    #[test]
    fn test_mock_reproducible() {
        let config = MockConfig::new(8, 20);
        let a = generate_mock_lenses(&config, &mut Xoshiro256PlusPlus::seed_from_u64(9)).unwrap();
        let b = generate_mock_lenses(&config, &mut Xoshiro256PlusPlus::seed_from_u64(9)).unwrap();
        assert_eq!(a.lenses, b.lenses);
    }
}
