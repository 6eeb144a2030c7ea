//! Gaussian prior over H0 and the sampler that draws importance-sampling candidates.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::constants::{
    DEFAULT_H0_PRIOR_MEAN, DEFAULT_H0_PRIOR_WIDTH, LN_SQRT_2PI, MIN_PRIOR_SAMPLES,
};
use crate::error::{InferenceError, Result};

/// Normal(mean, width) prior on H0, in km/s/Mpc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaussianPrior {
    mean: f64,
    width: f64,
}

impl Default for GaussianPrior {
    fn default() -> Self {
        Self {
            mean: DEFAULT_H0_PRIOR_MEAN,
            width: DEFAULT_H0_PRIOR_WIDTH,
        }
    }
}

impl GaussianPrior {
    /// Create a prior, rejecting a non-finite mean or a width that is not > 0.
    pub fn new(mean: f64, width: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(InferenceError::invalid(format!(
                "prior mean must be finite, got {}",
                mean
            )));
        }
        if !(width.is_finite() && width > 0.0) {
            return Err(InferenceError::invalid(format!(
                "prior width must be > 0, got {}",
                width
            )));
        }
        Ok(Self { mean, width })
    }

    /// Prior mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Prior width (1σ).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Draw `n` independent candidates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `n <= MIN_PRIOR_SAMPLES`.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>> {
        if n <= MIN_PRIOR_SAMPLES {
            return Err(InferenceError::invalid(format!(
                "number of prior samples must be > {}, got {}",
                MIN_PRIOR_SAMPLES, n
            )));
        }
        let normal = Normal::new(self.mean, self.width)
            .map_err(|e| InferenceError::invalid(format!("prior distribution: {}", e)))?;
        Ok(normal.sample_iter(rng).take(n).collect())
    }

    /// Prior log-density at `h0`.
    pub fn log_density(&self, h0: f64) -> f64 {
        crate::math::gaussian_log_density(h0, self.mean, self.width)
    }

    /// Prior density at `h0`.
    pub fn density(&self, h0: f64) -> f64 {
        let z = (h0 - self.mean) / self.width;
        (-0.5 * z * z - LN_SQRT_2PI).exp() / self.width
    }
}

/// Draw `n` H0 candidates from Normal(`mean`, `width`).
///
/// # Errors
///
/// Returns `InvalidParameter` if `n <= MIN_PRIOR_SAMPLES` or `width <= 0`.
pub fn sample_prior<R: Rng + ?Sized>(
    n: usize,
    mean: f64,
    width: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    GaussianPrior::new(mean, width)?.sample(n, rng)
}
