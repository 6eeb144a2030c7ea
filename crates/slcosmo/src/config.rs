//! Configuration for an H0 inference run.

use serde::{Deserialize, Serialize};

use slcosmo_core::constants::{
    DEFAULT_H0_PRIOR_MEAN, DEFAULT_H0_PRIOR_WIDTH, DEFAULT_PRIOR_SAMPLES, DEFAULT_SEED,
    MIN_PRIOR_SAMPLES,
};
use slcosmo_core::{GaussianPrior, InferenceError};

/// Configuration options for [`SLCosmo`](crate::SLCosmo).
///
/// Builder methods panic on out-of-range values so mistakes surface at the
/// call site. Configs that arrive through deserialization should be checked
/// with [`Config::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Prior
    // =========================================================================
    /// Mean of the Gaussian H0 prior (km/s/Mpc). Default: 70.0.
    pub h0_prior_mean: f64,

    /// Width (1σ) of the Gaussian H0 prior (km/s/Mpc). Default: 7.0.
    pub h0_prior_width: f64,

    /// Number of H0 candidates drawn from the prior. Must exceed 20.
    /// Default: 1,000.
    pub num_prior_samples: usize,

    // =========================================================================
    // Execution
    // =========================================================================
    /// Seed for the prior draw. Same seed + same lenses = same posterior.
    pub seed: u64,

    /// Evaluate prior samples on the rayon pool. Default: true.
    ///
    /// Output is identical either way; this only affects wall-clock time.
    pub parallel: bool,

    // =========================================================================
    // Reporting
    // =========================================================================
    /// H0 axis range `(lo, hi)` for the posterior histogram. Default: (60, 80).
    pub histogram_range: (f64, f64),

    /// Number of histogram bins. Default: 40.
    pub histogram_bins: usize,

    /// Warn when the effective sample size falls below this fraction of
    /// the prior sample count. Default: 0.1.
    pub min_efficiency: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            h0_prior_mean: DEFAULT_H0_PRIOR_MEAN,
            h0_prior_width: DEFAULT_H0_PRIOR_WIDTH,
            num_prior_samples: DEFAULT_PRIOR_SAMPLES,
            seed: DEFAULT_SEED,
            parallel: true,
            histogram_range: (60.0, 80.0),
            histogram_bins: 40,
            min_efficiency: 0.1,
        }
    }
}

impl Config {
    /// Set the prior mean.
    ///
    /// # Panics
    ///
    /// Panics if `mean` is not finite.
    pub fn prior_mean(mut self, mean: f64) -> Self {
        assert!(mean.is_finite(), "h0_prior_mean must be finite");
        self.h0_prior_mean = mean;
        self
    }

    /// Set the prior width.
    ///
    /// # Panics
    ///
    /// Panics if `width <= 0` or is not finite.
    pub fn prior_width(mut self, width: f64) -> Self {
        assert!(
            width.is_finite() && width > 0.0,
            "h0_prior_width must be > 0"
        );
        self.h0_prior_width = width;
        self
    }

    /// Set the number of prior samples.
    ///
    /// # Panics
    ///
    /// Panics if `n <= 20`.
    pub fn num_prior_samples(mut self, n: usize) -> Self {
        assert!(n > MIN_PRIOR_SAMPLES, "num_prior_samples must be > 20");
        self.num_prior_samples = n;
        self
    }

    /// Set the RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable parallel evaluation.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Set the histogram range and bin count.
    ///
    /// # Panics
    ///
    /// Panics if `lo >= hi` or `bins == 0`.
    pub fn histogram(mut self, lo: f64, hi: f64, bins: usize) -> Self {
        assert!(lo < hi, "histogram range must satisfy lo < hi");
        assert!(bins > 0, "histogram_bins must be > 0");
        self.histogram_range = (lo, hi);
        self.histogram_bins = bins;
        self
    }

    /// The configured prior.
    pub fn prior(&self) -> Result<GaussianPrior, InferenceError> {
        GaussianPrior::new(self.h0_prior_mean, self.h0_prior_width)
    }

    /// Check every field without panicking.
    pub fn validate(&self) -> Result<(), InferenceError> {
        self.prior()?;
        if self.num_prior_samples <= MIN_PRIOR_SAMPLES {
            return Err(InferenceError::invalid(format!(
                "num_prior_samples must be > {}, got {}",
                MIN_PRIOR_SAMPLES, self.num_prior_samples
            )));
        }
        let (lo, hi) = self.histogram_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(InferenceError::invalid(format!(
                "histogram range must satisfy lo < hi, got ({}, {})",
                lo, hi
            )));
        }
        if self.histogram_bins == 0 {
            return Err(InferenceError::invalid("histogram_bins must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.min_efficiency) {
            return Err(InferenceError::invalid(format!(
                "min_efficiency must be in [0, 1], got {}",
                self.min_efficiency
            )));
        }
        Ok(())
    }
}
