//! Output of an inference run.

use serde::Serialize;

use slcosmo_core::{GaussianPrior, PosteriorEstimate, WeightDiagnostics};

use crate::config::Config;

/// Posterior density histogram over a fixed H0 axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Lower edge of the first bin.
    pub lo: f64,
    /// Upper edge of the last bin.
    pub hi: f64,
    /// Density per bin; integrates to one over `[lo, hi]`.
    pub densities: Vec<f64>,
}

impl Histogram {
    /// Width of each bin.
    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.densities.len() as f64
    }

    /// Center of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.lo + (i as f64 + 0.5) * self.bin_width()
    }
}

/// Everything an inference run produces.
///
/// The sample vectors are parallel: entry `k` of `log_likelihoods` and
/// `weights` belongs to `prior_samples[k]`.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceResult {
    /// H0 candidates drawn from the prior.
    pub prior_samples: Vec<f64>,
    /// Joint log-likelihood of each candidate.
    pub log_likelihoods: Vec<f64>,
    /// Unnormalized importance weights.
    pub weights: Vec<f64>,
    /// Weighted mean and standard deviation.
    pub estimate: PosteriorEstimate,
    /// Weight health.
    pub diagnostics: WeightDiagnostics,
    /// Posterior histogram over the configured axis, if any mass fell inside it.
    pub histogram: Option<Histogram>,
    /// Prior the candidates were drawn from.
    pub prior: GaussianPrior,
    /// Number of lenses in the ensemble.
    pub num_lenses: usize,
    /// True H0, when the lenses are mock data.
    pub true_h0: Option<f64>,
    /// Wall-clock time spent evaluating the joint likelihood.
    pub elapsed_secs: f64,
    /// Configuration used.
    pub config: Config,
}

impl InferenceResult {
    /// `(mean, standard deviation)` of the posterior.
    pub fn h0(&self) -> (f64, f64) {
        (self.estimate.mean, self.estimate.standard_deviation)
    }

    /// Whether the known truth lies within `k` standard deviations.
    ///
    /// `None` when the truth is unknown.
    pub fn recovers_truth(&self, k: f64) -> Option<bool> {
        self.true_h0.map(|truth| self.estimate.brackets(truth, k))
    }

    /// True if the effective sample size is below the configured fraction.
    pub fn is_weight_starved(&self) -> bool {
        self.diagnostics.efficiency() < self.config.min_efficiency
    }
}
