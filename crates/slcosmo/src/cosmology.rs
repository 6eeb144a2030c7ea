//! The `SLCosmo` orchestrator: lens data in, H0 posterior out.

use std::path::Path;
use std::time::Instant;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use slcosmo_core::{summary, InferenceError, JointPosteriorEngine, LensEnsemble, PosteriorSummary};

use crate::config::Config;
use crate::data::{read_tdc2_files, DataError};
use crate::mock::{generate_mock_lenses, mock_rng, MockConfig};
use crate::result::{Histogram, InferenceResult};

/// Infers H0 from an ensemble of strong-lens time-delay measurements.
///
/// ```ignore
/// use slcosmo::{MockConfig, SLCosmo};
///
/// let result = SLCosmo::new()
///     .num_prior_samples(1000)
///     .with_mock_data(&MockConfig::new(40, 100))?
///     .infer()?;
/// let (h0, sigma) = result.h0();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SLCosmo {
    config: Config,
    lenses: Vec<LensEnsemble>,
    true_h0: Option<f64>,
}

impl SLCosmo {
    /// Create an orchestrator with the default configuration and no lenses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an orchestrator with an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set the Gaussian prior.
    ///
    /// # Panics
    ///
    /// Panics if `width <= 0` or `mean` is not finite.
    pub fn prior(mut self, mean: f64, width: f64) -> Self {
        self.config = self.config.prior_mean(mean).prior_width(width);
        self
    }

    /// Set the number of prior samples.
    ///
    /// # Panics
    ///
    /// Panics if `n <= 20`.
    pub fn num_prior_samples(mut self, n: usize) -> Self {
        self.config = self.config.num_prior_samples(n);
        self
    }

    /// Set the RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config = self.config.seed(seed);
        self
    }

    /// Enable or disable parallel likelihood evaluation.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.config = self.config.parallel(enabled);
        self
    }

    /// Replace the lens ensemble.
    pub fn with_lenses(mut self, lenses: Vec<LensEnsemble>) -> Self {
        self.lenses = lenses;
        self
    }

    /// Record the true H0, for runs on simulated data.
    pub fn with_truth(mut self, h0: f64) -> Self {
        self.true_h0 = Some(h0);
        self
    }

    /// Replace the lens ensemble with the contents of TDC2 sample files.
    pub fn load_lenses<P: AsRef<Path>>(mut self, paths: &[P]) -> Result<Self, DataError> {
        let ensembles = read_tdc2_files(paths)?;
        tracing::info!("Loaded {} lens ensembles", ensembles.len());
        self.lenses = ensembles.into_iter().map(|e| e.into_lens()).collect();
        self.true_h0 = None;
        Ok(self)
    }

    /// Replace the lens ensemble with freshly generated mock data.
    ///
    /// Uses a stream independent of the prior draw, derived from the
    /// configured seed.
    pub fn with_mock_data(mut self, mock: &MockConfig) -> Result<Self, InferenceError> {
        let data = generate_mock_lenses(mock, &mut mock_rng(self.config.seed))?;
        tracing::debug!(
            "Generated {} mock lenses at H0 = {}",
            data.lenses.len(),
            data.true_h0
        );
        self.lenses = data.lenses;
        self.true_h0 = Some(data.true_h0);
        Ok(self)
    }

    /// Lenses currently held.
    pub fn lenses(&self) -> &[LensEnsemble] {
        &self.lenses
    }

    /// True H0, if known.
    pub fn true_h0(&self) -> Option<f64> {
        self.true_h0
    }

    /// Draw the configured number of H0 candidates from the prior.
    pub fn draw_prior_samples(&self) -> Result<Vec<f64>, InferenceError> {
        let prior = self.config.prior()?;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.seed);
        let samples = prior.sample(self.config.num_prior_samples, &mut rng)?;
        tracing::debug!(
            "Drew {} prior samples from N({}, {})",
            samples.len(),
            prior.mean(),
            prior.width()
        );
        Ok(samples)
    }

    /// Run the full pipeline: prior draw, joint likelihood, summary.
    ///
    /// # Errors
    ///
    /// Input errors (`InvalidParameter`, `EmptyInput`) are returned before
    /// any likelihood evaluation. `DegenerateWeights` means the data carry
    /// no usable posterior mass under this prior.
    pub fn infer(&self) -> Result<InferenceResult, InferenceError> {
        self.config.validate()?;
        if self.lenses.is_empty() {
            return Err(InferenceError::EmptyInput { what: "lenses" });
        }

        let prior_samples = self.draw_prior_samples()?;
        let engine = JointPosteriorEngine::new().parallel(self.config.parallel);

        let start = Instant::now();
        let joint = engine.run(&self.lenses, &prior_samples)?;
        let elapsed = start.elapsed();
        tracing::info!(
            "Characterized posterior over {} lenses x {} prior samples in {:.2?}",
            self.lenses.len(),
            prior_samples.len(),
            elapsed
        );

        let PosteriorSummary {
            estimate,
            diagnostics,
        } = PosteriorSummary::from_weighted(&prior_samples, &joint.weights)?;

        if diagnostics.efficiency() < self.config.min_efficiency {
            tracing::warn!(
                "Effective sample size {:.1} is {:.1}% of {} prior samples; \
                 consider more prior samples or a prior closer to the data",
                diagnostics.effective_sample_size,
                diagnostics.efficiency() * 100.0,
                diagnostics.num_samples
            );
        }

        let (lo, hi) = self.config.histogram_range;
        let histogram = match summary::weighted_histogram(
            &prior_samples,
            &joint.weights,
            lo,
            hi,
            self.config.histogram_bins,
        ) {
            Ok(densities) => Some(Histogram { lo, hi, densities }),
            Err(InferenceError::DegenerateWeights) => {
                tracing::debug!("No posterior mass inside histogram range [{}, {}]", lo, hi);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(InferenceResult {
            prior_samples,
            log_likelihoods: joint.log_likelihoods,
            weights: joint.weights,
            estimate,
            diagnostics,
            histogram,
            prior: self.config.prior()?,
            num_lenses: self.lenses.len(),
            true_h0: self.true_h0,
            elapsed_secs: elapsed.as_secs_f64(),
            config: self.config.clone(),
        })
    }
}
