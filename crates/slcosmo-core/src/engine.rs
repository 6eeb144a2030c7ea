//! Joint posterior evaluation over an ensemble of lenses.
//!
//! For each prior sample H0_k the joint log-likelihood is the sum of the
//! per-lens log-likelihoods (lens systems are independent). Importance
//! weights are then `w_k = exp(ln L_k - max_j ln L_j)`: relative to the best
//! supported candidate and deliberately left unnormalized, since every
//! downstream weighted average divides by `Σ w` anyway.
//!
//! The work is a map over `(H0_k, lens)` pairs with no shared state. With the
//! `parallel` feature the map over prior samples runs on the rayon pool; the
//! sum over lenses is always a sequential fold in lens order, and results are
//! collected in prior-sample order, so serial and parallel runs are
//! bit-identical.

use serde::Serialize;

use crate::error::{InferenceError, Result};
use crate::likelihood::log_likelihood_unchecked;
use crate::types::LensEnsemble;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-sample output of a joint posterior run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointLikelihood {
    /// Joint log-likelihood of each prior sample, in prior-sample order.
    pub log_likelihoods: Vec<f64>,
    /// Unnormalized importance weights; the best-supported sample has weight 1.
    pub weights: Vec<f64>,
}

impl JointLikelihood {
    /// Number of prior samples evaluated.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True if no samples were evaluated.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Index of the maximum-likelihood prior sample.
    pub fn best_index(&self) -> Option<usize> {
        self.log_likelihoods
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }
}

/// Evaluates the joint likelihood of H0 candidates against a set of lenses.
#[derive(Debug, Clone, Copy)]
pub struct JointPosteriorEngine {
    parallel: bool,
}

impl Default for JointPosteriorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl JointPosteriorEngine {
    /// Create an engine that runs serially.
    pub fn new() -> Self {
        Self { parallel: false }
    }

    /// Enable or disable the rayon map over prior samples.
    ///
    /// Has no effect unless the `parallel` feature is compiled in.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Whether this engine will use the rayon pool.
    pub fn is_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }

    /// Compute joint log-likelihoods and importance weights for `prior_samples`.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if `lenses` or `prior_samples` is empty.
    /// - `InvalidParameter` if any prior sample is not finite.
    pub fn run(&self, lenses: &[LensEnsemble], prior_samples: &[f64]) -> Result<JointLikelihood> {
        if lenses.is_empty() {
            return Err(InferenceError::EmptyInput { what: "lenses" });
        }
        if prior_samples.is_empty() {
            return Err(InferenceError::EmptyInput {
                what: "prior samples",
            });
        }
        if let Some(k) = prior_samples.iter().position(|h0| !h0.is_finite()) {
            return Err(InferenceError::invalid(format!(
                "prior sample {} is not finite",
                k
            )));
        }

        let log_likelihoods = self.joint_log_likelihoods(lenses, prior_samples);
        let weights = importance_weights(&log_likelihoods);

        Ok(JointLikelihood {
            log_likelihoods,
            weights,
        })
    }

    fn joint_log_likelihoods(&self, lenses: &[LensEnsemble], prior_samples: &[f64]) -> Vec<f64> {
        #[cfg(feature = "parallel")]
        if self.parallel {
            return prior_samples
                .par_iter()
                .map(|&h0| joint_log_likelihood(lenses, h0))
                .collect();
        }

        prior_samples
            .iter()
            .map(|&h0| joint_log_likelihood(lenses, h0))
            .collect()
    }
}

/// Sum of per-lens log-likelihoods at one H0, in lens order.
fn joint_log_likelihood(lenses: &[LensEnsemble], h0: f64) -> f64 {
    lenses
        .iter()
        .fold(0.0, |acc, lens| acc + log_likelihood_unchecked(lens, h0))
}

/// Convert joint log-likelihoods into weights relative to the maximum.
///
/// If every log-likelihood is `-inf` the weights are all zero, which the
/// summary step reports as `DegenerateWeights`.
pub fn importance_weights(log_likelihoods: &[f64]) -> Vec<f64> {
    let max = log_likelihoods
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return vec![0.0; log_likelihoods.len()];
    }
    log_likelihoods.iter().map(|&ll| (ll - max).exp()).collect()
}
