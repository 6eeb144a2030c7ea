//! Reduce weighted prior samples to a posterior estimate.
//!
//! μ = Σ w_k H0_k / Σ w_k
//! σ = sqrt( (Σ w_k H0_k² - (Σ w_k) μ²) / Σ w_k )
//!
//! Inputs are consumed read-only; nothing here mutates the engine output.

use serde::Serialize;

use crate::error::{InferenceError, Result};

/// Posterior mean and standard deviation of H0, in km/s/Mpc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PosteriorEstimate {
    /// Weighted mean.
    pub mean: f64,
    /// Weighted standard deviation.
    pub standard_deviation: f64,
}

impl PosteriorEstimate {
    /// `(mean - k·σ, mean + k·σ)`.
    pub fn interval(&self, k: f64) -> (f64, f64) {
        (
            self.mean - k * self.standard_deviation,
            self.mean + k * self.standard_deviation,
        )
    }

    /// True if `value` lies strictly within `k` standard deviations of the mean.
    pub fn brackets(&self, value: f64, k: f64) -> bool {
        let (lo, hi) = self.interval(k);
        lo < value && value < hi
    }
}

/// How much of the prior sample set actually carries posterior mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightDiagnostics {
    /// Number of prior samples.
    pub num_samples: usize,
    /// Number of samples with non-zero weight.
    pub num_nonzero: usize,
    /// Σ w_k.
    pub weight_sum: f64,
    /// Largest weight after normalizing to unit sum.
    pub max_normalized_weight: f64,
    /// Kish effective sample size `(Σw)² / Σw²`.
    pub effective_sample_size: f64,
}

impl WeightDiagnostics {
    /// Effective sample size as a fraction of the number of prior samples.
    pub fn efficiency(&self) -> f64 {
        if self.num_samples == 0 {
            0.0
        } else {
            self.effective_sample_size / self.num_samples as f64
        }
    }
}

/// Estimate plus diagnostics, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PosteriorSummary {
    /// Point estimate and uncertainty.
    pub estimate: PosteriorEstimate,
    /// Weight health.
    pub diagnostics: WeightDiagnostics,
}

impl PosteriorSummary {
    /// Summarize weighted samples.
    pub fn from_weighted(samples: &[f64], weights: &[f64]) -> Result<Self> {
        Ok(Self {
            estimate: estimate(samples, weights)?,
            diagnostics: diagnostics(weights)?,
        })
    }
}

fn check_lengths(samples: &[f64], weights: &[f64]) -> Result<()> {
    if samples.is_empty() {
        return Err(InferenceError::EmptyInput {
            what: "prior samples",
        });
    }
    if samples.len() != weights.len() {
        return Err(InferenceError::invalid(format!(
            "{} samples but {} weights",
            samples.len(),
            weights.len()
        )));
    }
    Ok(())
}

fn check_weights(weights: &[f64]) -> Result<f64> {
    if let Some(k) = weights.iter().position(|w| !(w.is_finite() && *w >= 0.0)) {
        return Err(InferenceError::invalid(format!(
            "weight {} must be finite and >= 0, got {}",
            k, weights[k]
        )));
    }
    let sum: f64 = weights.iter().sum();
    if sum == 0.0 {
        return Err(InferenceError::DegenerateWeights);
    }
    Ok(sum)
}

/// Weighted mean and standard deviation of `samples`.
///
/// # Errors
///
/// - `EmptyInput` if there are no samples.
/// - `InvalidParameter` on length mismatch or a negative / non-finite weight.
/// - `DegenerateWeights` if the weights sum to zero.
pub fn estimate(samples: &[f64], weights: &[f64]) -> Result<PosteriorEstimate> {
    check_lengths(samples, weights)?;
    let weight_sum = check_weights(weights)?;

    let (sum, sum_sq) = samples
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(s, s2), (&x, &w)| (s + w * x, s2 + w * x * x));

    let mean = sum / weight_sum;
    // Rounding can push a near-zero variance slightly negative.
    let variance = ((sum_sq - weight_sum * mean * mean) / weight_sum).max(0.0);

    Ok(PosteriorEstimate {
        mean,
        standard_deviation: variance.sqrt(),
    })
}

/// Weight health diagnostics.
///
/// # Errors
///
/// `DegenerateWeights` if the weights sum to zero, `InvalidParameter` for
/// negative or non-finite weights, `EmptyInput` for no weights.
pub fn diagnostics(weights: &[f64]) -> Result<WeightDiagnostics> {
    if weights.is_empty() {
        return Err(InferenceError::EmptyInput { what: "weights" });
    }
    let weight_sum = check_weights(weights)?;

    let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
    let max = weights.iter().copied().fold(0.0_f64, f64::max);

    Ok(WeightDiagnostics {
        num_samples: weights.len(),
        num_nonzero: weights.iter().filter(|&&w| w > 0.0).count(),
        weight_sum,
        max_normalized_weight: max / weight_sum,
        effective_sample_size: weight_sum * weight_sum / sum_sq,
    })
}

/// Weights rescaled to sum to one.
pub fn normalized_weights(weights: &[f64]) -> Result<Vec<f64>> {
    if weights.is_empty() {
        return Err(InferenceError::EmptyInput { what: "weights" });
    }
    let weight_sum = check_weights(weights)?;
    Ok(weights.iter().map(|w| w / weight_sum).collect())
}

/// Weighted, density-normalized histogram of `samples` over `[lo, hi]`.
///
/// Returns `bins` densities; samples outside the range are dropped before
/// normalization, matching a histogram drawn over a fixed axis.
pub fn weighted_histogram(
    samples: &[f64],
    weights: &[f64],
    lo: f64,
    hi: f64,
    bins: usize,
) -> Result<Vec<f64>> {
    check_lengths(samples, weights)?;
    check_weights(weights)?;
    if bins == 0 {
        return Err(InferenceError::invalid("histogram needs at least one bin"));
    }
    if !(lo.is_finite() && hi.is_finite() && hi > lo) {
        return Err(InferenceError::invalid(format!(
            "histogram range must satisfy lo < hi, got [{}, {}]",
            lo, hi
        )));
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0.0; bins];
    for (&x, &w) in samples.iter().zip(weights) {
        if x < lo || x > hi {
            continue;
        }
        let idx = (((x - lo) / width) as usize).min(bins - 1);
        counts[idx] += w;
    }

    let in_range: f64 = counts.iter().sum();
    if in_range == 0.0 {
        return Err(InferenceError::DegenerateWeights);
    }
    Ok(counts.iter().map(|c| c / (in_range * width)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_weights_match_population_moments() {
        let samples = [68.0, 70.0, 72.0, 74.0];
        let est = estimate(&samples, &[1.0; 4]).unwrap();
        assert!((est.mean - 71.0).abs() < 1e-12);
        // Population variance: (9 + 1 + 1 + 9) / 4 = 5
        assert!((est.standard_deviation - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_weight_scale_invariance() {
        let samples = [65.0, 70.0, 73.0, 78.0];
        let weights = [0.1, 1.0, 0.6, 0.05];
        let scaled: Vec<f64> = weights.iter().map(|w| w * 1e-200).collect();

        let a = estimate(&samples, &weights).unwrap();
        let b = estimate(&samples, &scaled).unwrap();
        assert!((a.mean - b.mean).abs() < 1e-9);
        assert!((a.standard_deviation - b.standard_deviation).abs() < 1e-9);
    }

    #[test]
    fn test_single_dominant_weight() {
        let est = estimate(&[60.0, 72.0, 80.0], &[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(est.mean, 72.0);
        assert_eq!(est.standard_deviation, 0.0);
    }

    #[test]
    fn test_all_zero_weights_is_degenerate() {
        let err = estimate(&[70.0, 71.0, 72.0], &[0.0; 3]).unwrap_err();
        assert_eq!(err, InferenceError::DegenerateWeights);
        assert!(err.is_computation_error());

        assert_eq!(
            diagnostics(&[0.0; 3]).unwrap_err(),
            InferenceError::DegenerateWeights
        );
    }

    #[test]
    fn test_length_mismatch() {
        let err = estimate(&[70.0, 71.0], &[1.0]).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = estimate(&[70.0, 71.0], &[1.0, -0.5]).unwrap_err();
        assert!(err.to_string().contains("weight 1"), "{}", err);
    }

    #[test]
    fn test_empty_samples() {
        assert_eq!(
            estimate(&[], &[]).unwrap_err(),
            InferenceError::EmptyInput {
                what: "prior samples"
            }
        );
    }

    #[test]
    fn test_diagnostics_uniform() {
        let d = diagnostics(&[1.0; 50]).unwrap();
        assert_eq!(d.num_samples, 50);
        assert_eq!(d.num_nonzero, 50);
        assert!((d.effective_sample_size - 50.0).abs() < 1e-9);
        assert!((d.max_normalized_weight - 0.02).abs() < 1e-12);
        assert!((d.efficiency() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_diagnostics_single_spike() {
        let mut w = vec![0.0; 100];
        w[17] = 1.0;
        let d = diagnostics(&w).unwrap();
        assert_eq!(d.num_nonzero, 1);
        assert!((d.effective_sample_size - 1.0).abs() < 1e-12);
        assert_eq!(d.max_normalized_weight, 1.0);
    }

    #[test]
    fn test_normalized_weights_sum_to_one() {
        let w = normalized_weights(&[0.2, 1.0, 0.3, 0.5]).unwrap();
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((w[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_integrates_to_one() {
        let samples: Vec<f64> = (0..100).map(|i| 60.0 + 0.2 * i as f64).collect();
        let weights: Vec<f64> = samples.iter().map(|x| (-(x - 70.0).powi(2) / 8.0).exp()).collect();
        let hist = weighted_histogram(&samples, &weights, 60.0, 80.0, 20).unwrap();

        assert_eq!(hist.len(), 20);
        let integral: f64 = hist.iter().map(|d| d * 1.0).sum();
        assert!((integral - 1.0).abs() < 1e-9, "integral {}", integral);

        let peak = hist
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(peak == 9 || peak == 10, "peak bin {}", peak);
    }

    #[test]
    fn test_histogram_rejects_bad_range() {
        assert!(weighted_histogram(&[70.0], &[1.0], 80.0, 60.0, 10).is_err());
        assert!(weighted_histogram(&[70.0], &[1.0], 60.0, 80.0, 0).is_err());
        assert_eq!(
            weighted_histogram(&[90.0], &[1.0], 60.0, 80.0, 10).unwrap_err(),
            InferenceError::DegenerateWeights
        );
    }

    #[test]
    fn test_interval_and_brackets() {
        let est = PosteriorEstimate {
            mean: 72.0,
            standard_deviation: 1.5,
        };
        assert_eq!(est.interval(2.0), (69.0, 75.0));
        assert!(est.brackets(74.0, 2.0));
        assert!(!est.brackets(76.0, 2.0));
    }
}
