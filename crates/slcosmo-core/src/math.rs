//! Numerically stable log-space helpers.
//!
//! Every reduction here subtracts the running maximum before exponentiating,
//! so grids of very negative log-densities (large chi-square) neither
//! underflow to `-inf` nor overflow.

use crate::constants::LN_SQRT_2PI;

/// Gaussian log-density `ln N(x | mean, sigma)`.
///
/// `sigma` must be strictly positive; callers validate this up front.
#[inline]
pub fn gaussian_log_density(x: f64, mean: f64, sigma: f64) -> f64 {
    let z = (x - mean) / sigma;
    -0.5 * z * z - (LN_SQRT_2PI + sigma.ln())
}

/// `ln Σ exp(x_i)` computed in two passes.
///
/// Returns `-inf` for an empty slice or when every term is `-inf`.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let sum: f64 = values.iter().map(|&x| (x - max).exp()).sum();
    max + sum.ln()
}

/// `ln( (1/n) Σ exp(x_i) )`, the log of a Monte Carlo average.
///
/// Returns `-inf` for an empty slice.
pub fn log_mean_exp(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NEG_INFINITY;
    }
    log_sum_exp(values) - (values.len() as f64).ln()
}

/// Single-pass log-sum-exp accumulator.
///
/// Keeps the running maximum `m` and `s = Σ exp(x_i - m)`; when a new
/// maximum arrives, `s` is rescaled. This lets the likelihood reduce a
/// `num_samples × num_delays` grid without materializing it.
#[derive(Debug, Clone, Copy)]
pub struct LogSumExp {
    max: f64,
    scaled_sum: f64,
    count: usize,
}

impl Default for LogSumExp {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSumExp {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            max: f64::NEG_INFINITY,
            scaled_sum: 0.0,
            count: 0,
        }
    }

    /// Add one log-space term.
    #[inline]
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        if x == f64::NEG_INFINITY {
            return;
        }
        if x <= self.max {
            self.scaled_sum += (x - self.max).exp();
        } else {
            self.scaled_sum = self.scaled_sum * (self.max - x).exp() + 1.0;
            self.max = x;
        }
    }

    /// Number of terms pushed so far, including `-inf` terms.
    pub fn count(&self) -> usize {
        self.count
    }

    /// `ln Σ exp(x_i)` over everything pushed.
    pub fn log_sum(&self) -> f64 {
        if self.max == f64::NEG_INFINITY {
            f64::NEG_INFINITY
        } else {
            self.max + self.scaled_sum.ln()
        }
    }

    /// `ln( (1/n) Σ exp(x_i) )` over everything pushed.
    pub fn log_mean(&self) -> f64 {
        if self.count == 0 {
            f64::NEG_INFINITY
        } else {
            self.log_sum() - (self.count as f64).ln()
        }
    }
}

impl Extend<f64> for LogSumExp {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}
