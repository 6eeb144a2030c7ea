//! Per-lens likelihood of H0.
//!
//! ## Model
//!
//! For one posterior time-delay draw `dt`, the predicted Fermat potential
//! difference of pair `i` is
//!
//! ΔFP_pred,i = c · dt_i · H0 / Q
//!
//! and each pair contributes a Gaussian log-density
//!
//! ln L_i = -½ ((ΔFP_obs,i - ΔFP_pred,i) / σ_i)² - ln(√(2π) σ_i)
//!
//! ## Marginalization
//!
//! The lens log-likelihood is the log of the Monte Carlo average of `L_i` over
//! the flattened `num_samples × num_delays` grid:
//!
//! ln L(H0) = logsumexp(grid) - ln(num_samples · num_delays)
//!
//! Every (sample, pair) cell is an equally weighted draw. Pairs within one
//! posterior row are not combined jointly; for quads this ignores the
//! correlation between the three delays of a single draw.

use crate::constants::SPEED_OF_LIGHT_KM_S;
use crate::error::{InferenceError, Result};
use crate::math::{gaussian_log_density, LogSumExp};
use crate::types::LensEnsemble;

/// Predicted Fermat potential difference for a time delay `dt` (days).
#[inline]
pub fn predicted_delta_fp(dt: f64, h0: f64, q: f64) -> f64 {
    SPEED_OF_LIGHT_KM_S * dt * h0 / q
}

fn check_h0(h0: f64) -> Result<()> {
    if h0.is_finite() {
        Ok(())
    } else {
        Err(InferenceError::invalid(format!("H0 must be finite, got {}", h0)))
    }
}

/// Log-likelihood of `h0` given one lens, marginalized over its time-delay samples.
///
/// Reduces the log-density grid with a streaming log-sum-exp, so no grid is
/// allocated. Agrees with [`log_density_grid`] followed by
/// [`crate::math::log_mean_exp`] to floating-point tolerance.
///
/// # Errors
///
/// Returns `InvalidParameter` if `h0` is not finite. Lens shapes and
/// uncertainties are already validated by [`LensEnsemble`].
pub fn log_likelihood(lens: &LensEnsemble, h0: f64) -> Result<f64> {
    check_h0(h0)?;
    Ok(log_likelihood_unchecked(lens, h0))
}

/// Hot-loop variant of [`log_likelihood`] for callers that already checked `h0`.
pub(crate) fn log_likelihood_unchecked(lens: &LensEnsemble, h0: f64) -> f64 {
    let q = lens.q();
    let obs = lens.delta_fp_obs();
    let err = lens.delta_fp_err();

    // Same operation order as the grid: `c·H0/Q` alone can overflow for a
    // tiny Q, and `inf * 0.0` is NaN.
    let mut acc = LogSumExp::new();
    for row in lens.sample_rows() {
        for ((&dt, &observed), &sigma) in row.iter().zip(obs).zip(err) {
            acc.push(gaussian_log_density(observed, predicted_delta_fp(dt, h0, q), sigma));
        }
    }
    acc.log_mean()
}

/// The full row-major `num_samples × num_delays` grid of per-pair log-densities.
///
/// Mostly useful for diagnostics and for checking the streaming reduction.
pub fn log_density_grid(lens: &LensEnsemble, h0: f64) -> Result<Vec<f64>> {
    check_h0(h0)?;
    let q = lens.q();
    let obs = lens.delta_fp_obs();
    let err = lens.delta_fp_err();

    let mut grid = Vec::with_capacity(lens.samples().len());
    for row in lens.sample_rows() {
        for (i, &dt) in row.iter().enumerate() {
            let predicted = predicted_delta_fp(dt, h0, q);
            grid.push(gaussian_log_density(obs[i], predicted, err[i]));
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::log_mean_exp;

    fn double_lens(dt: Vec<f64>, obs: f64, err: f64, q: f64) -> LensEnsemble {
        LensEnsemble::new(2, vec![obs], vec![err], q, dt.into_iter().map(|d| vec![d]).collect())
            .unwrap()
    }

    fn quad_lens() -> LensEnsemble {
        let h0 = 72.3;
        let q = 4.1e5;
        let dt_true = [19.0, 21.5, 20.2];
        let obs: Vec<f64> = dt_true.iter().map(|&d| predicted_delta_fp(d, h0, q)).collect();
        let err: Vec<f64> = obs.iter().map(|o| o * 0.04).collect();
        let rows = (0..50)
            .map(|s| {
                let wiggle = ((s as f64) * 0.37).sin() * 2.0;
                dt_true.iter().map(|d| d + wiggle).collect()
            })
            .collect();
        LensEnsemble::new(4, obs, err, q, rows).unwrap()
    }

    #[test]
    fn test_single_sample_single_pair_is_gaussian() {
        let q = 4.0e5;
        let h0 = 70.0;
        let lens = double_lens(vec![20.0], 1000.0, 40.0, q);

        let predicted = predicted_delta_fp(20.0, h0, q);
        let expected = gaussian_log_density(1000.0, predicted, 40.0);
        let got = log_likelihood(&lens, h0).unwrap();

        assert!((got - expected).abs() < 1e-12, "{} vs {}", got, expected);
    }

    #[test]
    fn test_predicted_delta_fp_units() {
        // c * 20 days * 72.3 / 4e5 = 1084.5
        let p = predicted_delta_fp(20.0, 72.3, 4.0e5);
        assert!((p - 1084.5).abs() < 1e-9, "got {}", p);
    }

    #[test]
    fn test_streaming_matches_grid_reduction() {
        let lens = quad_lens();
        for &h0 in &[55.0, 68.0, 72.3, 80.0, 120.0] {
            let grid = log_density_grid(&lens, h0).unwrap();
            assert_eq!(grid.len(), lens.num_samples() * lens.num_delays());

            let reference = log_mean_exp(&grid);
            let streaming = log_likelihood(&lens, h0).unwrap();
            assert!(
                (reference - streaming).abs() <= 1e-12 * reference.abs().max(1.0),
                "h0={}: grid {} vs streaming {}",
                h0,
                reference,
                streaming
            );
        }
    }

    #[test]
    fn test_finite_for_extreme_h0() {
        // Chi-square in the millions: every cell underflows in linear space.
        let lens = quad_lens();
        for &h0 in &[1e-6, 1.0, 500.0, 1e5] {
            let ll = log_likelihood(&lens, h0).unwrap();
            assert!(ll.is_finite(), "h0={} gave {}", h0, ll);
        }
    }

    #[test]
    fn test_peaks_near_truth() {
        let lens = quad_lens();
        let at_truth = log_likelihood(&lens, 72.3).unwrap();
        assert!(at_truth > log_likelihood(&lens, 60.0).unwrap());
        assert!(at_truth > log_likelihood(&lens, 85.0).unwrap());
    }

    #[test]
    fn test_rejects_non_finite_h0() {
        let lens = quad_lens();
        assert!(log_likelihood(&lens, f64::NAN).unwrap_err().is_input_error());
        assert!(log_density_grid(&lens, f64::INFINITY).is_err());
    }

    #[test]
    fn test_flattened_average_over_pairs() {
        // Two identical samples: the average over the grid equals one row's
        // average over its pairs.
        let q = 4.0e5;
        let rows = vec![vec![20.0, 22.0, 18.0], vec![20.0, 22.0, 18.0]];
        let lens = LensEnsemble::new(
            4,
            vec![1050.0, 1200.0, 990.0],
            vec![40.0, 45.0, 42.0],
            q,
            rows,
        )
        .unwrap();

        let h0 = 71.0;
        let per_pair: Vec<f64> = (0..3)
            .map(|i| {
                let dt = lens.sample_row(0)[i];
                gaussian_log_density(
                    lens.delta_fp_obs()[i],
                    predicted_delta_fp(dt, h0, q),
                    lens.delta_fp_err()[i],
                )
            })
            .collect();
        let expected = log_mean_exp(&per_pair);
        let got = log_likelihood(&lens, h0).unwrap();
        assert!((got - expected).abs() < 1e-12, "{} vs {}", got, expected);
    }

    #[test]
    fn test_zero_delay_with_tiny_q_is_not_nan() {
        // c·H0/Q overflows here; a zero delay must still give a finite cell.
        let lens = double_lens(vec![0.0, 20.0], 1000.0, 40.0, 1e-305);
        let streaming = log_likelihood(&lens, 70.0).unwrap();
        let reference = log_mean_exp(&log_density_grid(&lens, 70.0).unwrap());

        assert!(streaming.is_finite(), "got {}", streaming);
        let expected = gaussian_log_density(1000.0, 0.0, 40.0) - 2f64.ln();
        assert!((streaming - expected).abs() < 1e-9, "{} vs {}", streaming, expected);
        assert!((streaming - reference).abs() < 1e-12, "{} vs {}", streaming, reference);
    }

    #[test]
    fn test_negative_and_zero_delays_match_grid() {
        let lens = double_lens(vec![-5.0, 0.0, 3.0, 21.0], 1000.0, 40.0, 4.0e5);
        for &h0 in &[-70.0, 0.0, 70.0, 1e8] {
            let streaming = log_likelihood(&lens, h0).unwrap();
            let reference = log_mean_exp(&log_density_grid(&lens, h0).unwrap());
            assert!(!streaming.is_nan(), "h0={} gave NaN", h0);
            assert!(
                (streaming - reference).abs() <= 1e-12 * reference.abs().max(1.0),
                "h0={}: grid {} vs streaming {}",
                h0,
                reference,
                streaming
            );
        }
    }
}
