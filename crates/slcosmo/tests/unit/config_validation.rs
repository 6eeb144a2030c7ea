//! Tests for configuration validation.
//!
//! Builder methods reject invalid values with a panic; `Config::validate`
//! reports the same problems as `InferenceError::InvalidParameter`.

use slcosmo::{Config, SLCosmo};

// =============================================================================
// PRIOR SAMPLE COUNT
// =============================================================================

#[test]
#[should_panic(expected = "num_prior_samples must be > 20")]
fn num_prior_samples_twenty_panics() {
    let _ = SLCosmo::new().num_prior_samples(20);
}

#[test]
#[should_panic(expected = "num_prior_samples must be > 20")]
fn num_prior_samples_zero_panics() {
    let _ = Config::default().num_prior_samples(0);
}

#[test]
fn num_prior_samples_minimum_valid() {
    let cosmo = SLCosmo::new().num_prior_samples(21);
    assert_eq!(cosmo.config().num_prior_samples, 21);
}

// =============================================================================
// PRIOR WIDTH / MEAN
// =============================================================================

#[test]
#[should_panic(expected = "h0_prior_width must be > 0")]
fn prior_width_zero_panics() {
    let _ = SLCosmo::new().prior(70.0, 0.0);
}

#[test]
#[should_panic(expected = "h0_prior_width must be > 0")]
fn prior_width_negative_panics() {
    let _ = Config::default().prior_width(-7.0);
}

#[test]
#[should_panic(expected = "h0_prior_mean must be finite")]
fn prior_mean_nan_panics() {
    let _ = Config::default().prior_mean(f64::NAN);
}

#[test]
fn prior_valid() {
    let cosmo = SLCosmo::new().prior(67.4, 3.0);
    assert_eq!(cosmo.config().h0_prior_mean, 67.4);
    assert_eq!(cosmo.config().h0_prior_width, 3.0);
}

// =============================================================================
// HISTOGRAM
// =============================================================================

#[test]
#[should_panic(expected = "histogram range must satisfy lo < hi")]
fn histogram_inverted_range_panics() {
    let _ = Config::default().histogram(80.0, 60.0, 10);
}

#[test]
#[should_panic(expected = "histogram_bins must be > 0")]
fn histogram_zero_bins_panics() {
    let _ = Config::default().histogram(60.0, 80.0, 0);
}

// =============================================================================
// NON-PANICKING VALIDATION
// =============================================================================

#[test]
fn default_config_validates() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn validate_reports_small_sample_count() {
    let config = Config {
        num_prior_samples: 20,
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.is_input_error());
    assert!(err.to_string().contains("num_prior_samples"), "{}", err);
}

#[test]
fn validate_reports_bad_width() {
    let config = Config {
        h0_prior_width: 0.0,
        ..Config::default()
    };
    assert!(config.validate().unwrap_err().is_input_error());
}

#[test]
fn validate_reports_bad_efficiency() {
    let config = Config {
        min_efficiency: 1.5,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_json_round_trip() {
    let config = Config::default().seed(99).prior_mean(68.0).prior_width(5.0).parallel(false);
    let json = serde_json::to_string(&config).unwrap();
    let back: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn config_partial_json_uses_defaults() {
    let back: Config = serde_json::from_str(r#"{"num_prior_samples": 500}"#).unwrap();
    assert_eq!(back.num_prior_samples, 500);
    assert_eq!(back.h0_prior_mean, Config::default().h0_prior_mean);
}
