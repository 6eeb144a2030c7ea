//! Physical and numerical constants used throughout the crate.

/// Speed of light in km/s.
///
/// Converts a time delay (days) and H0 (km/s/Mpc) into a Fermat potential
/// difference once divided by the lens normalization Q.
pub const SPEED_OF_LIGHT_KM_S: f64 = 3.00e5;

/// Natural log of sqrt(2*pi), the normalization term of a unit Gaussian log-pdf.
pub const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// Prior sample counts at or below this floor are rejected.
///
/// With so few candidates the importance-sampling estimate is dominated by
/// one or two weights and the reported uncertainty is meaningless.
pub const MIN_PRIOR_SAMPLES: usize = 20;

/// Default deterministic seed for RNG operations.
///
/// Same seed + same lens data = same posterior. The value `0x48304c454e53`
/// is "H0LENS" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x4830_4C45_4E53;

// =============================================================================
// Default prior configuration
// =============================================================================

/// Default mean of the Gaussian H0 prior, in km/s/Mpc.
pub const DEFAULT_H0_PRIOR_MEAN: f64 = 70.0;

/// Default width (1σ) of the Gaussian H0 prior, in km/s/Mpc.
pub const DEFAULT_H0_PRIOR_WIDTH: f64 = 7.0;

/// Default number of prior samples drawn per inference run.
pub const DEFAULT_PRIOR_SAMPLES: usize = 1000;
