//! Importance-sampling inference of the Hubble constant from strong-lens time delays.
//!
//! This crate is the numeric core: it takes already-parsed lens ensembles and
//! a set of H0 candidates and produces importance weights and a posterior
//! estimate. It never touches the filesystem.
//!
//! # Pipeline
//!
//! 1. [`prior::GaussianPrior::sample`] draws H0 candidates.
//! 2. [`engine::JointPosteriorEngine::run`] evaluates
//!    [`likelihood::log_likelihood`] for every (lens, candidate) pair, sums
//!    over lenses and converts to weights relative to the best candidate.
//! 3. [`summary::estimate`] reduces the weighted candidates to a mean and
//!    standard deviation.
//!
//! # Features
//!
//! - `parallel`: evaluate prior samples on the rayon pool. Output is
//!   bit-identical to the serial path.
//!
//! ```ignore
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//! use slcosmo_core::{GaussianPrior, JointPosteriorEngine, summary};
//!
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
//! let h0 = GaussianPrior::new(70.0, 7.0)?.sample(1000, &mut rng)?;
//! let joint = JointPosteriorEngine::new().run(&lenses, &h0)?;
//! let est = summary::estimate(&h0, &joint.weights)?;
//! println!("H0 = {:.1} +/- {:.1}", est.mean, est.standard_deviation);
//! ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod likelihood;
pub mod math;
pub mod prior;
pub mod summary;
pub mod types;

// Re-export commonly used items at crate root
pub use engine::{JointLikelihood, JointPosteriorEngine};
pub use error::{InferenceError, Result};
pub use prior::{sample_prior, GaussianPrior};
pub use summary::{PosteriorEstimate, PosteriorSummary, WeightDiagnostics};
pub use types::{ImageCount, LensEnsemble};
