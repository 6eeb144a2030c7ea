//! # slcosmo
//!
//! Infer the Hubble constant from an ensemble of gravitational-lens time-delay
//! measurements.
//!
//! Each lens contributes posterior samples of its time delays and measured
//! Fermat potential differences. H0 candidates are drawn from a Gaussian
//! prior, weighted by the joint likelihood over all lenses, and reduced to a
//! posterior mean and standard deviation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use slcosmo::SLCosmo;
//!
//! let result = SLCosmo::new()
//!     .prior(70.0, 7.0)
//!     .num_prior_samples(1000)
//!     .load_lenses(&["lens_0.txt", "lens_1.txt"])?
//!     .infer()?;
//!
//! println!("{}", slcosmo::output::format_result(&result));
//! ```
//!
//! The numeric engine lives in `slcosmo-core` and is re-exported here.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod cosmology;
mod result;

pub mod data;
pub mod mock;
pub mod output;

pub use config::Config;
pub use cosmology::SLCosmo;
pub use data::{read_tdc2_file, write_tdc2_file, DataError, Tdc2Ensemble};
pub use mock::{generate_mock_lenses, mock_rng, MockConfig, MockDataset};
pub use result::{Histogram, InferenceResult};

pub use slcosmo_core::{
    constants, engine, likelihood, prior, summary, GaussianPrior, ImageCount, InferenceError,
    JointLikelihood, JointPosteriorEngine, LensEnsemble, PosteriorEstimate, PosteriorSummary,
    WeightDiagnostics,
};
