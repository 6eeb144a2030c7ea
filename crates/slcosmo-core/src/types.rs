//! Lens ensemble data model.
//!
//! A [`LensEnsemble`] holds one strong-lens system's measured Fermat potential
//! differences and the posterior time-delay samples produced by an external
//! time-delay inference pipeline. Shapes (`num_images`, `num_delays`,
//! `num_samples`) are checked once at construction, so the likelihood code
//! never has to rediscover them.

use serde::Serialize;

use crate::error::{InferenceError, Result};

/// Number of lensed images in a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageCount {
    /// Two images: one time delay (AB).
    Double,
    /// Four images: three time delays (AB, AC, AD).
    Quad,
}

impl ImageCount {
    /// Parse an image count, accepting only 2 or 4.
    pub fn from_images(num_images: usize) -> Result<Self> {
        match num_images {
            2 => Ok(Self::Double),
            4 => Ok(Self::Quad),
            other => Err(InferenceError::invalid(format!(
                "num_images must be 2 or 4, got {}",
                other
            ))),
        }
    }

    /// Number of lensed images.
    pub fn num_images(self) -> usize {
        match self {
            Self::Double => 2,
            Self::Quad => 4,
        }
    }

    /// Number of independent time delays, `num_images - 1`.
    pub fn num_delays(self) -> usize {
        self.num_images() - 1
    }

    /// Conventional labels of the image pairs, relative to image A.
    pub fn pair_labels(self) -> &'static [&'static str] {
        match self {
            Self::Double => &["AB"],
            Self::Quad => &["AB", "AC", "AD"],
        }
    }
}

/// One lens system's time-delay data, validated and immutable.
///
/// Posterior samples are stored row-major: row `s` holds the `num_delays`
/// time delays (days) of posterior draw `s`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LensEnsemble {
    images: ImageCount,
    delta_fp_obs: Vec<f64>,
    delta_fp_err: Vec<f64>,
    q: f64,
    samples: Vec<f64>,
    num_samples: usize,
}

impl LensEnsemble {
    /// Build a lens ensemble from per-sample rows of time delays.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if any dimension disagrees with
    /// `num_images - 1`, if there are no sample rows, if any uncertainty or
    /// `q` is not strictly positive, or if any value is non-finite.
    pub fn new(
        num_images: usize,
        delta_fp_obs: Vec<f64>,
        delta_fp_err: Vec<f64>,
        q: f64,
        time_delay_samples: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let images = ImageCount::from_images(num_images)?;
        let num_delays = images.num_delays();

        if let Some((row, width)) = time_delay_samples
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, width)| width != num_delays)
        {
            return Err(InferenceError::invalid(format!(
                "time-delay sample row {} has {} columns, expected {}",
                row, width, num_delays
            )));
        }

        let num_samples = time_delay_samples.len();
        let samples: Vec<f64> = time_delay_samples.into_iter().flatten().collect();
        Self::from_flat(images, delta_fp_obs, delta_fp_err, q, samples, num_samples)
    }

    /// Build a lens ensemble from a row-major flat sample buffer.
    ///
    /// `samples.len()` must equal `num_samples * images.num_delays()`.
    pub fn from_flat(
        images: ImageCount,
        delta_fp_obs: Vec<f64>,
        delta_fp_err: Vec<f64>,
        q: f64,
        samples: Vec<f64>,
        num_samples: usize,
    ) -> Result<Self> {
        let num_delays = images.num_delays();

        if delta_fp_obs.len() != num_delays {
            return Err(InferenceError::invalid(format!(
                "delta_fp_obs has {} entries, expected {}",
                delta_fp_obs.len(),
                num_delays
            )));
        }
        if delta_fp_err.len() != num_delays {
            return Err(InferenceError::invalid(format!(
                "delta_fp_err has {} entries, expected {}",
                delta_fp_err.len(),
                num_delays
            )));
        }
        if num_samples == 0 {
            return Err(InferenceError::invalid(
                "lens has no time-delay samples",
            ));
        }
        if samples.len() != num_samples * num_delays {
            return Err(InferenceError::invalid(format!(
                "sample buffer has {} values, expected {} x {}",
                samples.len(),
                num_samples,
                num_delays
            )));
        }
        if !(q.is_finite() && q > 0.0) {
            return Err(InferenceError::invalid(format!("Q must be > 0, got {}", q)));
        }
        for (i, &err) in delta_fp_err.iter().enumerate() {
            if !(err.is_finite() && err > 0.0) {
                return Err(InferenceError::invalid(format!(
                    "delta_fp_err[{}] must be > 0, got {}",
                    i, err
                )));
            }
        }
        if let Some(i) = delta_fp_obs.iter().position(|x| !x.is_finite()) {
            return Err(InferenceError::invalid(format!(
                "delta_fp_obs[{}] is not finite",
                i
            )));
        }
        if let Some(i) = samples.iter().position(|x| !x.is_finite()) {
            return Err(InferenceError::invalid(format!(
                "time-delay sample {} (row {}) is not finite",
                i % num_delays,
                i / num_delays
            )));
        }

        Ok(Self {
            images,
            delta_fp_obs,
            delta_fp_err,
            q,
            samples,
            num_samples,
        })
    }

    /// Image configuration of this lens.
    pub fn images(&self) -> ImageCount {
        self.images
    }

    /// Number of lensed images (2 or 4).
    pub fn num_images(&self) -> usize {
        self.images.num_images()
    }

    /// Number of time delays per sample (1 or 3).
    pub fn num_delays(&self) -> usize {
        self.images.num_delays()
    }

    /// Number of posterior time-delay samples.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Measured Fermat potential differences (day·km/s/Mpc).
    pub fn delta_fp_obs(&self) -> &[f64] {
        &self.delta_fp_obs
    }

    /// 1σ uncertainties on the Fermat potential differences.
    pub fn delta_fp_err(&self) -> &[f64] {
        &self.delta_fp_err
    }

    /// Time-delay-distance normalization Q (km/s).
    pub fn q(&self) -> f64 {
        self.q
    }

    /// Row-major flat view of all posterior samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// The time delays of posterior draw `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_samples()`.
    pub fn sample_row(&self, index: usize) -> &[f64] {
        let width = self.num_delays();
        &self.samples[index * width..(index + 1) * width]
    }

    /// Iterator over posterior sample rows.
    pub fn sample_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.samples.chunks_exact(self.num_delays())
    }
}
