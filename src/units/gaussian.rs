//! Linear units with independent gaussian noise of unit variance.
//!
//! The data is expected to be normalized to zero mean and unit variance,
//! the mean of a unit is then simply its input.
use ndarray::{ArrayView1, ArrayViewMut1, Zip};
use rand::Rng;
use rand::distributions::{IndependentSample, Normal};

/// The mean of a gaussian unit is its input, nothing to do.
pub fn probabilities(_x: &mut ArrayViewMut1<f64>) {}

/// Adds unit variance noise to every mean.
pub fn sample<R: Rng>(means: &ArrayView1<f64>, samples: &mut ArrayViewMut1<f64>, rng: &mut R) {
    let noise = Normal::new(0f64, 1f64);
    Zip::from(samples).and(means).for_each(|s, &m| *s = m + noise.ind_sample(rng));
}
