//! Stochastic binary units.
//!
//! The probability of a unit being on is the logistic sigmoid of its input,
//! y = (1 + e^(-x))^(-1), the sample is a Bernoulli draw of that probability.
use ndarray::{ArrayView1, ArrayViewMut1, Zip};
use rand::Rng;
use math::sigmoid;

/// Applies the sigmoid in place.
pub fn probabilities(x: &mut ArrayViewMut1<f64>) {
    x.mapv_inplace(sigmoid);
}

/// Sets each sample to 1 with the given probability, 0 otherwise.
pub fn sample<R: Rng>(probabilities: &ArrayView1<f64>, samples: &mut ArrayViewMut1<f64>, rng: &mut R) {
    Zip::from(samples).and(probabilities).for_each(|s, &p| {
        *s = if rng.gen::<f64>() < p { 1f64 } else { 0f64 };
    });
}
