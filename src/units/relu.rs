//! Rectified linear units, optionally capped.
//!
//! Non-linearity activation function: y = min(max(0, x), ceiling)
//!
//! Sampling follows Nair and Hinton: gaussian noise with a variance of
//! sigmoid(y) is added to the rectified value, which is rectified (and capped)
//! again.
use ndarray::{ArrayView1, ArrayViewMut1, Zip};
use rand::Rng;
use rand::distributions::{IndependentSample, Normal};
use math::sigmoid;

fn rectify(x: f64, ceiling: Option<f64>) -> f64 {
    let y = if x > 0f64 { x } else { 0f64 };
    match ceiling {
        Some(ceiling) if y > ceiling => ceiling,
        _ => y,
    }
}

/// Rectifies (and caps) the values in place.
pub fn probabilities(x: &mut ArrayViewMut1<f64>, ceiling: Option<f64>) {
    x.mapv_inplace(|x| rectify(x, ceiling));
}

/// Draws a noisy rectified sample around every value.
pub fn sample<R: Rng>(values: &ArrayView1<f64>,
                      samples: &mut ArrayViewMut1<f64>,
                      ceiling: Option<f64>,
                      rng: &mut R) {
    let noise = Normal::new(0f64, 1f64);
    Zip::from(samples).and(values).for_each(|s, &y| {
        let std = sigmoid(y).sqrt();
        *s = rectify(y + std * noise.ind_sample(rng), ceiling);
    });
}
