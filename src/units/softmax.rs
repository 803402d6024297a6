//! A single softmax group over all the units.
//!
//! The largest input is subtracted before exponentiation so large inputs do not
//! overflow. The sample sets exactly one unit, the most probable one.
use ndarray::{ArrayView1, ArrayViewMut1};
use util::label_argmax;

/// Computes the softmax in place.
pub fn probabilities(x: &mut ArrayViewMut1<f64>) {
    let max = x.fold(::std::f64::NEG_INFINITY, |max, &v| if v > max { v } else { max });
    x.mapv_inplace(|v| (v - max).exp());
    let sum = x.sum();
    *x /= sum;
}

/// One at the largest probability, zero elsewhere.
pub fn sample(probabilities: &ArrayView1<f64>, samples: &mut ArrayViewMut1<f64>) {
    let winner = label_argmax(probabilities.iter());
    for (j, s) in samples.iter_mut().enumerate() {
        *s = if j == winner { 1f64 } else { 0f64 };
    }
}
