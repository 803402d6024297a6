//! Provides the unit types of an RBM and their activation rules.
//!
//! Every unit type maps a pre-activation value (for hidden units
//! `b + v * W`, for visible units `c + W * h`) to
//!
//! * a __probability__, the expected value of the unit, and
//! * a __sample__, a stochastic draw around that value.
//!
//! Callers can compute either one, or both, of them. Every produced vector is
//! checked for non-finite values, a NaN or an infinity is a fatal
//! [numerical error][1].
//!
//! | Unit     | Probability           | Sample                       |
//! |----------|-----------------------|------------------------------|
//! | Binary   | sigmoid               | Bernoulli draw               |
//! | Gaussian | identity              | unit variance gaussian noise |
//! | ReLU     | max(x, 0)             | noisy rectified draw         |
//! | ReLU1    | min(max(x, 0), 1)     | noisy draw clamped to [0,1]  |
//! | ReLU6    | min(max(x, 0), 6)     | noisy draw clamped to [0,6]  |
//! | Softmax  | softmax               | one-hot at the argmax        |
//!
//! [1]: ../error/struct.NumericalError.html
use ndarray::{ArrayView1, ArrayViewMut1};
use rand::Rng;
use error::{ConfigError, Result};
use util::check_finite;

pub mod binary;
pub mod gaussian;
pub mod relu;
pub mod softmax;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// All available types of units.
pub enum UnitType {
    /// Stochastic binary units.
    Binary,
    /// Linear units with gaussian noise. Only supported as visible units.
    Gaussian,
    /// Rectified linear units.
    ReLU,
    /// Rectified linear units capped at 1.
    ReLU1,
    /// Rectified linear units capped at 6.
    ReLU6,
    /// A single softmax group. Only supported as hidden units.
    Softmax,
}

impl UnitType {
    /// Returns true for all the rectified linear variants.
    pub fn is_relu(&self) -> bool {
        match *self {
            UnitType::ReLU | UnitType::ReLU1 | UnitType::ReLU6 => true,
            _ => false,
        }
    }

    /// Whether the unit type can be used for the visible layer.
    pub fn supports_visible(&self) -> bool {
        *self != UnitType::Softmax
    }

    /// Whether the unit type can be used for the hidden layer.
    pub fn supports_hidden(&self) -> bool {
        *self != UnitType::Gaussian
    }

    /// Turns the pre-activation values in `x` into probabilities, in place.
    pub fn probabilities(&self, mut x: ArrayViewMut1<f64>) -> Result<()> {
        match *self {
            UnitType::Binary => binary::probabilities(&mut x),
            UnitType::Gaussian => gaussian::probabilities(&mut x),
            UnitType::ReLU => relu::probabilities(&mut x, None),
            UnitType::ReLU1 => relu::probabilities(&mut x, Some(1f64)),
            UnitType::ReLU6 => relu::probabilities(&mut x, Some(6f64)),
            UnitType::Softmax => softmax::probabilities(&mut x),
        }
        check_finite(x.iter(), "unit probabilities")
    }

    /// Draws a sample for every unit from its `probabilities`.
    pub fn sample<R: Rng>(&self,
                          probabilities: ArrayView1<f64>,
                          mut samples: ArrayViewMut1<f64>,
                          rng: &mut R)
                          -> Result<()> {
        if probabilities.len() != samples.len() {
            return Err(ConfigError::LengthMismatch {
                what: "unit samples",
                expected: probabilities.len(),
                actual: samples.len(),
            }.into());
        }
        match *self {
            UnitType::Binary => binary::sample(&probabilities, &mut samples, rng),
            UnitType::Gaussian => gaussian::sample(&probabilities, &mut samples, rng),
            UnitType::ReLU => relu::sample(&probabilities, &mut samples, None, rng),
            UnitType::ReLU1 => relu::sample(&probabilities, &mut samples, Some(1f64), rng),
            UnitType::ReLU6 => relu::sample(&probabilities, &mut samples, Some(6f64), rng),
            UnitType::Softmax => softmax::sample(&probabilities, &mut samples),
        }
        check_finite(samples.iter(), "unit samples")
    }
}

impl Default for UnitType {
    fn default() -> UnitType {
        UnitType::Binary
    }
}
