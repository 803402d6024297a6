//! Provides the initialization of RBM weights.
use ndarray::Array2;
use rand::Rng;
use rand::distributions::{IndependentSample, Normal, Range};

#[derive(Debug, Copy, Clone, PartialEq)]
/// Enum for specifing the type of Filler.
pub enum FillerType {
    /// Fills the weight matrix with a constant `value` (all values are the same).
    Constant {
        /// The value that will be used to fill the matrix.
        value: f64
    },
    /// Fills the weight matrix with values drawn from a normal distribution.
    ///
    /// Hinton recommends a zero mean and a standard deviation of 0.01 for RBMs.
    Gaussian {
        /// Mean of the distribution.
        mean: f64,
        /// Standard deviation of the distribution.
        std: f64,
    },
    /// Fills the weight matrix based on the paper:
    ///
    /// `[Bengio and Glorot 2010]: Understanding the difficulty of training deep feedforward neural networks.`
    ///
    /// Also known as Xavier filler.
    Glorot {
        /// Number of input nodes for each output.
        input_size: usize,
        /// Number of output nodes for each input.
        output_size: usize,
    },
}

impl Default for FillerType {
    fn default() -> FillerType {
        FillerType::Gaussian { mean: 0f64, std: 0.01f64 }
    }
}

impl FillerType {
    /// Uses a filler as specified by this FillerType to fill the values of a weight matrix.
    ///
    /// This filling of weights is usually done directly after creation of the model.
    pub fn fill<R: Rng>(&self, weight: &mut Array2<f64>, rng: &mut R) {
        match *self {
            FillerType::Constant { value } => Self::fill_constant(weight, value),
            FillerType::Gaussian { mean, std } => Self::fill_gaussian(weight, mean, std, rng),
            FillerType::Glorot { input_size, output_size } => Self::fill_glorot(weight, input_size, output_size, rng),
        }
    }

    /// Directly use the [Constant Filler](#variant.Constant).
    pub fn fill_constant(weight: &mut Array2<f64>, value: f64) {
        weight.fill(value);
    }

    /// Directly use the [Gaussian Filler](#variant.Gaussian).
    pub fn fill_gaussian<R: Rng>(weight: &mut Array2<f64>, mean: f64, std: f64, rng: &mut R) {
        let normal = Normal::new(mean, std.abs());
        for e in weight.iter_mut() {
            *e = normal.ind_sample(rng);
        }
    }

    /// Directly use the [Glorot Filler](#variant.Glorot).
    pub fn fill_glorot<R: Rng>(weight: &mut Array2<f64>, num_inputs: usize, num_outputs: usize, rng: &mut R) {
        let init_range = (6.0f64 / (num_inputs as f64 + num_outputs as f64)).sqrt();
        if !init_range.is_finite() {
            return Self::fill_constant(weight, 0f64);
        }

        let between = Range::new(-init_range, init_range);
        for e in weight.iter_mut() {
            *e = between.ind_sample(rng);
        }
    }
}
