//! Provides the Restricted Boltzmann Machine model.
//!
//! An RBM is a two-layer undirected probabilistic model with visible units `v`
//! and hidden units `h`, and no connection between units of the same layer.
//! It is defined by a weight matrix `W` (`num_visible x num_hidden`), the
//! visible biases `c` and the hidden biases `b`.
//!
//! The [Rbm][rbm] owns its parameters and hyperparameters but holds no training
//! logic itself. Training is driven by the [Solver][solver], which runs one of the
//! [contrastive divergence trainers][solvers] over batches of the data.
//!
//! ## Energy
//!
//! For binary visible and binary hidden units:
//!
//! * `E(v,h) = -c.v - b.h - v.W.h`
//! * `F(v) = -c.v - sum_j log(1 + e^(b_j + (v.W)_j))`
//!
//! For gaussian visible and binary hidden units:
//!
//! * `E(v,h) = sum_i (v_i - c_i)^2 / 2 - b.h - v.W.h`
//! * `F(v) = sum_i (v_i - c_i)^2 / 2 - sum_j log(1 + e^(b_j + (v.W)_j))`
//!
//! The energy of any other unit combination is reported as zero.
//!
//! [rbm]: ./struct.Rbm.html
//! [solver]: ../solver/struct.Solver.html
//! [solvers]: ../solvers/index.html
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};
use ndarray::linalg::general_mat_vec_mul;
use rand::Rng;
use error::{ConfigError, Result};
use math::softplus;
use solver::Solver;
use solvers::TrainerKind;
use units::UnitType;
use util::{check_finite, seeded_rng};
use watcher::WatcherKind;
use weight::FillerType;

/// Random stream used for the weight initialization of a model.
const INIT_STREAM: usize = 0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// [Weight decay][1] applied to the gradients.
/// [1]: https://www.cs.toronto.edu/~hinton/absps/guideTR.pdf
pub enum DecayKind {
    /// No weight decay.
    None,
    /// L1 decay on the weights: `grad -= rate * sign(W)`.
    L1,
    /// L1 decay on the weights and the biases.
    L1Full,
    /// L2 decay on the weights: `grad -= rate * W`.
    L2,
    /// L2 decay on the weights and the biases.
    L2Full,
}

impl DecayKind {
    /// Whether the biases are penalized as well.
    pub fn is_full(&self) -> bool {
        *self == DecayKind::L1Full || *self == DecayKind::L2Full
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Method used to pull the hidden activations towards a sparsity target.
pub enum SparsityMethod {
    /// No sparsity regularization.
    None,
    /// A single running average of all the hidden activations is compared to the target.
    GlobalTarget,
    /// A running average per hidden unit is compared to the target.
    LocalTarget,
}

#[derive(Debug, Clone)]
/// Specifies the configuration of an [Rbm][1] and of its training.
/// [1]: ./struct.Rbm.html
pub struct RbmConfig {
    /// Number of visible units.
    pub visible_units: usize,
    /// Number of hidden units.
    pub hidden_units: usize,
    /// Type of the visible units. Softmax is not supported.
    ///
    /// Default: Binary
    pub visible_unit: UnitType,
    /// Type of the hidden units. Gaussian is not supported.
    ///
    /// Default: Binary
    pub hidden_unit: UnitType,
    /// Number of samples per batch.
    ///
    /// Default: 1
    pub batch_size: usize,
    /// The learning rate.
    ///
    /// If set to `None` a rate suited to the unit types is chosen:
    /// `1e-5` for gaussian visible with rectified hidden units,
    /// `1e-3` for gaussian visible or rectified hidden units and `1e-1` otherwise.
    ///
    /// Default: None
    pub learning_rate: Option<f64>,
    /// Whether the parameter updates use [momentum][1].
    /// [1]: https://en.wikipedia.org/wiki/Stochastic_gradient_descent#Momentum
    ///
    /// Default: false
    pub momentum: bool,
    /// Momentum used before `momentum_switch_epoch`.
    ///
    /// Default: 0.5
    pub initial_momentum: f64,
    /// Momentum used from `momentum_switch_epoch` on.
    ///
    /// Default: 0.9
    pub final_momentum: f64,
    /// The epoch at which the momentum switches from initial to final.
    /// Epochs are numbered from 1, so 0 and 1 both switch before the first update.
    ///
    /// Default: 6
    pub momentum_switch_epoch: usize,
    /// The weight decay applied to the gradients.
    ///
    /// Default: DecayKind::None
    pub decay: DecayKind,
    /// The weight decay multiplier.
    ///
    /// Default: 0.0002
    pub decay_rate: f64,
    /// The sparsity regularization.
    ///
    /// Default: SparsityMethod::None
    pub sparsity: SparsityMethod,
    /// Desired average activation of the hidden units.
    ///
    /// Default: 0.01
    pub sparsity_target: f64,
    /// Strength of the sparsity penalty.
    ///
    /// Default: 1.0
    pub sparsity_cost: f64,
    /// Decay of the running average of the hidden activations.
    ///
    /// Default: 0.9
    pub sparsity_decay: f64,
    /// The contrastive divergence variant used for training.
    ///
    /// Default: TrainerKind::CD1
    pub trainer: TrainerKind,
    /// Initialize the visible biases from the marginal statistics of the training data.
    ///
    /// Default: false
    pub init_weights: bool,
    /// Shuffle the training data before every epoch.
    ///
    /// Default: false
    pub shuffle: bool,
    /// Spread the per-sample work of a batch over a thread pool.
    ///
    /// Default: false
    pub parallel: bool,
    /// Accumulate the free energy of the training data into the epoch statistics.
    ///
    /// Default: false
    pub free_energy: bool,
    /// The filler that initializes the weights.
    ///
    /// Default: FillerType::Gaussian { mean: 0.0, std: 0.01 }
    pub weight_filler: FillerType,
    /// The watcher notified during training.
    ///
    /// Default: WatcherKind::Default
    pub watcher: WatcherKind,
    /// Seed of all the random generators of the model.
    /// If set to `None` every run uses fresh entropy.
    ///
    /// Default: None
    pub seed: Option<usize>,
}

impl Default for RbmConfig {
    fn default() -> RbmConfig {
        RbmConfig {
            visible_units: 0,
            hidden_units: 0,
            visible_unit: UnitType::Binary,
            hidden_unit: UnitType::Binary,

            batch_size: 1,
            learning_rate: None,

            momentum: false,
            initial_momentum: 0.5f64,
            final_momentum: 0.9f64,
            momentum_switch_epoch: 6,

            decay: DecayKind::None,
            decay_rate: 0.0002f64,

            sparsity: SparsityMethod::None,
            sparsity_target: 0.01f64,
            sparsity_cost: 1f64,
            sparsity_decay: 0.9f64,

            trainer: TrainerKind::CD1,
            init_weights: false,
            shuffle: false,
            parallel: false,
            free_energy: false,

            weight_filler: FillerType::default(),
            watcher: WatcherKind::Default,
            seed: None,
        }
    }
}

impl RbmConfig {
    /// Create a default configuration for an RBM with the given number of units.
    pub fn new(visible_units: usize, hidden_units: usize) -> RbmConfig {
        RbmConfig {
            visible_units: visible_units,
            hidden_units: hidden_units,
            ..RbmConfig::default()
        }
    }

    /// Checks the configuration for combinations that can not be trained.
    pub fn validate(&self) -> Result<()> {
        if !self.visible_unit.supports_visible() || !self.hidden_unit.supports_hidden() {
            return Err(ConfigError::UnsupportedUnits {
                visible: self.visible_unit,
                hidden: self.hidden_unit,
            }.into());
        }
        if self.visible_units == 0 || self.hidden_units == 0 {
            return Err(ConfigError::EmptyLayer {
                visible: self.visible_units,
                hidden: self.hidden_units,
            }.into());
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize.into());
        }
        if self.trainer.steps() == 0 {
            return Err(ConfigError::ZeroGibbsSteps.into());
        }
        Ok(())
    }

    /// Return the learning rate, falling back to the unit-type dependent default.
    pub fn learning_rate(&self) -> f64 {
        match self.learning_rate {
            Some(rate) => rate,
            None => default_learning_rate(self.visible_unit, self.hidden_unit),
        }
    }
}

/// Learning rate suited to a unit combination.
///
/// Only ReLU and Gaussian units need a lower rate.
pub fn default_learning_rate(visible: UnitType, hidden: UnitType) -> f64 {
    if visible == UnitType::Gaussian && hidden.is_relu() {
        1e-5
    } else if visible == UnitType::Gaussian || hidden.is_relu() {
        1e-3
    } else {
        1e-1
    }
}

#[derive(Debug, Clone)]
/// Restricted Boltzmann Machine
pub struct Rbm {
    num_visible: usize,
    num_hidden: usize,
    visible_unit: UnitType,
    hidden_unit: UnitType,

    pub(crate) weights: Array2<f64>,
    pub(crate) visible_bias: Array1<f64>,
    pub(crate) hidden_bias: Array1<f64>,

    pub(crate) weight_velocity: Array2<f64>,
    pub(crate) visible_bias_velocity: Array1<f64>,
    pub(crate) hidden_bias_velocity: Array1<f64>,

    /// The learning rate.
    pub learning_rate: f64,
    /// The momentum currently applied to the updates.
    pub momentum: f64,
    /// Momentum used before `momentum_switch_epoch`.
    pub initial_momentum: f64,
    /// Momentum used from `momentum_switch_epoch` on.
    pub final_momentum: f64,
    /// The epoch at which the momentum switches from initial to final.
    pub momentum_switch_epoch: usize,
    /// The weight decay applied to the gradients.
    pub decay: DecayKind,
    /// The weight decay multiplier.
    pub decay_rate: f64,
    /// The sparsity regularization.
    pub sparsity: SparsityMethod,
    /// Desired average activation of the hidden units.
    pub sparsity_target: f64,
    /// Strength of the sparsity penalty.
    pub sparsity_cost: f64,
    /// Decay of the running average of the hidden activations.
    pub sparsity_decay: f64,

    config: RbmConfig,
}

impl Rbm {
    /// Create an Rbm from an [RbmConfig][1].
    /// [1]: ./struct.RbmConfig.html
    ///
    /// Fails if the unit combination is not supported or a dimension is zero.
    pub fn from_config(config: &RbmConfig) -> Result<Rbm> {
        config.validate()?;

        let num_visible = config.visible_units;
        let num_hidden = config.hidden_units;

        let mut weights = Array2::zeros((num_visible, num_hidden));
        let mut rng = seeded_rng(config.seed, INIT_STREAM);
        config.weight_filler.fill(&mut weights, &mut rng);
        check_finite(weights.iter(), "weight filler")?;

        Ok(Rbm {
            num_visible: num_visible,
            num_hidden: num_hidden,
            visible_unit: config.visible_unit,
            hidden_unit: config.hidden_unit,

            weights: weights,
            visible_bias: Array1::zeros(num_visible),
            hidden_bias: Array1::zeros(num_hidden),

            weight_velocity: Array2::zeros((num_visible, num_hidden)),
            visible_bias_velocity: Array1::zeros(num_visible),
            hidden_bias_velocity: Array1::zeros(num_hidden),

            learning_rate: config.learning_rate(),
            momentum: config.initial_momentum,
            initial_momentum: config.initial_momentum,
            final_momentum: config.final_momentum,
            momentum_switch_epoch: config.momentum_switch_epoch,
            decay: config.decay,
            decay_rate: config.decay_rate,
            sparsity: config.sparsity,
            sparsity_target: config.sparsity_target,
            sparsity_cost: config.sparsity_cost,
            sparsity_decay: config.sparsity_decay,

            config: config.clone(),
        })
    }

    /// Create a binary/binary Rbm with the default configuration.
    pub fn new(num_visible: usize, num_hidden: usize) -> Result<Rbm> {
        Rbm::from_config(&RbmConfig::new(num_visible, num_hidden))
    }

    /// Number of visible units.
    pub fn num_visible(&self) -> usize {
        self.num_visible
    }

    /// Number of hidden units.
    pub fn num_hidden(&self) -> usize {
        self.num_hidden
    }

    /// Type of the visible units.
    pub fn visible_unit(&self) -> UnitType {
        self.visible_unit
    }

    /// Type of the hidden units.
    pub fn hidden_unit(&self) -> UnitType {
        self.hidden_unit
    }

    /// Connection weights, `num_visible x num_hidden`.
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Biases of the visible units (`c`).
    pub fn visible_bias(&self) -> &Array1<f64> {
        &self.visible_bias
    }

    /// Biases of the hidden units (`b`).
    pub fn hidden_bias(&self) -> &Array1<f64> {
        &self.hidden_bias
    }

    /// Replace all the parameters of the Rbm, e.g. with previously trained ones.
    ///
    /// Fails without touching the Rbm if a shape does not match the units of
    /// the Rbm or a value is not finite. The momentum history is cleared.
    pub fn set_parameters(&mut self,
                          weights: Array2<f64>,
                          visible_bias: Array1<f64>,
                          hidden_bias: Array1<f64>)
                          -> Result<()> {
        check_shape("weights", &[self.num_visible, self.num_hidden], weights.shape())?;
        check_shape("visible bias", &[self.num_visible], visible_bias.shape())?;
        check_shape("hidden bias", &[self.num_hidden], hidden_bias.shape())?;
        check_finite(weights.iter(), "weights")?;
        check_finite(visible_bias.iter(), "visible bias")?;
        check_finite(hidden_bias.iter(), "hidden bias")?;

        self.weights = weights;
        self.visible_bias = visible_bias;
        self.hidden_bias = hidden_bias;
        self.weight_velocity.fill(0f64);
        self.visible_bias_velocity.fill(0f64);
        self.hidden_bias_velocity.fill(0f64);
        Ok(())
    }

    /// The configuration the Rbm was created from.
    pub fn config(&self) -> &RbmConfig {
        &self.config
    }

    /// Number of samples per batch.
    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    /// Replace the contrastive divergence variant used by future training runs.
    pub fn set_trainer(&mut self, trainer: TrainerKind) -> Result<()> {
        if trainer.steps() == 0 {
            return Err(ConfigError::ZeroGibbsSteps.into());
        }
        self.config.trainer = trainer;
        Ok(())
    }

    /// Replace the watcher used by future training runs.
    pub fn set_watcher(&mut self, watcher: WatcherKind) {
        self.config.watcher = watcher;
    }

    /// The momentum the next update will use.
    ///
    /// Zero when momentum is disabled in the configuration.
    pub fn effective_momentum(&self) -> f64 {
        if self.config.momentum { self.momentum } else { 0f64 }
    }

    /// Advance the momentum schedule to `epoch`.
    ///
    /// From `momentum_switch_epoch` on the final momentum is used. The schedule
    /// only moves forward; the [Solver][1] restarts it for every training run.
    /// [1]: ../solver/struct.Solver.html
    pub fn update_momentum(&mut self, epoch: usize) {
        if epoch >= self.momentum_switch_epoch {
            self.momentum = self.final_momentum;
        }
    }

    /// Fails if `sample` does not have one value per visible unit.
    pub fn check_sample(&self, index: usize, sample: &[f64]) -> Result<()> {
        if sample.len() != self.num_visible {
            return Err(ConfigError::SampleSize {
                index: index,
                expected: self.num_visible,
                actual: sample.len(),
            }.into());
        }
        Ok(())
    }

    /// Computes the hidden activation probabilities `b + v * W` for the visible state `v`.
    pub fn activate_hidden(&self, v: ArrayView1<f64>, mut h_a: ArrayViewMut1<f64>) -> Result<()> {
        check_length("visible state", self.num_visible, v.len())?;
        check_length("hidden activations", self.num_hidden, h_a.len())?;
        h_a.assign(&self.hidden_bias);
        general_mat_vec_mul(1f64, &self.weights.t(), &v, 1f64, &mut h_a);
        self.hidden_unit.probabilities(h_a)
    }

    /// Computes the hidden activation probabilities and draws a sample from them.
    pub fn activate_hidden_sampled<R: Rng>(&self,
                                           v: ArrayView1<f64>,
                                           mut h_a: ArrayViewMut1<f64>,
                                           h_s: ArrayViewMut1<f64>,
                                           rng: &mut R)
                                           -> Result<()> {
        self.activate_hidden(v, h_a.view_mut())?;
        self.sample_hidden(h_a.view(), h_s, rng)
    }

    /// Computes the visible activation probabilities `c + W * h` for the hidden state `h`.
    pub fn activate_visible(&self, h: ArrayView1<f64>, mut v_a: ArrayViewMut1<f64>) -> Result<()> {
        check_length("hidden state", self.num_hidden, h.len())?;
        check_length("visible activations", self.num_visible, v_a.len())?;
        v_a.assign(&self.visible_bias);
        general_mat_vec_mul(1f64, &self.weights, &h, 1f64, &mut v_a);
        self.visible_unit.probabilities(v_a)
    }

    /// Computes the visible activation probabilities and draws a sample from them.
    pub fn activate_visible_sampled<R: Rng>(&self,
                                            h: ArrayView1<f64>,
                                            mut v_a: ArrayViewMut1<f64>,
                                            v_s: ArrayViewMut1<f64>,
                                            rng: &mut R)
                                            -> Result<()> {
        self.activate_visible(h, v_a.view_mut())?;
        self.sample_visible(v_a.view(), v_s, rng)
    }

    /// Draws hidden states from hidden probabilities.
    pub fn sample_hidden<R: Rng>(&self, h_a: ArrayView1<f64>, h_s: ArrayViewMut1<f64>, rng: &mut R) -> Result<()> {
        self.hidden_unit.sample(h_a, h_s, rng)
    }

    /// Draws visible states from visible probabilities.
    pub fn sample_visible<R: Rng>(&self, v_a: ArrayView1<f64>, v_s: ArrayViewMut1<f64>, rng: &mut R) -> Result<()> {
        self.visible_unit.sample(v_a, v_s, rng)
    }

    /// Runs `v -> h -> v` once and returns the reconstructed visible probabilities.
    pub fn reconstruct<R: Rng>(&self, sample: &[f64], rng: &mut R) -> Result<Vec<f64>> {
        self.check_sample(0, sample)?;

        let mut h_a: Array1<f64> = Array1::zeros(self.num_hidden);
        let mut h_s: Array1<f64> = Array1::zeros(self.num_hidden);
        let mut v_a: Array1<f64> = Array1::zeros(self.num_visible);

        self.activate_hidden_sampled(ArrayView1::from(sample), h_a.view_mut(), h_s.view_mut(), rng)?;
        self.activate_visible(h_s.view(), v_a.view_mut())?;
        Ok(v_a.to_vec())
    }

    fn energy_supported(&self) -> bool {
        self.hidden_unit == UnitType::Binary &&
            (self.visible_unit == UnitType::Binary || self.visible_unit == UnitType::Gaussian)
    }

    fn visible_term(&self, v: &ArrayView1<f64>) -> f64 {
        match self.visible_unit {
            UnitType::Gaussian => (v - &self.visible_bias).mapv(|d| d * d / 2f64).sum(),
            _ => -self.visible_bias.dot(v),
        }
    }

    /// Energy of the joint state `(v, h)`.
    pub fn energy(&self, v: &[f64], h: &[f64]) -> Result<f64> {
        self.check_sample(0, v)?;
        check_length("hidden state", self.num_hidden, h.len())?;
        if !self.energy_supported() {
            return Ok(0f64);
        }

        let v = ArrayView1::from(v);
        let h = ArrayView1::from(h);
        let x = v.dot(&self.weights);

        let energy = self.visible_term(&v) - self.hidden_bias.dot(&h) - x.dot(&h);
        check_finite(&[energy], "energy")?;
        Ok(energy)
    }

    /// Free energy of the visible state `v`, the hidden units being integrated out.
    pub fn free_energy(&self, v: &[f64]) -> Result<f64> {
        self.check_sample(0, v)?;
        if !self.energy_supported() {
            return Ok(0f64);
        }

        let v = ArrayView1::from(v);
        let x = v.dot(&self.weights) + &self.hidden_bias;

        let hidden_term = x.mapv(softplus).sum();
        let free_energy = self.visible_term(&v) - hidden_term;
        check_finite(&[free_energy], "free energy")?;
        Ok(free_energy)
    }

    /// Initialize the visible biases to `log(p / (1 - p))`, where `p` is the
    /// mean value of each visible unit in `data`.
    ///
    /// For binary data the mean is the activation frequency. `p` is clamped
    /// away from 0 and 1 so the logarithm stays finite.
    pub fn init_weights(&mut self, data: &[Vec<f64>]) -> Result<()> {
        if data.is_empty() {
            return Err(ConfigError::EmptyDataset.into());
        }
        for (index, sample) in data.iter().enumerate() {
            self.check_sample(index, sample)?;
        }

        let mut p: Array1<f64> = Array1::zeros(self.num_visible);
        for sample in data {
            p += &ArrayView1::from(&sample[..]);
        }
        p /= data.len() as f64;

        let visible_bias = p.mapv(|p| {
            let p = p.max(1e-4).min(1f64 - 1e-4);
            (p / (1f64 - p)).ln()
        });
        check_finite(visible_bias.iter(), "visible bias initialization")?;
        self.visible_bias = visible_bias;
        Ok(())
    }

    /// Train the Rbm on `data` for `max_epochs` with the configured watcher.
    ///
    /// Returns the average reconstruction error of the last epoch.
    pub fn train(&mut self, data: &[Vec<f64>], max_epochs: usize) -> Result<f64> {
        let mut solver = Solver::from_kind(self.config.watcher);
        solver.train(self, data, max_epochs)
    }
}

fn check_length(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ConfigError::LengthMismatch { what: what, expected: expected, actual: actual }.into());
    }
    Ok(())
}

fn check_shape(what: &'static str, expected: &[usize], actual: &[usize]) -> Result<()> {
    if expected != actual {
        return Err(ConfigError::ParameterShape {
            what: what,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }.into());
    }
    Ok(())
}
