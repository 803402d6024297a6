//! Provides the contrastive divergence trainers for the [Rbm][rbm].
//!
//! The gradient of the log-likelihood of an RBM is the difference between the
//! correlations of visible and hidden units under the data (the *positive phase*)
//! and under the model (the *negative phase*). The model expectation is
//! intractable, so [contrastive divergence][cd] approximates it with a short
//! Gibbs chain:
//!
//! - [CD-k][cd] starts the chain from the hidden sample of the data and runs `k` steps.
//! - [PCD-k][pcd] keeps the chain state between batches, so the chain continues
//!   where the previous update left it.
//!
//! All trainers share the same update rule:
//!
//! - `W += lr * (v1^T h1 - v2^T h2) / n`, plus momentum, decay and sparsity when configured.
//!
//! [rbm]: ../rbm/struct.Rbm.html
//! [cd]: https://www.cs.toronto.edu/~hinton/absps/tr00-004.pdf
//! [pcd]: https://www.cs.toronto.edu/~tijmen/pcd/pcd.pdf
pub use self::cd::ContrastiveDivergence;
pub use self::pcd::PersistentContrastiveDivergence;

pub mod cd;
pub mod pcd;

use std::fmt;
use ndarray::{Array, Array1, Array2, ArrayView1, ArrayViewMut1, Axis, Dimension, Zip};
use ndarray::linalg::general_mat_vec_mul;
use rand::StdRng;
use rayon::prelude::*;
use batch::Batch;
use context::TrainingContext;
use error::Result;
use math::sign;
use rbm::{DecayKind, Rbm, SparsityMethod};
use util::check_finite;

/// A trainer that updates an [Rbm][1] from one batch at a time.
/// [1]: ../rbm/struct.Rbm.html
pub trait ITrainer {
    /// Run one update of `rbm` on a batch.
    ///
    /// The hidden activations of the positive phase are computed from `input`,
    /// the reconstruction is compared against `expected`. For ordinary training
    /// both batches are the same samples.
    ///
    /// The statistics of the batch are accumulated into `context`.
    fn train_batch(&mut self,
                   rbm: &mut Rbm,
                   input: &Batch<Vec<f64>>,
                   expected: &Batch<Vec<f64>>,
                   context: &mut TrainingContext)
                   -> Result<()>;
}

impl fmt::Debug for dyn ITrainer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", "ITrainer")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// All available contrastive divergence variants.
pub enum TrainerKind {
    /// Contrastive divergence with a single Gibbs step.
    CD1,
    /// Contrastive divergence with `k` Gibbs steps.
    CDk(usize),
    /// Persistent contrastive divergence with `k` Gibbs steps per update.
    PCD(usize),
}

impl TrainerKind {
    /// Number of Gibbs steps per update.
    pub fn steps(&self) -> usize {
        match *self {
            TrainerKind::CD1 => 1,
            TrainerKind::CDk(k) | TrainerKind::PCD(k) => k,
        }
    }

    /// Whether the Gibbs chain persists across batches.
    pub fn is_persistent(&self) -> bool {
        match *self {
            TrainerKind::PCD(_) => true,
            _ => false,
        }
    }

    /// Create a trainer of this kind for `rbm`, drawing its samples from `rng`.
    pub fn with_rbm(&self, rbm: &Rbm, rng: StdRng) -> Box<dyn ITrainer> {
        let steps = self.steps();
        match *self {
            TrainerKind::CD1 | TrainerKind::CDk(_) => Box::new(ContrastiveDivergence::new(rbm, steps, rng)),
            TrainerKind::PCD(_) => Box::new(PersistentContrastiveDivergence::new(rbm, steps, rng)),
        }
    }
}

/// Shared state of the contrastive divergence trainers.
///
/// Holds the states of a batch, one sample per row, the gradients and the
/// running averages of the hidden activations used for sparsity.
struct CdCore {
    steps: usize,
    rng: StdRng,

    v1: Array2<f64>,
    h1_a: Array2<f64>,
    h1_s: Array2<f64>,
    v2_a: Array2<f64>,
    h2_a: Array2<f64>,
    h2_s: Array2<f64>,

    w_grad: Array2<f64>,
    vb_grad: Array1<f64>,
    hb_grad: Array1<f64>,

    q_batch: Array1<f64>,
    q_local: Array1<f64>,
    q_global: f64,
    q_started: bool,
}

impl fmt::Debug for CdCore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CdCore {{ steps: {}, gradient: {:?} }}", self.steps, self.w_grad.dim())
    }
}

impl CdCore {
    fn new(rbm: &Rbm, steps: usize, rng: StdRng) -> CdCore {
        let num_visible = rbm.num_visible();
        let num_hidden = rbm.num_hidden();
        CdCore {
            steps: steps,
            rng: rng,

            v1: Array2::zeros((0, num_visible)),
            h1_a: Array2::zeros((0, num_hidden)),
            h1_s: Array2::zeros((0, num_hidden)),
            v2_a: Array2::zeros((0, num_visible)),
            h2_a: Array2::zeros((0, num_hidden)),
            h2_s: Array2::zeros((0, num_hidden)),

            w_grad: Array2::zeros((num_visible, num_hidden)),
            vb_grad: Array1::zeros(num_visible),
            hb_grad: Array1::zeros(num_hidden),

            q_batch: Array1::zeros(num_hidden),
            q_local: Array1::zeros(num_hidden),
            q_global: 0f64,
            q_started: false,
        }
    }

    fn resize(&mut self, n: usize) {
        for states in &mut [&mut self.v1, &mut self.h1_a, &mut self.h1_s, &mut self.v2_a, &mut self.h2_a, &mut self.h2_s] {
            let width = states.ncols();
            if states.nrows() != n {
                **states = Array2::zeros((n, width));
            }
        }
    }

    /// One contrastive divergence update of `rbm`.
    ///
    /// With `chains` the negative phase starts from, and writes back to, the
    /// persistent chains. Missing chains start from the positive hidden sample.
    fn train_batch(&mut self,
                   rbm: &mut Rbm,
                   input: &Batch<Vec<f64>>,
                   expected: &Batch<Vec<f64>>,
                   context: &mut TrainingContext,
                   chains: Option<&mut Vec<Array1<f64>>>)
                   -> Result<()> {
        let n = input.len();
        if n == 0 {
            return Ok(());
        }
        let parallel = rbm.config().parallel;
        self.resize(n);

        // positive phase
        copy_rows(input, &mut self.v1);
        hidden_pass(rbm, &self.v1, &mut self.h1_a, parallel)?;
        for (h_a, h_s) in self.h1_a.outer_iter().zip(self.h1_s.outer_iter_mut()) {
            rbm.sample_hidden(h_a, h_s, &mut self.rng)?;
        }

        // negative phase
        let mut chains = chains;
        match chains {
            Some(ref mut chains) => {
                while chains.len() < n {
                    let start = chains.len();
                    chains.push(self.h1_s.row(start).to_owned());
                }
                for (mut h_s, chain) in self.h2_s.outer_iter_mut().zip(chains.iter()) {
                    h_s.assign(chain);
                }
            }
            None => self.h2_s.assign(&self.h1_s),
        }
        for _ in 0..self.steps {
            visible_pass(rbm, &self.h2_s, &mut self.v2_a, parallel)?;
            hidden_pass(rbm, &self.v2_a, &mut self.h2_a, parallel)?;
            for (h_a, h_s) in self.h2_a.outer_iter().zip(self.h2_s.outer_iter_mut()) {
                rbm.sample_hidden(h_a, h_s, &mut self.rng)?;
            }
        }
        if let Some(chains) = chains {
            for (chain, h_s) in chains.iter_mut().zip(self.h2_s.outer_iter()) {
                chain.assign(&h_s);
            }
        }

        // the gradient compares the reconstruction against the expected samples
        copy_rows(expected, &mut self.v1);
        self.compute_gradients(parallel);
        self.apply_decay(rbm);
        let q_batch = self.apply_sparsity(rbm);

        check_finite(self.w_grad.iter(), "weight gradient")?;
        check_finite(self.vb_grad.iter(), "visible bias gradient")?;
        check_finite(self.hb_grad.iter(), "hidden bias gradient")?;

        self.apply_update(rbm)?;

        let error = (&self.v1 - &self.v2_a).mapv(|d| d * d).sum();
        context.reconstruction_error += error / (n * rbm.num_visible()) as f64;
        context.sparsity += q_batch;

        if rbm.config().free_energy {
            for v in input.iter() {
                context.free_energy += rbm.free_energy(v)?;
            }
        }

        Ok(())
    }

    /// Positive minus negative statistics, averaged over the batch.
    ///
    /// Row `i` of the weight gradient is `(h1^T v1[.., i] - h2^T v2[.., i]) / n`.
    fn compute_gradients(&mut self, parallel: bool) {
        let n = self.v1.nrows() as f64;
        {
            let h1 = &self.h1_a;
            let h2 = &self.h2_a;
            let weight_row = |mut row: ArrayViewMut1<f64>, p: ArrayView1<f64>, q: ArrayView1<f64>| {
                general_mat_vec_mul(1f64 / n, &h1.t(), &p, 0f64, &mut row);
                general_mat_vec_mul(-1f64 / n, &h2.t(), &q, 1f64, &mut row);
            };
            let rows = Zip::from(self.w_grad.rows_mut()).and(self.v1.columns()).and(self.v2_a.columns());
            if parallel {
                rows.par_for_each(weight_row);
            } else {
                rows.for_each(weight_row);
            }
        }

        self.vb_grad = (self.v1.sum_axis(Axis(0)) - self.v2_a.sum_axis(Axis(0))) / n;
        self.hb_grad = (self.h1_a.sum_axis(Axis(0)) - self.h2_a.sum_axis(Axis(0))) / n;
    }

    fn apply_decay(&mut self, rbm: &Rbm) {
        let rate = rbm.decay_rate;
        let penalty: fn(f64) -> f64 = match rbm.decay {
            DecayKind::None => return,
            DecayKind::L1 | DecayKind::L1Full => sign,
            DecayKind::L2 | DecayKind::L2Full => identity,
        };
        let decay = |g: &mut f64, &p: &f64| *g -= rate * penalty(p);

        Zip::from(&mut self.w_grad).and(rbm.weights()).for_each(decay);
        if rbm.decay.is_full() {
            Zip::from(&mut self.vb_grad).and(rbm.visible_bias()).for_each(decay);
            Zip::from(&mut self.hb_grad).and(rbm.hidden_bias()).for_each(decay);
        }
    }

    /// Pulls the hidden biases towards the sparsity target.
    ///
    /// Returns the mean hidden activation of the batch.
    fn apply_sparsity(&mut self, rbm: &Rbm) -> f64 {
        self.q_batch = self.h1_a.sum_axis(Axis(0)) / self.h1_a.nrows() as f64;
        let q_batch = self.q_batch.sum() / self.q_batch.len() as f64;

        let decay = rbm.sparsity_decay;
        let target = rbm.sparsity_target;
        let cost = rbm.sparsity_cost;
        let started = self.q_started;
        let running = |q: f64, q_batch: f64| if started { decay * q + (1f64 - decay) * q_batch } else { q_batch };
        match rbm.sparsity {
            SparsityMethod::None => {}
            SparsityMethod::GlobalTarget => {
                self.q_global = running(self.q_global, q_batch);
                self.hb_grad -= cost * (self.q_global - target);
            }
            SparsityMethod::LocalTarget => {
                Zip::from(&mut self.q_local).and(&self.q_batch).and(&mut self.hb_grad).for_each(|q, &q_batch, g| {
                    *q = running(*q, q_batch);
                    *g -= cost * (*q - target);
                });
            }
        }
        self.q_started = true;

        q_batch
    }

    /// `velocity = lr * grad + momentum * velocity`, then `param += velocity`.
    fn apply_update(&self, rbm: &mut Rbm) -> Result<()> {
        let lr = rbm.learning_rate;
        let momentum = rbm.effective_momentum();

        momentum_step(&mut rbm.weights, &mut rbm.weight_velocity, &self.w_grad, lr, momentum);
        momentum_step(&mut rbm.visible_bias, &mut rbm.visible_bias_velocity, &self.vb_grad, lr, momentum);
        momentum_step(&mut rbm.hidden_bias, &mut rbm.hidden_bias_velocity, &self.hb_grad, lr, momentum);

        check_finite(rbm.weights.iter(), "weights")?;
        check_finite(rbm.visible_bias.iter(), "visible bias")?;
        check_finite(rbm.hidden_bias.iter(), "hidden bias")
    }
}

fn identity(x: f64) -> f64 {
    x
}

fn momentum_step<D: Dimension>(param: &mut Array<f64, D>,
                               velocity: &mut Array<f64, D>,
                               grad: &Array<f64, D>,
                               lr: f64,
                               momentum: f64) {
    *velocity *= momentum;
    velocity.scaled_add(lr, grad);
    *param += &*velocity;
}

/// Copies the samples of `batch` into the rows of `states`.
fn copy_rows(batch: &Batch<Vec<f64>>, states: &mut Array2<f64>) {
    for (mut row, sample) in states.outer_iter_mut().zip(batch.iter()) {
        row.assign(&ArrayView1::from(&sample[..]));
    }
}

/// Hidden probabilities for every visible state.
fn hidden_pass(rbm: &Rbm, visible: &Array2<f64>, hidden: &mut Array2<f64>, parallel: bool) -> Result<()> {
    if parallel {
        hidden.axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(visible.axis_iter(Axis(0)).into_par_iter())
            .map(|(h, v)| rbm.activate_hidden(v, h))
            .collect()
    } else {
        hidden.outer_iter_mut().zip(visible.outer_iter()).map(|(h, v)| rbm.activate_hidden(v, h)).collect()
    }
}

/// Visible probabilities for every hidden state.
fn visible_pass(rbm: &Rbm, hidden: &Array2<f64>, visible: &mut Array2<f64>, parallel: bool) -> Result<()> {
    if parallel {
        visible.axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(hidden.axis_iter(Axis(0)).into_par_iter())
            .map(|(v, h)| rbm.activate_visible(h, v))
            .collect()
    } else {
        visible.outer_iter_mut().zip(hidden.outer_iter()).map(|(v, h)| rbm.activate_visible(h, v)).collect()
    }
}
