//! Provides the driver of the training of a single [Rbm][rbm].
//!
//! The [Solver][solver] runs the epochs: it shuffles the data, cuts it into
//! batches, hands every batch to the configured [trainer][solvers] and reports
//! the averaged statistics of each epoch to its [watcher][watcher].
//!
//! [rbm]: ../rbm/struct.Rbm.html
//! [solver]: ./struct.Solver.html
//! [solvers]: ../solvers/index.html
//! [watcher]: ../watcher/index.html

pub mod confusion_matrix;

pub use self::confusion_matrix::{Accuracy, ConfusionMatrix};

use rand::Rng;
use batch::make_batches;
use context::TrainingContext;
use error::{ConfigError, Result};
use rbm::{Rbm, SparsityMethod};
use units::UnitType;
use util::seeded_rng;
use watcher::{IWatcher, WatcherKind};

/// Random stream of the trainer's Gibbs sampling.
const TRAIN_STREAM: usize = 1;
/// First random stream of the per-epoch shuffling; epoch `e` uses `SHUFFLE_STREAM + e`.
const SHUFFLE_STREAM: usize = 2;

#[derive(Debug)]
/// Solver that trains an [Rbm][1] with contrastive divergence.
/// [1]: ../rbm/struct.Rbm.html
pub struct Solver {
    watcher: Box<dyn IWatcher>,
}

impl Solver {
    /// Create a Solver reporting to `watcher`.
    pub fn new(watcher: Box<dyn IWatcher>) -> Solver {
        Solver { watcher: watcher }
    }

    /// Create a Solver with a watcher of the given kind.
    pub fn from_kind(kind: WatcherKind) -> Solver {
        Solver::new(kind.create())
    }

    /// Returns the watcher of the solver.
    pub fn watcher(&self) -> &dyn IWatcher {
        &*self.watcher
    }

    /// Train `rbm` on `data` for `max_epochs` epochs.
    ///
    /// Epochs are numbered from 1. Returns the average reconstruction error of
    /// the last epoch, or 0 when `max_epochs` is 0.
    ///
    /// The caller's data is never reordered; shuffling works on a copy.
    pub fn train(&mut self, rbm: &mut Rbm, data: &[Vec<f64>], max_epochs: usize) -> Result<f64> {
        self.run(rbm, data, None, max_epochs)
    }

    /// Train `rbm` to reconstruct `clean` from the corrupted samples `noisy`.
    ///
    /// The positive phase is driven by the noisy sample, the gradient and the
    /// reconstruction error use the clean sample at the same position.
    /// Shuffling applies the same permutation to both data sets.
    pub fn train_denoising(&mut self,
                           rbm: &mut Rbm,
                           noisy: &[Vec<f64>],
                           clean: &[Vec<f64>],
                           max_epochs: usize)
                           -> Result<f64> {
        if noisy.len() != clean.len() {
            return Err(ConfigError::LengthMismatch {
                what: "clean samples",
                expected: noisy.len(),
                actual: clean.len(),
            }.into());
        }
        for (index, sample) in clean.iter().enumerate() {
            rbm.check_sample(index, sample)?;
        }
        self.run(rbm, noisy, Some(clean), max_epochs)
    }

    fn run(&mut self,
           rbm: &mut Rbm,
           input: &[Vec<f64>],
           expected: Option<&[Vec<f64>]>,
           max_epochs: usize)
           -> Result<f64> {
        if input.is_empty() {
            return Err(ConfigError::EmptyDataset.into());
        }
        for (index, sample) in input.iter().enumerate() {
            rbm.check_sample(index, sample)?;
        }

        let config = rbm.config().clone();
        if config.batch_size > input.len() {
            warn!("batch size {} is larger than the data set ({} samples)", config.batch_size, input.len());
        }
        if config.sparsity != SparsityMethod::None && config.hidden_unit != UnitType::Binary {
            warn!("sparsity targets assume binary hidden units, got {:?}", config.hidden_unit);
        }
        if rbm.learning_rate <= 0f64 {
            warn!("learning rate {} will not move the parameters", rbm.learning_rate);
        }

        rbm.momentum = rbm.initial_momentum;
        self.watcher.training_begin(rbm);

        if config.init_weights {
            rbm.init_weights(expected.unwrap_or(input))?;
        }

        let mut trainer = config.trainer.with_rbm(rbm, seeded_rng(config.seed, TRAIN_STREAM));

        let mut order: Vec<usize> = (0..input.len()).collect();
        let mut shuffled_input = input.to_vec();
        let mut shuffled_expected = expected.map(|e| e.to_vec()).unwrap_or_default();

        let mut last_error = 0f64;
        for epoch in 1..max_epochs + 1 {
            rbm.update_momentum(epoch);

            if config.shuffle {
                let mut rng = seeded_rng(config.seed, SHUFFLE_STREAM + epoch);
                rng.shuffle(&mut order);
                for (slot, &index) in order.iter().enumerate() {
                    shuffled_input[slot].copy_from_slice(&input[index]);
                    if let Some(expected) = expected {
                        shuffled_expected[slot].copy_from_slice(&expected[index]);
                    }
                }
            }

            let targets: &[Vec<f64>] = if expected.is_some() { &shuffled_expected } else { &shuffled_input };
            let input_batches = make_batches(&shuffled_input, config.batch_size);
            let expected_batches = make_batches(targets, config.batch_size);

            let mut context = TrainingContext::new();
            for (input_batch, expected_batch) in input_batches.iter().zip(expected_batches.iter()) {
                trainer.train_batch(rbm, input_batch, expected_batch, &mut context)?;
                context.batches += 1;
                context.samples += input_batch.len();
                debug!("epoch {} batch {}: accumulated error {:.5}", epoch, context.batches, context.reconstruction_error);
            }
            context.average();
            last_error = context.reconstruction_error;

            self.watcher.epoch_end(epoch, &context, rbm);
        }

        self.watcher.training_end(rbm);
        Ok(last_error)
    }
}
