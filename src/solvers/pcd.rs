//! [Persistent Contrastive Divergence][1] with `k` Gibbs steps.
//! [1]: https://www.cs.toronto.edu/~tijmen/pcd/pcd.pdf
//!
//! The negative phase continues the chains of the previous update instead of
//! restarting them from the data. There is one chain per position in the batch,
//! created from the hidden sample of the data the first time it is used.
use ndarray::Array1;
use rand::StdRng;
use batch::Batch;
use context::TrainingContext;
use error::Result;
use rbm::Rbm;
use super::{CdCore, ITrainer};

#[derive(Debug)]
/// Persistent Contrastive Divergence trainer.
///
/// See [module description][1] for more information.
/// [1]: ./index.html
pub struct PersistentContrastiveDivergence {
    core: CdCore,
    /// Hidden state of every persistent chain.
    chains: Vec<Array1<f64>>,
}

impl PersistentContrastiveDivergence {
    /// Create a new PCD-k trainer for `rbm`.
    ///
    /// Should not be called directly.
    /// Use [TrainerKind::with_rbm][1] instead.
    ///
    /// [1]: ../enum.TrainerKind.html#method.with_rbm
    pub fn new(rbm: &Rbm, steps: usize, rng: StdRng) -> PersistentContrastiveDivergence {
        PersistentContrastiveDivergence {
            core: CdCore::new(rbm, steps, rng),
            chains: Vec::new(),
        }
    }

    /// Number of Gibbs steps per update.
    pub fn steps(&self) -> usize {
        self.core.steps
    }

    /// Hidden states of the persistent chains.
    pub fn chains(&self) -> &[Array1<f64>] {
        &self.chains
    }
}

impl ITrainer for PersistentContrastiveDivergence {
    fn train_batch(&mut self,
                   rbm: &mut Rbm,
                   input: &Batch<Vec<f64>>,
                   expected: &Batch<Vec<f64>>,
                   context: &mut TrainingContext)
                   -> Result<()> {
        self.core.train_batch(rbm, input, expected, context, Some(&mut self.chains))
    }
}
