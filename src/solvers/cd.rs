//! [Contrastive Divergence][1] with `k` Gibbs steps.
//! [1]: https://www.cs.toronto.edu/~hinton/absps/tr00-004.pdf
//!
//! Every update starts a fresh chain from the hidden sample of the data.
//! CD-1 is usually enough to learn good features, more steps give a better
//! estimate of the model expectation at a higher cost.
use rand::StdRng;
use batch::Batch;
use context::TrainingContext;
use error::Result;
use rbm::Rbm;
use super::{CdCore, ITrainer};

#[derive(Debug)]
/// Contrastive Divergence trainer.
///
/// See [module description][1] for more information.
/// [1]: ./index.html
pub struct ContrastiveDivergence {
    core: CdCore,
}

impl ContrastiveDivergence {
    /// Create a new CD-k trainer for `rbm`.
    ///
    /// Should not be called directly.
    /// Use [TrainerKind::with_rbm][1] instead.
    ///
    /// [1]: ../enum.TrainerKind.html#method.with_rbm
    pub fn new(rbm: &Rbm, steps: usize, rng: StdRng) -> ContrastiveDivergence {
        ContrastiveDivergence { core: CdCore::new(rbm, steps, rng) }
    }

    /// Number of Gibbs steps per update.
    pub fn steps(&self) -> usize {
        self.core.steps
    }
}

impl ITrainer for ContrastiveDivergence {
    fn train_batch(&mut self,
                   rbm: &mut Rbm,
                   input: &Batch<Vec<f64>>,
                   expected: &Batch<Vec<f64>>,
                   context: &mut TrainingContext)
                   -> Result<()> {
        self.core.train_batch(rbm, input, expected, context, None)
    }
}
