//! Provides the statistics gathered during one training epoch.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Statistics of one epoch of RBM training.
///
/// A fresh context is created for every epoch. The trainers accumulate into it
/// batch by batch and the [Solver][1] averages it once the epoch is done, before
/// it is handed to the watcher.
/// [1]: ../solver/struct.Solver.html
pub struct TrainingContext {
    /// Reconstruction error, averaged over the batches once the epoch is done.
    pub reconstruction_error: f64,
    /// Mean hidden activation, averaged over the batches once the epoch is done.
    pub sparsity: f64,
    /// Free energy of the training data, averaged over the samples once the epoch is done.
    pub free_energy: f64,
    /// Number of batches seen.
    pub batches: usize,
    /// Number of samples seen.
    pub samples: usize,
}

impl TrainingContext {
    /// Create an empty context.
    pub fn new() -> TrainingContext {
        TrainingContext::default()
    }

    /// Turn the accumulated sums into averages.
    ///
    /// Reconstruction error and sparsity are averaged over the batches,
    /// the free energy over the samples.
    pub fn average(&mut self) {
        if self.batches > 0 {
            self.reconstruction_error /= self.batches as f64;
            self.sparsity /= self.batches as f64;
        }
        if self.samples > 0 {
            self.free_energy /= self.samples as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_by_batches_and_samples() {
        let mut context = TrainingContext {
            reconstruction_error: 1f64,
            sparsity: 0.5f64,
            free_energy: -12f64,
            batches: 2,
            samples: 4,
        };
        context.average();
        assert_eq!(0.5f64, context.reconstruction_error);
        assert_eq!(0.25f64, context.sparsity);
        assert_eq!(-3f64, context.free_energy);
    }
}
