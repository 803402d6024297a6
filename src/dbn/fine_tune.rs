//! Provides the interface for the supervised fine-tuning of a pretrained [Dbn][1].
//! [1]: ../struct.Dbn.html
//!
//! After the greedy pretraining the whole stack can be tuned as one model by
//! minimizing a cost over batches of labelled data. The [Dbn][1] only drives the
//! batches; computing the gradient of the stack and minimizing the cost is the
//! job of an [IFineTuner][2] implementation supplied by the caller.
//!
//! [2]: ./trait.IFineTuner.html
use std::fmt;
use ndarray::Array2;
use batch::{make_batches, Batch};
use error::{ConfigError, Result};
use super::Dbn;

#[derive(Debug, Clone, Copy)]
/// Everything a fine-tuner needs to know about the current batch.
pub struct GradientContext<'a> {
    /// Upper bound on the iterations of the line search of a minimization.
    ///
    /// Default: 3
    pub max_iterations: usize,
    /// The current epoch, starting at 1.
    pub epoch: usize,
    /// The input samples of the batch.
    pub inputs: Batch<'a, Vec<f64>>,
    /// The labels of the input samples.
    pub targets: Batch<'a, usize>,
    /// The lowest layer that is tuned.
    ///
    /// Default: 0
    pub start_layer: usize,
}

impl<'a> GradientContext<'a> {
    /// Create a context for a batch with the default settings.
    pub fn new(epoch: usize, inputs: Batch<'a, Vec<f64>>, targets: Batch<'a, usize>) -> GradientContext<'a> {
        GradientContext {
            max_iterations: 3,
            epoch: epoch,
            inputs: inputs,
            targets: targets,
            start_layer: 0,
        }
    }
}

/// An optimizer tuning all the layers of a [Dbn][1] together.
/// [1]: ../struct.Dbn.html
pub trait IFineTuner {
    /// Compute the gradient of the cost of the batch described by `context`.
    ///
    /// Returns one weight gradient per tuned layer and the cost.
    fn gradient(&mut self, dbn: &Dbn, context: &GradientContext) -> Result<(Vec<Array2<f64>>, f64)>;

    /// Update `dbn` to lower the cost of the batch described by `context`.
    ///
    /// Returns the cost of the batch.
    fn minimize(&mut self, dbn: &mut Dbn, context: &GradientContext) -> Result<f64>;
}

impl fmt::Debug for dyn IFineTuner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", "IFineTuner")
    }
}

impl Dbn {
    /// Tune the network on labelled `data` for `epochs` epochs with `tuner`.
    ///
    /// Every batch, the last smaller one included, is handed to
    /// [IFineTuner::minimize][1]. Returns the mean cost of the batches of the
    /// last epoch, or 0 when `epochs` is 0.
    /// [1]: ./fine_tune/trait.IFineTuner.html#tymethod.minimize
    pub fn fine_tune(&mut self,
                     tuner: &mut dyn IFineTuner,
                     data: &[Vec<f64>],
                     labels: &[usize],
                     epochs: usize,
                     batch_size: usize)
                     -> Result<f64> {
        if batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize.into());
        }
        self.check_data(data)?;
        if labels.len() != data.len() {
            return Err(ConfigError::LengthMismatch { what: "labels", expected: data.len(), actual: labels.len() }.into());
        }

        let input_batches = make_batches(data, batch_size);
        let target_batches = make_batches(labels, batch_size);

        let mut cost = 0f64;
        for epoch in 1..epochs + 1 {
            let mut total = 0f64;
            for (&inputs, &targets) in input_batches.iter().zip(target_batches.iter()) {
                let context = GradientContext::new(epoch, inputs, targets);
                total += tuner.minimize(self, &context)?;
            }
            cost = total / input_batches.len() as f64;
            info!("DBN: fine-tune epoch {}: cost {:.5}", epoch, cost);
        }
        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbn::DbnConfig;
    use rbm::RbmConfig;
    use watcher::WatcherKind;

    #[derive(Debug, Default)]
    struct CountingTuner {
        batches: Vec<(usize, usize)>,
    }

    impl IFineTuner for CountingTuner {
        fn gradient(&mut self, dbn: &Dbn, context: &GradientContext) -> Result<(Vec<Array2<f64>>, f64)> {
            let gradients: Vec<Array2<f64>> = dbn.layers()[context.start_layer..]
                .iter()
                .map(|l| Array2::zeros((l.num_visible(), l.num_hidden())))
                .collect();
            Ok((gradients, context.inputs.len() as f64))
        }

        fn minimize(&mut self, dbn: &mut Dbn, context: &GradientContext) -> Result<f64> {
            self.batches.push((context.epoch, context.inputs.len()));
            let (_, cost) = self.gradient(dbn, context)?;
            Ok(cost)
        }
    }

    #[test]
    fn every_batch_reaches_the_tuner() {
        let config = DbnConfig {
            watcher: WatcherKind::Silent,
            ..DbnConfig::new(vec![RbmConfig::new(2, 2), RbmConfig::new(4, 2)])
        };
        let mut dbn = Dbn::from_config(&config).unwrap();
        let data = vec![vec![0f64, 1f64]; 5];
        let labels = vec![0, 1, 0, 1, 0];
        let mut tuner = CountingTuner::default();

        let cost = dbn.fine_tune(&mut tuner, &data, &labels, 2, 2).unwrap();
        assert_eq!(vec![(1, 2), (1, 2), (1, 1), (2, 2), (2, 2), (2, 1)], tuner.batches);
        assert!((cost - 5f64 / 3f64).abs() < 1e-12);
    }
}
