//! Provides the observers notified during RBM training.
//!
//! A watcher is called synchronously before the first epoch, after every epoch
//! and after the last epoch. It only reads the model.
use std::fmt;
use std::time::Instant;
use context::TrainingContext;
use rbm::Rbm;

/// Observer of the training of an [Rbm][1].
/// [1]: ../rbm/struct.Rbm.html
///
/// All notifications default to doing nothing.
pub trait IWatcher {
    /// Called before the first epoch.
    fn training_begin(&mut self, _rbm: &Rbm) {}

    /// Called after every epoch with its averaged statistics.
    fn epoch_end(&mut self, _epoch: usize, _context: &TrainingContext, _rbm: &Rbm) {}

    /// Called after the last epoch.
    fn training_end(&mut self, _rbm: &Rbm) {}
}

impl fmt::Debug for dyn IWatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", "IWatcher")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// All available types of watchers.
pub enum WatcherKind {
    /// Logs the configuration, the statistics of every epoch and the training time.
    Default,
    /// Reports nothing.
    Silent,
}

impl WatcherKind {
    /// Create a watcher of the specified kind.
    pub fn create(&self) -> Box<dyn IWatcher> {
        match *self {
            WatcherKind::Default => Box::new(DefaultWatcher::new()),
            WatcherKind::Silent => Box::new(SilentWatcher),
        }
    }
}

#[derive(Debug)]
/// Watcher reporting through the `log` facade.
pub struct DefaultWatcher {
    started: Option<Instant>,
}

impl DefaultWatcher {
    /// Create a new DefaultWatcher.
    pub fn new() -> DefaultWatcher {
        DefaultWatcher { started: None }
    }
}

impl Default for DefaultWatcher {
    fn default() -> DefaultWatcher {
        DefaultWatcher::new()
    }
}

impl IWatcher for DefaultWatcher {
    fn training_begin(&mut self, rbm: &Rbm) {
        self.started = Some(Instant::now());
        info!("RBM: {}x{} ({:?} -> {:?}), trainer: {:?}, batch size: {}",
              rbm.num_visible(),
              rbm.num_hidden(),
              rbm.visible_unit(),
              rbm.hidden_unit(),
              rbm.config().trainer,
              rbm.batch_size());
        info!("learning rate: {}, momentum: {}, decay: {:?}, sparsity: {:?}",
              rbm.learning_rate,
              rbm.config().momentum,
              rbm.decay,
              rbm.sparsity);
    }

    fn epoch_end(&mut self, epoch: usize, context: &TrainingContext, rbm: &Rbm) {
        if rbm.config().free_energy {
            info!("epoch {}: reconstruction error: {:.5} - sparsity: {:.5} - free energy: {:.3}",
                  epoch,
                  context.reconstruction_error,
                  context.sparsity,
                  context.free_energy);
        } else {
            info!("epoch {}: reconstruction error: {:.5} - sparsity: {:.5}",
                  epoch,
                  context.reconstruction_error,
                  context.sparsity);
        }
    }

    fn training_end(&mut self, _rbm: &Rbm) {
        if let Some(started) = self.started.take() {
            let elapsed = started.elapsed();
            info!("training took {}.{:03}s", elapsed.as_secs(), elapsed.subsec_nanos() / 1_000_000);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Watcher that reports nothing.
pub struct SilentWatcher;

impl IWatcher for SilentWatcher {}
