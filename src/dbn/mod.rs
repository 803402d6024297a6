//! Provides the Deep Belief Network, a stack of [Rbm][rbm]s trained greedily.
//!
//! Every layer is trained on the hidden activation probabilities of the layer
//! below it. For classification the last layer additionally sees the label of
//! each training sample as a one-hot block appended to its visible units, so
//! its visible layer has `num_hidden(second to last) + num_labels` units.
//!
//! Prediction propagates an item up to the last layer, with the label block set
//! to a neutral value, and reads the label off the reconstruction of the last
//! layer's visible units.
//!
//! [rbm]: ../rbm/struct.Rbm.html
pub use self::fine_tune::{GradientContext, IFineTuner};

pub mod fine_tune;

use std::fmt;
use ndarray::{Array1, ArrayView1, ArrayViewMut1};
use rand::StdRng;
use error::{ConfigError, Result};
use rbm::{Rbm, RbmConfig};
use solver::{Accuracy, ConfusionMatrix};
use solvers::TrainerKind;
use util::{label_argmax, seeded_rng, write_one_hot};
use watcher::WatcherKind;

/// Value of the label units while the label is unknown.
const LABEL_PLACEHOLDER: f64 = 0.1;
/// Random stream of the sampling during prediction.
const PREDICT_STREAM: usize = 0;

#[derive(Debug, Clone)]
/// Specifies the layers of a [Dbn][1] and the settings shared by all of them.
/// [1]: ./struct.Dbn.html
pub struct DbnConfig {
    /// The layers, from the input upwards.
    pub layers: Vec<RbmConfig>,
    /// The contrastive divergence variant of every layer.
    /// If set to `None` every layer keeps its own.
    ///
    /// Default: None
    pub trainer: Option<TrainerKind>,
    /// The watcher of every layer.
    ///
    /// Default: WatcherKind::Default
    pub watcher: WatcherKind,
    /// Seed of the network. Layer `i` without a seed of its own uses `seed + i`,
    /// the prediction sampling uses `seed`.
    ///
    /// Default: None
    pub seed: Option<usize>,
}

impl Default for DbnConfig {
    fn default() -> DbnConfig {
        DbnConfig {
            layers: Vec::new(),
            trainer: None,
            watcher: WatcherKind::Default,
            seed: None,
        }
    }
}

impl DbnConfig {
    /// Create a configuration with the given layers and the default shared settings.
    pub fn new(layers: Vec<RbmConfig>) -> DbnConfig {
        DbnConfig { layers: layers, ..DbnConfig::default() }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// How the visible state evolves between the Gibbs rounds of a deep prediction.
pub enum GibbsVisible {
    /// The visible state is the activation probabilities.
    Mean,
    /// The visible state is sampled from the activation probabilities.
    Sample,
}

/// Deep Belief Network
pub struct Dbn {
    layers: Vec<Rbm>,
    rng: StdRng,
    config: DbnConfig,
}

impl fmt::Debug for Dbn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Dbn")
            .field("layers", &self.layers)
            .field("config", &self.config)
            .finish()
    }
}

impl Dbn {
    /// Create a Dbn from a [DbnConfig][1].
    /// [1]: ./struct.DbnConfig.html
    ///
    /// Every layer below the last must have as many visible units as the layer
    /// below it has hidden units. The last layer may have more, the extra
    /// units hold the labels.
    pub fn from_config(config: &DbnConfig) -> Result<Dbn> {
        if config.layers.is_empty() {
            return Err(ConfigError::TooFewLayers { required: 1, actual: 0 }.into());
        }

        let mut layers = Vec::with_capacity(config.layers.len());
        for (i, layer_config) in config.layers.iter().enumerate() {
            let mut layer_config = layer_config.clone();
            if let Some(trainer) = config.trainer {
                layer_config.trainer = trainer;
            }
            layer_config.watcher = config.watcher;
            if layer_config.seed.is_none() {
                layer_config.seed = config.seed.map(|seed| seed.wrapping_add(i));
            }
            layers.push(Rbm::from_config(&layer_config)?);
        }

        let last = layers.len() - 1;
        for i in 1..layers.len() {
            let expected = layers[i - 1].num_hidden();
            let actual = layers[i].num_visible();
            if (i < last && actual != expected) || (i == last && actual < expected) {
                return Err(ConfigError::LayerSize { layer: i, expected: expected, actual: actual }.into());
            }
        }

        Ok(Dbn {
            layers: layers,
            rng: seeded_rng(config.seed, PREDICT_STREAM),
            config: config.clone(),
        })
    }

    /// The configuration the Dbn was created from.
    pub fn config(&self) -> &DbnConfig {
        &self.config
    }

    /// The layers, from the input upwards.
    pub fn layers(&self) -> &[Rbm] {
        &self.layers
    }

    /// The layers, from the input upwards.
    pub fn layers_mut(&mut self) -> &mut [Rbm] {
        &mut self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the Dbn has no layer. Never true for a Dbn built by `from_config`.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of visible units of the input layer.
    pub fn input_size(&self) -> usize {
        self.layers[0].num_visible()
    }

    /// Train every layer in turn on `data` without labels.
    ///
    /// Requires the last layer to be sized like the others.
    pub fn pretrain(&mut self, data: &[Vec<f64>], max_epochs: usize) -> Result<()> {
        let last = self.layers.len() - 1;
        if last > 0 {
            let expected = self.layers[last - 1].num_hidden();
            let actual = self.layers[last].num_visible();
            if actual != expected {
                return Err(ConfigError::LayerSize { layer: last, expected: expected, actual: actual }.into());
            }
        }
        self.check_data(data)?;

        self.pretrain_layers(data, None, max_epochs)
    }

    /// Train every layer in turn on `data`, the last layer seeing the labels as well.
    ///
    /// Requires at least two layers, one label per sample, every label below
    /// `num_labels` and room for `num_labels` label units in the last layer.
    pub fn pretrain_with_labels(&mut self,
                                data: &[Vec<f64>],
                                labels: &[usize],
                                num_labels: usize,
                                max_epochs: usize)
                                -> Result<()> {
        self.check_label_capacity(num_labels)?;
        self.check_data(data)?;
        check_labels(data, labels, num_labels)?;

        self.pretrain_layers(data, Some((labels, num_labels)), max_epochs)
    }

    fn pretrain_layers(&mut self,
                       data: &[Vec<f64>],
                       labels: Option<(&[usize], usize)>,
                       max_epochs: usize)
                       -> Result<()> {
        let mut propagated: Option<Vec<Vec<f64>>> = None;
        for i in 0..self.layers.len() {
            let next = {
                let input = match propagated {
                    Some(ref input) => &input[..],
                    None => data,
                };
                info!("DBN: Train layer {} ({}x{})", i, self.layers[i].num_visible(), self.layers[i].num_hidden());
                self.layers[i].train(input, max_epochs)?;

                if i + 1 < self.layers.len() {
                    Some(self.propagate(i, input, labels)?)
                } else {
                    None
                }
            };
            propagated = next;
        }
        Ok(())
    }

    /// Hidden activation probabilities of `layer` for every sample of `data`.
    ///
    /// When `labels` are given and the next layer is the last one, every
    /// output is extended with the one-hot encoding of its label.
    pub fn propagate(&self,
                     layer: usize,
                     data: &[Vec<f64>],
                     labels: Option<(&[usize], usize)>)
                     -> Result<Vec<Vec<f64>>> {
        if layer >= self.layers.len() {
            return Err(ConfigError::TooFewLayers { required: layer + 1, actual: self.layers.len() }.into());
        }
        if let Some((labels, num_labels)) = labels {
            check_labels(data, labels, num_labels)?;
        }
        let labels = if layer + 2 == self.layers.len() { labels } else { None };

        let rbm = &self.layers[layer];
        let num_hidden = rbm.num_hidden();
        let num_labels = labels.map_or(0, |(_, num_labels)| num_labels);

        let mut output = Vec::with_capacity(data.len());
        for (index, sample) in data.iter().enumerate() {
            rbm.check_sample(index, sample)?;
            let mut next = vec![0f64; num_hidden + num_labels];
            {
                let (hidden, label_units) = next.split_at_mut(num_hidden);
                rbm.activate_hidden(ArrayView1::from(&sample[..]), ArrayViewMut1::from(hidden))?;
                if let Some((labels, _)) = labels {
                    write_one_hot(labels[index], label_units);
                }
            }
            output.push(next);
        }
        Ok(output)
    }

    /// Predict the label of `item` with a single upward pass.
    pub fn predict(&mut self, item: &[f64], num_labels: usize) -> Result<usize> {
        let v = self.last_layer_input(item, num_labels)?;
        let last = &self.layers[self.layers.len() - 1];

        let mut h_a: Array1<f64> = Array1::zeros(last.num_hidden());
        let mut h_s: Array1<f64> = Array1::zeros(last.num_hidden());
        let mut v_a: Array1<f64> = Array1::zeros(last.num_visible());
        last.activate_hidden_sampled(v.view(), h_a.view_mut(), h_s.view_mut(), &mut self.rng)?;
        last.activate_visible(h_s.view(), v_a.view_mut())?;

        Ok(read_label(&v_a, num_labels))
    }

    /// Predict the label of `item`, running `steps` Gibbs rounds in the last layer first.
    ///
    /// The visible state is kept as probabilities between the rounds.
    pub fn deep_predict(&mut self, item: &[f64], num_labels: usize, steps: usize) -> Result<usize> {
        self.deep_predict_with(item, num_labels, steps, GibbsVisible::Mean)
    }

    /// Predict the label of `item`, running `steps` Gibbs rounds in the last layer first.
    ///
    /// `visible` selects whether the visible state is resampled between the rounds.
    pub fn deep_predict_with(&mut self,
                             item: &[f64],
                             num_labels: usize,
                             steps: usize,
                             visible: GibbsVisible)
                             -> Result<usize> {
        let mut v = self.last_layer_input(item, num_labels)?;
        let last = &self.layers[self.layers.len() - 1];

        let mut h_a: Array1<f64> = Array1::zeros(last.num_hidden());
        let mut h_s: Array1<f64> = Array1::zeros(last.num_hidden());
        let mut v_a: Array1<f64> = Array1::zeros(last.num_visible());
        for _ in 0..steps {
            last.activate_hidden_sampled(v.view(), h_a.view_mut(), h_s.view_mut(), &mut self.rng)?;
            match visible {
                GibbsVisible::Mean => last.activate_visible(h_s.view(), v.view_mut())?,
                GibbsVisible::Sample => {
                    last.activate_visible_sampled(h_s.view(), v_a.view_mut(), v.view_mut(), &mut self.rng)?
                }
            }
        }
        last.activate_hidden_sampled(v.view(), h_a.view_mut(), h_s.view_mut(), &mut self.rng)?;
        last.activate_visible(h_s.view(), v_a.view_mut())?;

        Ok(read_label(&v_a, num_labels))
    }

    /// Predict every item of `data` and compare with `labels`.
    pub fn evaluate(&mut self, data: &[Vec<f64>], labels: &[usize], num_labels: usize) -> Result<Accuracy> {
        self.check_label_capacity(num_labels)?;
        check_labels(data, labels, num_labels)?;

        let mut matrix = ConfusionMatrix::new(num_labels);
        for (item, &label) in data.iter().zip(labels.iter()) {
            let prediction = self.predict(item, num_labels)?;
            matrix.add_sample(prediction, label);
        }
        let accuracy = matrix.accuracy();
        info!("DBN: accuracy {}", accuracy);
        Ok(accuracy)
    }

    /// Input of the last layer for `item`: the hidden probabilities of the
    /// layers below with the label units set to the placeholder.
    fn last_layer_input(&self, item: &[f64], num_labels: usize) -> Result<Array1<f64>> {
        self.check_label_capacity(num_labels)?;
        self.layers[0].check_sample(0, item)?;

        let last = self.layers.len() - 1;
        let mut v = Array1::from(item.to_vec());
        for rbm in &self.layers[..last] {
            let mut h: Array1<f64> = Array1::zeros(rbm.num_hidden());
            rbm.activate_hidden(v.view(), h.view_mut())?;
            v = h;
        }

        let mut input = Array1::from_elem(v.len() + num_labels, LABEL_PLACEHOLDER);
        for (unit, &h) in input.iter_mut().zip(v.iter()) {
            *unit = h;
        }
        Ok(input)
    }

    fn check_label_capacity(&self, num_labels: usize) -> Result<()> {
        let layers = self.layers.len();
        if layers < 2 {
            return Err(ConfigError::TooFewLayers { required: 2, actual: layers }.into());
        }
        let visible = self.layers[layers - 1].num_visible();
        let hidden = self.layers[layers - 2].num_hidden();
        if visible != hidden + num_labels {
            return Err(ConfigError::LabelCapacity { visible: visible, hidden: hidden, labels: num_labels }.into());
        }
        Ok(())
    }

    fn check_data(&self, data: &[Vec<f64>]) -> Result<()> {
        if data.is_empty() {
            return Err(ConfigError::EmptyDataset.into());
        }
        for (index, sample) in data.iter().enumerate() {
            self.layers[0].check_sample(index, sample)?;
        }
        Ok(())
    }
}

/// The label read off the last `num_labels` units of a reconstruction.
fn read_label(reconstruction: &Array1<f64>, num_labels: usize) -> usize {
    label_argmax(reconstruction.iter().skip(reconstruction.len() - num_labels))
}

fn check_labels(data: &[Vec<f64>], labels: &[usize], num_labels: usize) -> Result<()> {
    if labels.len() != data.len() {
        return Err(ConfigError::LengthMismatch { what: "labels", expected: data.len(), actual: labels.len() }.into());
    }
    if let Some((index, &label)) = labels.iter().enumerate().find(|&(_, &label)| label >= num_labels) {
        return Err(ConfigError::LabelOutOfRange { index: index, label: label, num_labels: num_labels }.into());
    }
    Ok(())
}
