//! Provides the bookkeeping of label predictions against their targets.
use std::collections::VecDeque;
use std::fmt;

/// A [ConfusionMatrix][wiki].
///
/// [wiki]: https://en.wikipedia.org/wiki/Confusion_matrix
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    num_classes: usize,

    /// maximum number of samples held
    capacity: Option<usize>,
    samples: VecDeque<Sample>,
}

impl ConfusionMatrix {
    /// Create a ConfusionMatrix that analyzes the prediction of `num_classes` classes.
    pub fn new(num_classes: usize) -> ConfusionMatrix {
        ConfusionMatrix {
            num_classes: num_classes,
            capacity: None,
            samples: VecDeque::new(),
        }
    }

    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Add a sample by providing the `prediction` and the expected `target` class.
    ///
    /// When the matrix is full the oldest sample is dropped.
    pub fn add_sample(&mut self, prediction: usize, target: usize) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            while self.samples.len() >= capacity {
                self.samples.pop_front();
            }
        }
        self.samples.push_back(Sample { prediction: prediction, target: target });
    }

    /// Add a batch of samples.
    ///
    /// See [add_sample](#method.add_sample).
    pub fn add_samples(&mut self, predictions: &[usize], targets: &[usize]) {
        for (&prediction, &target) in predictions.iter().zip(targets.iter()) {
            self.add_sample(prediction, target)
        }
    }

    /// Set the `capacity` of the ConfusionMatrix, dropping the oldest samples that no longer fit.
    pub fn set_capacity(&mut self, capacity: Option<usize>) {
        self.capacity = capacity;
        if let Some(capacity) = capacity {
            while self.samples.len() > capacity {
                self.samples.pop_front();
            }
        }
    }

    /// Return all collected samples.
    pub fn samples(&self) -> &VecDeque<Sample> {
        &self.samples
    }

    /// Count of the samples per `[target][prediction]`.
    ///
    /// Samples with a class outside of `num_classes` are not counted.
    pub fn counts(&self) -> Vec<Vec<usize>> {
        let mut counts = vec![vec![0; self.num_classes]; self.num_classes];
        for sample in &self.samples {
            if sample.target < self.num_classes && sample.prediction < self.num_classes {
                counts[sample.target][sample.prediction] += 1;
            }
        }
        counts
    }

    /// Return the accuracy of the collected predictions.
    pub fn accuracy(&self) -> Accuracy {
        let num_samples = self.samples.len();
        let num_correct = self.samples.iter().filter(|s| s.correct()).count();
        Accuracy { num_samples: num_samples, num_correct: num_correct }
    }
}

/// A single prediction Sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    prediction: usize,
    target: usize,
}

impl Sample {
    /// The predicted class.
    pub fn prediction(&self) -> usize {
        self.prediction
    }

    /// The expected class.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Returns if the prediction is equal to the expected target.
    pub fn correct(&self) -> bool {
        self.prediction == self.target
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Prediction: {:?}, Target: {:?}", self.prediction, self.target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The accuracy of the predictions in a ConfusionMatrix.
pub struct Accuracy {
    num_samples: usize,
    num_correct: usize,
}

impl Accuracy {
    /// Number of evaluated samples.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Number of correctly predicted samples.
    pub fn num_correct(&self) -> usize {
        self.num_correct
    }

    /// Fraction of correct predictions, in `[0, 1]`. Zero without samples.
    pub fn ratio(&self) -> f64 {
        if self.num_samples == 0 {
            return 0f64;
        }
        self.num_correct as f64 / self.num_samples as f64
    }

    /// Fraction of wrong predictions, in `[0, 1]`. Zero without samples.
    pub fn error_rate(&self) -> f64 {
        if self.num_samples == 0 {
            return 0f64;
        }
        1f64 - self.ratio()
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}/{:?} = {:.2?}%", self.num_correct, self.num_samples, self.ratio() * 100f64)
    }
}
