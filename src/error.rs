//! Provides the error types of Strata.
//!
//! Every failure is fatal at the point of detection. Training an RBM on
//! corrupted numeric state would invalidate every following epoch, so the
//! error is surfaced to the caller instead of being corrected silently.
//!
//! Errors fall into two families:
//!
//! * [__Config__][config] errors describe a mismatch between the configured
//! models and the data handed to them. They are detected before an
//! operation mutates anything.
//! * [__Numerical__][numerical] errors describe a non-finite value produced
//! by an activation, a bias initialization or an energy computation.
//!
//! [config]: ./enum.ConfigError.html
//! [numerical]: ./struct.NumericalError.html
use std::{error, fmt, result};
use units::UnitType;

/// Result type used throughout Strata.
pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
/// Defines the general set of errors in Strata.
pub enum Error {
    /// Failure related to the configuration of a model or its input data.
    Config(ConfigError),
    /// Failure related to a non-finite value.
    Numerical(NumericalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Config(ref err) => write!(f, "Configuration error: {}", err),
            Error::Numerical(ref err) => write!(f, "Numerical error: {}", err),
        }
    }
}

impl error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Error {
        Error::Config(err)
    }
}

impl From<NumericalError> for Error {
    fn from(err: NumericalError) -> Error {
        Error::Numerical(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Mismatches between configured models and the data or parameters handed to them.
pub enum ConfigError {
    /// The visible/hidden unit combination can not be trained.
    ///
    /// Softmax visible units and gaussian hidden units are not supported.
    UnsupportedUnits {
        /// Configured visible unit type.
        visible: UnitType,
        /// Configured hidden unit type.
        hidden: UnitType,
    },
    /// A layer was configured without visible or hidden units.
    EmptyLayer {
        /// Configured number of visible units.
        visible: usize,
        /// Configured number of hidden units.
        hidden: usize,
    },
    /// The batch size is zero.
    ZeroBatchSize,
    /// A contrastive divergence trainer was configured with zero Gibbs steps.
    ZeroGibbsSteps,
    /// The training set holds no samples.
    EmptyDataset,
    /// A sample does not have one value per visible unit.
    SampleSize {
        /// Position of the sample in the data set.
        index: usize,
        /// Number of visible units of the layer.
        expected: usize,
        /// Length of the offending sample.
        actual: usize,
    },
    /// Two sequences that must be parallel have different lengths.
    LengthMismatch {
        /// Which sequences are compared.
        what: &'static str,
        /// Length of the first sequence.
        expected: usize,
        /// Length of the second sequence.
        actual: usize,
    },
    /// A parameter handed to a model does not have the shape of the model.
    ParameterShape {
        /// Which parameter is replaced.
        what: &'static str,
        /// Shape the model needs.
        expected: Vec<usize>,
        /// Shape of the offending parameter.
        actual: Vec<usize>,
    },
    /// The visible layer of a layer does not match the hidden layer below it.
    LayerSize {
        /// Index of the upper layer.
        layer: usize,
        /// Number of visible units the upper layer needs.
        expected: usize,
        /// Number of visible units the upper layer has.
        actual: usize,
    },
    /// The last layer has no room for the requested label units.
    LabelCapacity {
        /// Number of visible units of the last layer.
        visible: usize,
        /// Number of hidden units of the second-to-last layer.
        hidden: usize,
        /// Number of labels requested.
        labels: usize,
    },
    /// A label is outside `[0, num_labels)`.
    LabelOutOfRange {
        /// Position of the label.
        index: usize,
        /// Value of the label.
        label: usize,
        /// Number of labels.
        num_labels: usize,
    },
    /// A labelled operation needs at least `required` layers.
    TooFewLayers {
        /// Number of layers needed.
        required: usize,
        /// Number of layers present.
        actual: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::UnsupportedUnits { visible, hidden } => {
                write!(f, "{:?} visible units with {:?} hidden units are not supported", visible, hidden)
            }
            ConfigError::EmptyLayer { visible, hidden } => {
                write!(f, "layer needs at least one visible and one hidden unit (got {}x{})", visible, hidden)
            }
            ConfigError::ZeroBatchSize => write!(f, "batch size must be at least 1"),
            ConfigError::ZeroGibbsSteps => write!(f, "contrastive divergence needs at least one Gibbs step"),
            ConfigError::EmptyDataset => write!(f, "the training set is empty"),
            ConfigError::SampleSize { index, expected, actual } => {
                write!(f, "sample {} has {} values, the layer has {} visible units", index, actual, expected)
            }
            ConfigError::LengthMismatch { what, expected, actual } => {
                write!(f, "{}: expected {} entries, got {}", what, expected, actual)
            }
            ConfigError::ParameterShape { what, ref expected, ref actual } => {
                write!(f, "{} has shape {:?}, the model needs {:?}", what, actual, expected)
            }
            ConfigError::LayerSize { layer, expected, actual } => {
                write!(f, "layer {} has {} visible units, the layer below provides {}", layer, actual, expected)
            }
            ConfigError::LabelCapacity { visible, hidden, labels } => {
                write!(f, "there is no room for the labels units: {} visible units != {} hidden units + {} labels",
                       visible, hidden, labels)
            }
            ConfigError::LabelOutOfRange { index, label, num_labels } => {
                write!(f, "label {} at position {} is not below {}", label, index, num_labels)
            }
            ConfigError::TooFewLayers { required, actual } => {
                write!(f, "operation needs at least {} layers, the network has {}", required, actual)
            }
        }
    }
}

impl error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
/// A non-finite value was produced by a computation.
pub struct NumericalError {
    /// Name of the computation that produced the value.
    pub location: &'static str,
    /// Index of the first offending element.
    pub index: usize,
    /// The offending value.
    pub value: f64,
}

impl fmt::Display for NumericalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} produced {} at index {}", self.location, self.value, self.index)
    }
}

impl error::Error for NumericalError {}
