//! Strata is a library for training Restricted Boltzmann Machines and
//! composing them into Deep Belief Networks.
//!
//! ## Architecture
//!
//! The building block is the [Rbm][rbm], a two-layer undirected model with
//! visible and hidden units connected by a weight matrix. The behaviour of its
//! units is selected per layer through a [UnitType][units]: binary, gaussian,
//! rectified linear (unbounded, capped at 1 or at 6) and softmax.
//!
//! An Rbm holds its parameters and hyperparameters but no training logic.
//! Training happens at the [Solver][solver]: it runs the epochs, shuffles and
//! batches the data and reports the statistics of every epoch to a
//! [watcher][watcher]. The update of the parameters from a batch is the job of
//! one of the [contrastive divergence trainers][solvers], CD-k or persistent CD-k,
//! with optional momentum, weight decay and sparsity regularization.
//!
//! A [Dbn][dbn] stacks Rbms. It is pretrained greedily, layer by layer, each
//! layer learning from the hidden activations of the one below. With labelled
//! data the last layer also learns the labels, which lets the network classify
//! new items.
//!
//! The parameters of a model are [ndarray][ndarray] arrays, training data is
//! handed over as one `Vec<f64>` per sample.
//!
//! All operations that can fail return a [Result][error]. Invalid
//! configurations are rejected before any work is done, numerical problems
//! (a NaN or an infinity anywhere in the computation) stop the training at the
//! point where they appear.
//!
//! [rbm]: ./rbm/index.html
//! [units]: ./units/index.html
//! [solver]: ./solver/index.html
//! [watcher]: ./watcher/index.html
//! [solvers]: ./solvers/index.html
//! [dbn]: ./dbn/index.html
//! [error]: ./error/index.html
//! [ndarray]: https://docs.rs/ndarray/0.15/ndarray/
//!
//! ## Examples
//!
//! ```
//! # extern crate strata;
//! # use strata::rbm::{Rbm, RbmConfig};
//! # use strata::watcher::WatcherKind;
//! # fn main() {
//! let config = RbmConfig {
//!     batch_size: 2,
//!     watcher: WatcherKind::Silent,
//!     seed: Some(42),
//!     ..RbmConfig::new(4, 2)
//! };
//! let mut rbm = Rbm::from_config(&config).unwrap();
//! let data = vec![vec![1f64, 1f64, 0f64, 0f64], vec![0f64, 0f64, 1f64, 1f64]];
//! let error = rbm.train(&data, 10).unwrap();
//! assert!(error.is_finite());
//! # }
//! ```
#![deny(missing_docs,
        missing_debug_implementations,
        unsafe_code,
        unused_import_braces)]
#![warn(trivial_casts, trivial_numeric_casts, unused_qualifications)]

#[macro_use]
extern crate log;
extern crate ndarray;
extern crate num;
extern crate rand;
extern crate rayon;

pub mod batch;
pub mod context;
pub mod dbn;
pub mod error;
pub mod math;
pub mod rbm;
pub mod solver;
pub mod solvers;
pub mod units;
pub mod util;
pub mod watcher;
pub mod weight;
