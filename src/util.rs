//! Provides common utility functions
use rand::{self, Rng, SeedableRng, StdRng};
use error::{NumericalError, Result};

/// Fails with a [NumericalError][1] if `values` contains a NaN or an infinity.
/// [1]: ../error/struct.NumericalError.html
///
/// `location` names the computation that produced `values`.
pub fn check_finite<'a, I>(values: I, location: &'static str) -> Result<()>
    where I: IntoIterator<Item = &'a f64>
{
    match values.into_iter().enumerate().find(|&(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(NumericalError { location: location, index: index, value: value }.into()),
        None => Ok(()),
    }
}

/// Writes a one-hot encoding of `label` into `slots`.
pub fn write_one_hot(label: usize, slots: &mut [f64]) {
    for (l, slot) in slots.iter_mut().enumerate() {
        *slot = if l == label { 1f64 } else { 0f64 };
    }
}

/// Returns the index of the largest value.
///
/// The scan uses a strict greater-than, so ties resolve to the lowest index.
pub fn label_argmax<'a, I>(values: I) -> usize
    where I: IntoIterator<Item = &'a f64>
{
    let mut label = 0;
    let mut max = ::std::f64::NEG_INFINITY;
    for (l, &value) in values.into_iter().enumerate() {
        if value > max {
            max = value;
            label = l;
        }
    }
    label
}

/// Create a generator for the random `stream` of a model.
///
/// With a `seed` the generator is fully determined by `(seed, stream)`,
/// otherwise it is seeded from the thread local generator.
pub fn seeded_rng(seed: Option<usize>, stream: usize) -> StdRng {
    let base = match seed {
        Some(seed) => seed,
        None => rand::thread_rng().gen::<usize>(),
    };
    StdRng::from_seed(&[base, stream][..])
}
