//! Provides a non-owning view over a contiguous range of a data set.
use std::ops::Index;
use std::slice::Iter;

#[derive(Debug)]
/// A contiguous batch of samples, borrowed from the data set it was cut from.
pub struct Batch<'a, T: 'a> {
    items: &'a [T],
}

impl<'a, T> Batch<'a, T> {
    /// Create a Batch over `items`.
    pub fn new(items: &'a [T]) -> Batch<'a, T> {
        Batch { items: items }
    }

    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch holds no sample.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the samples.
    pub fn iter(&self) -> Iter<'a, T> {
        self.items.iter()
    }

    /// The samples as a slice.
    pub fn as_slice(&self) -> &'a [T] {
        self.items
    }
}

impl<'a, T> Clone for Batch<'a, T> {
    fn clone(&self) -> Batch<'a, T> {
        *self
    }
}

impl<'a, T> Copy for Batch<'a, T> {}

impl<'a, T> Index<usize> for Batch<'a, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

/// Cut `items` into batches of `batch_size` samples.
///
/// The last batch holds the remainder and may be smaller.
pub fn make_batches<'a, T>(items: &'a [T], batch_size: usize) -> Vec<Batch<'a, T>> {
    items.chunks(batch_size).map(Batch::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_partial_batch_is_included() {
        let items = vec![1, 2, 3, 4, 5];
        let batches = make_batches(&items, 2);
        assert_eq!(3, batches.len());
        assert_eq!(1, batches[2].len());
        assert_eq!(5, batches[2][0]);
    }
}
