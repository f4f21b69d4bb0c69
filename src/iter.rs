//! Sized, skippable iteration over snapshots of items

use crate::error::RepositoryError;

/// Iterator over a snapshot that knows its total size and current position.
///
/// The snapshot is taken when the iterator is built; later store mutations
/// do not change what it yields.
#[derive(Debug, Clone)]
pub struct RangeIter<T> {
    inner: std::vec::IntoIter<T>,
    size: usize,
    position: usize,
}

impl<T> RangeIter<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            size: items.len(),
            inner: items.into_iter(),
            position: 0,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Total number of elements in the snapshot.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of elements already consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Skip `n` elements.
    ///
    /// Skipping past the end consumes the rest and fails with `ItemNotFound`.
    pub fn skip_items(&mut self, n: usize) -> Result<(), RepositoryError> {
        let remaining = self.size - self.position;
        if n > remaining {
            self.inner.by_ref().for_each(drop);
            self.position = self.size;
            return Err(RepositoryError::ItemNotFound(format!(
                "cannot skip {} of {} remaining elements",
                n, remaining
            )));
        }
        if n > 0 {
            self.inner.nth(n - 1);
        }
        self.position += n;
        Ok(())
    }
}

impl<T> Iterator for RangeIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let next = self.inner.next();
        if next.is_some() {
            self.position += 1;
        }
        next
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for RangeIter<T> {}

impl<T> FromIterator<T> for RangeIter<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> Default for RangeIter<T> {
    fn default() -> Self {
        Self::empty()
    }
}
