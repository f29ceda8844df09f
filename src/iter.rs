//! Traversal in render order: bucket index ascending, newest entry first
//! within each bucket.

use crate::chained_hash_map::Bucket;
use core::iter::{Flatten, FusedIterator};

type BucketsIter<'a, K, V> = core::slice::Iter<'a, Bucket<K, V>>;
type BucketsIterMut<'a, K, V> = core::slice::IterMut<'a, Bucket<K, V>>;

/// Iterator over `(&K, &V)` returned by `ChainedHashMap::iter`.
pub struct Iter<'a, K, V> {
    pub(crate) it: Flatten<BucketsIter<'a, K, V>>,
    pub(crate) remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.it.next()?;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over `(&K, &mut V)` returned by `ChainedHashMap::iter_mut`.
pub struct IterMut<'a, K, V> {
    pub(crate) it: Flatten<BucketsIterMut<'a, K, V>>,
    pub(crate) remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.it.next()?;
        self.remaining -= 1;
        Some((&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator returned by `ChainedHashMap::into_iter`.
pub struct IntoIter<K, V> {
    pub(crate) it: Flatten<std::vec::IntoIter<Bucket<K, V>>>,
    pub(crate) remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.it.next()?;
        self.remaining -= 1;
        Some((e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Keys in render order.
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Values in render order.
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}
