//! Deque that transforms elements lazily on the way out.

use std::collections::vec_deque;
use std::fmt;
use std::marker::PhantomData;

use super::BoundedDeque;

/// Transform applied to elements read out of a [`MappedDeque`].
pub trait Mapping<T, X> {
    /// Transform one element.
    fn apply(&self, item: T) -> X;
}

/// Absent transform: elements come out as stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<T> Mapping<T, T> for Identity {
    #[inline(always)]
    fn apply(&self, item: T) -> T {
        item
    }
}

impl<T, X, F: Fn(T) -> X> Mapping<T, X> for F {
    #[inline]
    fn apply(&self, item: T) -> X {
        self(item)
    }
}

/// Deque whose indexed reads and pops return `mapping(raw)`.
///
/// Elements are stored raw and pushed untouched; the mapping only runs for
/// elements that are actually read or popped. Length, equality and
/// iteration always see the raw elements.
pub struct MappedDeque<T, X = T, M = Identity> {
    inner: BoundedDeque<T>,
    mapping: M,
    _output: PhantomData<fn() -> X>,
}

impl<T> MappedDeque<T> {
    /// Wrap `inner` without a transform.
    pub const fn new(inner: BoundedDeque<T>) -> Self {
        Self {
            inner,
            mapping: Identity,
            _output: PhantomData,
        }
    }
}

impl<T, X, M: Mapping<T, X>> MappedDeque<T, X, M> {
    /// Wrap `inner`, transforming elements through `mapping` when read.
    pub const fn with_mapping(inner: BoundedDeque<T>, mapping: M) -> Self {
        Self {
            inner,
            mapping,
            _output: PhantomData,
        }
    }

    /// Remove the back element and return it transformed.
    pub fn pop_back(&mut self) -> Option<X> {
        self.inner.pop_back().map(|item| self.mapping.apply(item))
    }

    /// Remove the front element and return it transformed.
    pub fn pop_front(&mut self) -> Option<X> {
        self.inner.pop_front().map(|item| self.mapping.apply(item))
    }

    /// Transformed copy of the element at `index`.
    pub fn get(&self, index: usize) -> Option<X>
    where
        T: Clone,
    {
        self.inner
            .get(index)
            .cloned()
            .map(|item| self.mapping.apply(item))
    }

    /// The transform in use.
    pub const fn mapping(&self) -> &M {
        &self.mapping
    }
}

impl<T, X, M> MappedDeque<T, X, M> {
    /// Append at the back, untransformed.
    pub fn push_back(&mut self, item: T) {
        self.inner.push_back(item);
    }

    /// Prepend at the front, untransformed.
    pub fn push_front(&mut self, item: T) {
        self.inner.push_front(item);
    }

    /// Remove the front element without transforming it.
    pub fn pop_front_unmapped(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    /// Remove the back element without transforming it.
    pub fn pop_back_unmapped(&mut self) -> Option<T> {
        self.inner.pop_back()
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the deque is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Configured bound.
    pub const fn maxlen(&self) -> Option<usize> {
        self.inner.maxlen()
    }

    /// Iterate over raw elements, front to back.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.inner.iter()
    }

    /// The wrapped deque.
    pub const fn as_inner(&self) -> &BoundedDeque<T> {
        &self.inner
    }

    /// Drop the transform and return the wrapped deque.
    pub fn into_inner(self) -> BoundedDeque<T> {
        self.inner
    }
}

impl<T: PartialEq, X, M> PartialEq<BoundedDeque<T>> for MappedDeque<T, X, M> {
    fn eq(&self, other: &BoundedDeque<T>) -> bool {
        &self.inner == other
    }
}

impl<T: PartialEq, X, M> PartialEq for MappedDeque<T, X, M> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: fmt::Debug, X, M> fmt::Debug for MappedDeque<T, X, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedDeque")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
