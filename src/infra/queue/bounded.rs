//! Double-ended queue with an optional ring-buffer bound.

use std::collections::vec_deque::{self, VecDeque};
use std::ops::Index;

/// Double-ended queue with optional `maxlen`.
///
/// When full, a push at one end silently evicts the element at the opposite
/// end. A `maxlen` of zero turns every push into a no-op. Equality compares
/// contents only.
#[derive(Debug, Clone)]
pub struct BoundedDeque<T> {
    items: VecDeque<T>,
    maxlen: Option<usize>,
}

impl<T> BoundedDeque<T> {
    /// Create an unbounded, empty queue.
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
            maxlen: None,
        }
    }

    /// Create an empty queue with an optional bound.
    pub const fn with_maxlen(maxlen: Option<usize>) -> Self {
        Self {
            items: VecDeque::new(),
            maxlen,
        }
    }

    /// Create an empty queue, preallocating room for `capacity` elements.
    pub fn with_capacity(capacity: usize, maxlen: Option<usize>) -> Self {
        let capacity = maxlen.map_or(capacity, |m| capacity.min(m));
        Self {
            items: VecDeque::with_capacity(capacity),
            maxlen,
        }
    }

    /// Build from an iterator; with a bound only the last `maxlen` items stay.
    pub fn from_iter_bounded<I>(iter: I, maxlen: Option<usize>) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut deque = Self::with_maxlen(maxlen);
        deque.extend(iter);
        deque
    }

    /// Configured bound.
    pub const fn maxlen(&self) -> Option<usize> {
        self.maxlen
    }

    /// Append at the back, evicting from the front when full.
    pub fn push_back(&mut self, item: T) {
        match self.maxlen {
            Some(0) => return,
            Some(max) if self.items.len() >= max => {
                self.items.pop_front();
            }
            _ => {}
        }
        self.items.push_back(item);
    }

    /// Prepend at the front, evicting from the back when full.
    pub fn push_front(&mut self, item: T) {
        match self.maxlen {
            Some(0) => return,
            Some(max) if self.items.len() >= max => {
                self.items.pop_back();
            }
            _ => {}
        }
        self.items.push_front(item);
    }

    /// Remove the back element.
    pub fn pop_back(&mut self) -> Option<T> {
        self.items.pop_back()
    }

    /// Remove the front element.
    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Element at `index`, counted from the front.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Front element.
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    /// Back element.
    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate front to back.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    /// Keep only elements matching `keep`.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.items.retain(keep);
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Underlying storage.
    pub const fn as_deque(&self) -> &VecDeque<T> {
        &self.items
    }
}

impl<T> Default for BoundedDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for BoundedDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for BoundedDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            maxlen: None,
        }
    }
}

impl<'a, T> IntoIterator for &'a BoundedDeque<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for BoundedDeque<T> {
    type Item = T;
    type IntoIter = vec_deque::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T> Index<usize> for BoundedDeque<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T: PartialEq> PartialEq for BoundedDeque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for BoundedDeque<T> {}

impl<T: PartialEq> PartialEq<VecDeque<T>> for BoundedDeque<T> {
    fn eq(&self, other: &VecDeque<T>) -> bool {
        &self.items == other
    }
}
