//! Deque that observes pushes and pops through hooks.

use std::collections::vec_deque;
use std::fmt;

use super::BoundedDeque;
use crate::core::InstrumentError;

/// Callback fired around a deque mutation.
///
/// Implemented for every `FnMut()` closure and for [`NoHook`], whose firing
/// compiles to nothing, so an absent hook leaves the primitive operation.
pub trait DequeHook {
    /// Whether this hook observes anything.
    const ACTIVE: bool = true;

    /// Fire the hook.
    fn fire(&mut self);
}

/// Absent hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHook;

impl DequeHook for NoHook {
    const ACTIVE: bool = false;

    #[inline(always)]
    fn fire(&mut self) {}
}

impl<F: FnMut()> DequeHook for F {
    #[inline]
    fn fire(&mut self) {
        self();
    }
}

/// Deque calling `push_hook` right before each push and `pop_hook` right
/// after each pop that removed an element, at either end.
///
/// Elements present at construction and evictions caused by `maxlen` are
/// never reported.
pub struct InterceptedDeque<T, P = NoHook, Q = NoHook> {
    inner: BoundedDeque<T>,
    push_hook: P,
    pop_hook: Q,
}

impl<T, P: DequeHook, Q: DequeHook> InterceptedDeque<T, P, Q> {
    /// Wrap `inner`. Pass [`NoHook`] for an absent hook.
    ///
    /// # Errors
    ///
    /// Returns [`InstrumentError::MissingHooks`] when both hooks are
    /// [`NoHook`].
    pub fn new(inner: BoundedDeque<T>, push_hook: P, pop_hook: Q) -> Result<Self, InstrumentError> {
        if !P::ACTIVE && !Q::ACTIVE {
            return Err(InstrumentError::MissingHooks("push_hook", "pop_hook"));
        }
        Ok(Self {
            inner,
            push_hook,
            pop_hook,
        })
    }

    /// Append at the back.
    pub fn push_back(&mut self, item: T) {
        self.push_hook.fire();
        self.inner.push_back(item);
    }

    /// Prepend at the front.
    pub fn push_front(&mut self, item: T) {
        self.push_hook.fire();
        self.inner.push_front(item);
    }

    /// Remove the back element.
    pub fn pop_back(&mut self) -> Option<T> {
        let item = self.inner.pop_back();
        if item.is_some() {
            self.pop_hook.fire();
        }
        item
    }

    /// Remove the front element.
    pub fn pop_front(&mut self) -> Option<T> {
        let item = self.inner.pop_front();
        if item.is_some() {
            self.pop_hook.fire();
        }
        item
    }
}

impl<T, P: FnMut()> InterceptedDeque<T, P, NoHook> {
    /// Observe pushes only.
    pub const fn with_push_hook(inner: BoundedDeque<T>, push_hook: P) -> Self {
        Self {
            inner,
            push_hook,
            pop_hook: NoHook,
        }
    }
}

impl<T, Q: FnMut()> InterceptedDeque<T, NoHook, Q> {
    /// Observe pops only.
    pub const fn with_pop_hook(inner: BoundedDeque<T>, pop_hook: Q) -> Self {
        Self {
            inner,
            push_hook: NoHook,
            pop_hook,
        }
    }
}

impl<T, P, Q> InterceptedDeque<T, P, Q> {
    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.inner.get(index)
    }

    /// Front element.
    pub fn front(&self) -> Option<&T> {
        self.inner.front()
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

    /// Iterate front to back.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.inner.iter()
    }

    /// The wrapped deque.
    pub const fn as_inner(&self) -> &BoundedDeque<T> {
        &self.inner
    }

    /// Drop the hooks and return the wrapped deque.
    pub fn into_inner(self) -> BoundedDeque<T> {
        self.inner
    }
}

impl<T: PartialEq, P, Q> PartialEq<BoundedDeque<T>> for InterceptedDeque<T, P, Q> {
    fn eq(&self, other: &BoundedDeque<T>) -> bool {
        &self.inner == other
    }
}

impl<T: PartialEq, P, Q> PartialEq for InterceptedDeque<T, P, Q> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: fmt::Debug, P, Q> fmt::Debug for InterceptedDeque<T, P, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptedDeque")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
