//! Push-style lazy sequences
//!
//! A sequence is a producer: hand it a consumer, it calls the consumer once
//! per item in order and stops the moment the consumer returns `false`.
//! There is no cursor. Producing again starts over from the first item, and
//! a sequence built on top of another re-runs its parent every time.

use std::fmt;
use std::rc::Rc;

/// Produces items into a consumer until exhausted or told to stop
pub trait LazySequence<T> {
    /// Call `consume` once per item; return as soon as it returns `false`
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool);
}

impl<T, F> LazySequence<T> for F
where
    F: Fn(&mut dyn FnMut(T) -> bool),
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) {
        self(consume)
    }
}

/// A sequence with no items. Never calls its consumer.
///
/// Also serves keyed sequences, which are plain `LazySequence<(K, V)>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl<T> LazySequence<T> for Empty {
    fn produce(&self, _consume: &mut dyn FnMut(T) -> bool) {}
}

/// Shared, type-erased lazy sequence
pub struct Seq<T> {
    inner: Rc<dyn LazySequence<T>>,
}

impl<T: 'static> Seq<T> {
    pub fn new<S>(sequence: S) -> Self
    where
        S: LazySequence<T> + 'static,
    {
        Self {
            inner: Rc::new(sequence),
        }
    }

    /// Sequence driven by a producer closure
    pub fn from_fn<F>(producer: F) -> Self
    where
        F: Fn(&mut dyn FnMut(T) -> bool) + 'static,
    {
        Self::new(producer)
    }

    pub fn empty() -> Self {
        Self::new(Empty)
    }

    pub fn once(item: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(move |consume| {
            consume(item.clone());
        })
    }

    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Clone,
    {
        Self::from_fn(move |consume| {
            for item in &items {
                if !consume(item.clone()) {
                    return;
                }
            }
        })
    }

    /// Drive the sequence with `consume`
    pub fn produce(&self, mut consume: impl FnMut(T) -> bool) {
        self.inner.produce(&mut consume)
    }

    /// Drive the sequence to the end
    pub fn for_each(&self, mut f: impl FnMut(T)) {
        self.produce(|item| {
            f(item);
            true
        })
    }

    /// Drive the sequence to the end, keeping every item
    pub fn to_vec(&self) -> Vec<T> {
        let mut items = Vec::new();
        self.for_each(|item| items.push(item));
        items
    }

    pub fn count(&self) -> usize {
        let mut n = 0;
        self.for_each(|_| n += 1);
        n
    }
}

impl<T> Clone for Seq<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seq(..)")
    }
}
