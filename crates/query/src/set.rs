//! Lazy result sets and their reducers
//!
//! A [`ResultSet`] is either a pending sequence or an already-known terminal
//! failure, never both. Combinators build new sets on top of old ones without
//! running anything; the reducers here are the only place a sequence is
//! actually driven.

use crate::error::{QueryError, Result};
use crate::seq::Seq;

/// Either a lazy sequence of items or a terminal error
#[derive(Debug)]
pub enum ResultSet<T> {
    Lazy(Seq<T>),
    Failed(QueryError),
}

impl<T> Clone for ResultSet<T> {
    fn clone(&self) -> Self {
        match self {
            ResultSet::Lazy(seq) => ResultSet::Lazy(seq.clone()),
            ResultSet::Failed(err) => ResultSet::Failed(err.clone()),
        }
    }
}

/// A set of per-item results, e.g. one attribute lookup per node
pub type ValueSet<T = String> = ResultSet<Result<T>>;

/// An item a reducer can turn into a value or a per-item error
pub trait Entity {
    type Value;

    fn into_result(self) -> Result<Self::Value>;
}

impl<T> Entity for Result<T> {
    type Value = T;

    fn into_result(self) -> Result<T> {
        self
    }
}

impl Entity for dom::Node {
    type Value = dom::Node;

    fn into_result(self) -> Result<dom::Node> {
        Ok(self)
    }
}

impl<T: 'static> ResultSet<T> {
    pub fn from_seq(seq: Seq<T>) -> Self {
        ResultSet::Lazy(seq)
    }

    pub fn failed(err: QueryError) -> Self {
        tracing::debug!("[ResultSet] Terminal error: {}", err);
        ResultSet::Failed(err)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ResultSet::Failed(_))
    }

    /// The terminal error, if any
    pub fn error(&self) -> Option<&QueryError> {
        match self {
            ResultSet::Lazy(_) => None,
            ResultSet::Failed(err) => Some(err),
        }
    }

    /// The backing sequence; empty when the set has failed. Runs nothing.
    pub fn enumerate(&self) -> Seq<T> {
        match self {
            ResultSet::Lazy(seq) => seq.clone(),
            ResultSet::Failed(_) => Seq::empty(),
        }
    }

    /// Build a derived set. A failed set passes its error through and
    /// `derive` is never called.
    pub(crate) fn derive<U: 'static>(
        &self,
        derive: impl FnOnce(Seq<T>) -> Seq<U>,
    ) -> ResultSet<U> {
        match self {
            ResultSet::Lazy(seq) => ResultSet::Lazy(derive(seq.clone())),
            ResultSet::Failed(err) => ResultSet::Failed(err.clone()),
        }
    }
}

impl<T: Entity + 'static> ResultSet<T> {
    /// First item's value (or its own error). `NotFound` if there is none.
    /// Stops the sequence after the first item.
    pub fn first_or_error(&self) -> Result<T::Value> {
        let seq = match self {
            ResultSet::Lazy(seq) => seq,
            ResultSet::Failed(err) => return Err(err.clone()),
        };

        let mut first = None;
        seq.produce(|item| {
            first = Some(item);
            false
        });

        first.map_or(Err(QueryError::NotFound), Entity::into_result)
    }

    /// Like [`first_or_error`](Self::first_or_error), but a second item of
    /// any kind, successful or not, makes the result `TooManyEntities`.
    /// Stops the sequence as soon as the second item shows up.
    pub fn first_and_unique_or_error(&self) -> Result<T::Value> {
        let seq = match self {
            ResultSet::Lazy(seq) => seq,
            ResultSet::Failed(err) => return Err(err.clone()),
        };

        let mut first = None;
        let mut multiple = false;
        seq.produce(|item| {
            if first.is_none() {
                first = Some(item);
                return true;
            }
            multiple = true;
            false
        });

        if multiple {
            tracing::trace!("[ResultSet] Uniqueness violated");
            return Err(QueryError::TooManyEntities);
        }
        first.map_or(Err(QueryError::NotFound), Entity::into_result)
    }

    /// Drive the whole sequence, one result per item. A failed set yields
    /// its terminal error instead.
    pub fn collect(&self) -> Result<Vec<Result<T::Value>>> {
        match self {
            ResultSet::Lazy(seq) => {
                let mut items = Vec::new();
                seq.for_each(|item| items.push(item.into_result()));
                Ok(items)
            }
            ResultSet::Failed(err) => Err(err.clone()),
        }
    }
}

impl<T: 'static> ResultSet<Result<T>> {
    /// Keep only the items that carry a value. Use before a uniqueness
    /// reduction when missing values should not count towards multiplicity.
    pub fn successes(&self) -> ValueSet<T> {
        self.derive(|parent| {
            Seq::from_fn(move |consume| {
                parent.produce(|item| match item {
                    Ok(value) => consume(Ok(value)),
                    Err(_) => true,
                })
            })
        })
    }
}

impl<T: 'static> From<Seq<T>> for ResultSet<T> {
    fn from(seq: Seq<T>) -> Self {
        ResultSet::Lazy(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn values(items: Vec<Result<&'static str>>) -> ValueSet<&'static str> {
        ResultSet::from_seq(Seq::from_vec(items))
    }

    fn exploding() -> ValueSet<&'static str> {
        ResultSet::from_seq(Seq::from_fn(|_| panic!("sequence evaluated")))
    }

    /// Counts how many items were pulled out of the producer
    fn counted(n: usize, pulled: Rc<Cell<usize>>) -> ValueSet<usize> {
        ResultSet::from_seq(Seq::from_fn(move |consume| {
            for i in 0..n {
                pulled.set(pulled.get() + 1);
                if !consume(Ok(i)) {
                    return;
                }
            }
        }))
    }

    #[test]
    fn test_first_or_error() {
        assert!(values(vec![]).first_or_error().unwrap_err().is_not_found());
        assert_eq!(values(vec![Ok("a")]).first_or_error().unwrap(), "a");
        assert_eq!(
            values(vec![Ok("a"), Ok("b"), Ok("c")]).first_or_error().unwrap(),
            "a"
        );
        assert!(values(vec![Err(QueryError::NotFound), Ok("b")])
            .first_or_error()
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_first_or_error_pulls_one_item() {
        let pulled = Rc::new(Cell::new(0));
        let set = counted(100, Rc::clone(&pulled));
        assert_eq!(set.first_or_error().unwrap(), 0);
        assert_eq!(pulled.get(), 1);
    }

    #[test]
    fn test_first_and_unique() {
        assert!(values(vec![])
            .first_and_unique_or_error()
            .unwrap_err()
            .is_not_found());
        assert_eq!(values(vec![Ok("a")]).first_and_unique_or_error().unwrap(), "a");
        assert!(values(vec![Ok("a"), Ok("b")])
            .first_and_unique_or_error()
            .unwrap_err()
            .is_too_many());
        // The second item counts even though it is itself an error
        assert!(values(vec![Ok("a"), Err(QueryError::NotFound)])
            .first_and_unique_or_error()
            .unwrap_err()
            .is_too_many());
        // A lone per-item error is returned as is
        assert!(values(vec![Err(QueryError::NotFound)])
            .first_and_unique_or_error()
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_first_and_unique_stops_at_second_item() {
        let pulled = Rc::new(Cell::new(0));
        let set = counted(100, Rc::clone(&pulled));
        assert!(set.first_and_unique_or_error().unwrap_err().is_too_many());
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn test_failed_set_never_evaluates() {
        let err = QueryError::upstream(std::io::Error::other("boom"));
        let failed: ValueSet<&'static str> = ResultSet::failed(err);

        assert_eq!(failed.first_or_error().unwrap_err().to_string(), "boom");
        assert_eq!(
            failed.first_and_unique_or_error().unwrap_err().to_string(),
            "boom"
        );
        assert_eq!(failed.enumerate().count(), 0);
        assert!(failed.collect().is_err());
        assert!(failed.successes().is_failed());
        assert!(failed.error().is_some());
    }

    #[test]
    fn test_derived_sets_are_lazy() {
        // Building on top of a sequence that panics must not run it
        let set = exploding().successes().successes();
        assert!(!set.is_failed());
        let _seq = set.enumerate();
    }

    #[test]
    fn test_successes() {
        let set = values(vec![
            Err(QueryError::NotFound),
            Ok("v"),
            Err(QueryError::NotFound),
        ]);
        assert!(set.first_and_unique_or_error().unwrap_err().is_too_many());
        assert_eq!(set.successes().first_and_unique_or_error().unwrap(), "v");
    }

    #[test]
    fn test_collect() {
        let set = values(vec![Ok("a"), Err(QueryError::NotFound)]);
        let items = set.collect().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(*items[0].as_ref().unwrap(), "a");
        assert!(items[1].as_ref().unwrap_err().is_not_found());
    }
}
