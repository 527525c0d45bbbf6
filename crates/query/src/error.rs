//! Error types for queries and sources
//!
//! `QueryError` is what reducers hand back. Two kinds belong to the query
//! algebra itself; everything else arrives from outside (parsing, opening a
//! location) and is carried verbatim.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// A reduction found no qualifying item
    #[error("entity not found")]
    NotFound,

    /// A uniqueness reduction found more than one item
    #[error("too many entities found")]
    TooManyEntities,

    /// Failure from outside the query algebra, forwarded untouched
    #[error(transparent)]
    Upstream(Arc<dyn StdError + Send + Sync>),
}

impl QueryError {
    /// Wrap an external error as a terminal error
    pub fn upstream<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        QueryError::Upstream(Arc::new(err))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NotFound)
    }

    pub fn is_too_many(&self) -> bool {
        matches!(self, QueryError::TooManyEntities)
    }

    /// The external error, if this is one
    pub fn as_upstream(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            QueryError::Upstream(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Whatever a stream opener fails with; carried to reducers as it is
pub type OpenError = Box<dyn StdError + Send + Sync>;

impl From<OpenError> for QueryError {
    fn from(err: OpenError) -> Self {
        QueryError::Upstream(Arc::from(err))
    }
}

/// Failures raised by the loader itself
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Unsupported location scheme: {0}")]
    UnsupportedScheme(String),
}

impl From<SourceError> for QueryError {
    fn from(err: SourceError) -> Self {
        QueryError::upstream(err)
    }
}
