//! Lazy Query Algebra over HTML Documents
//!
//! Queries are chains of combinators on lazy sets, ended by a reducer:
//!
//! ```text
//! source ─→ NodeSet ─ children / descendants_inclusive / filter_by_name ─→ NodeSet
//!                    └ attribute / text ─→ ValueSet
//!
//! NodeSet | ValueSet ─ first_or_error / first_and_unique_or_error / enumerate
//! ```
//!
//! ## Rules every combinator keeps
//!
//! - **Lazy**: building a chain runs nothing; reducers drive it
//! - **Failed sets stay failed**: a terminal error skips every later step
//!   and comes out of the reducer unchanged
//! - **Early exit**: a reducer that has its answer stops the whole chain,
//!   however deep the tree
//!
//! ```no_run
//! let set = query::source("page.html");
//! let href = set
//!     .descendants_inclusive()
//!     .filter_by_name("a")
//!     .attribute("href")
//!     .first_or_error();
//! ```

pub mod error;
pub mod node_set;
pub mod seq;
pub mod set;
pub mod source;

pub use dom::Node;
pub use error::{OpenError, QueryError, Result, SourceError};
pub use node_set::NodeSet;
pub use seq::{Empty, LazySequence, Seq};
pub use set::{Entity, ResultSet, ValueSet};
pub use source::{new, source, FsOpener, Loader, Source, SourceConfig, StreamOpener};
