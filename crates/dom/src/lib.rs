//! HTML Document Library
//!
//! Parsed HTML stored in an arena, read through cheap shared handles.
//!
//! ## Core Design
//!
//! ```text
//! bytes/reader → html5ever → Document (arena, owned) → Arc → Node handles
//!                                 ↓
//!                          NodeId (u32), #document at 0
//! ```
//!
//! Documents are immutable once shared, so any number of readers (threads
//! included) may walk the same tree.

pub mod arena;
pub mod error;
pub mod node;
pub mod parser;
pub mod serializer;
pub mod types;

pub use arena::{Document, ROOT_ID};
pub use error::{DomError, Result};
pub use node::{Children, Descendants, Node};
pub use parser::{parse_html, parse_reader, HtmlParser, ParseConfig};
pub use serializer::{outer_html, DomSerializer, SerializerConfig};
pub use types::*;
