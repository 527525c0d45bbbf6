//! Source normalization - where queries start
//!
//! Anything a query can start from becomes a [`NodeSet`] here:
//! - locations (paths, `file://` URLs) are opened and parsed
//! - bytes and readers are parsed
//! - parsed documents become a one-root set
//! - node sequences and node sets are taken as they are
//!
//! Parse and open failures are not returned: they become a failed set that
//! carries the error, exactly as the parser or opener raised it, to whichever
//! reducer eventually runs.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use dom::{Document, HtmlParser, Node, ParseConfig};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{OpenError, QueryError, SourceError};
use crate::node_set::NodeSet;
use crate::seq::Seq;
use crate::set::ResultSet;

/// Something a [`NodeSet`] can be built from
pub enum Source {
    /// Filesystem path or `file://` URL
    Location(String),
    /// Raw markup
    Bytes(Vec<u8>),
    /// Markup read to the end, then dropped
    Reader(Box<dyn Read>),
    /// Already-parsed document; the set holds its root
    Document(Arc<Document>),
    /// Nodes accepted as they are
    Nodes(Seq<Node>),
    /// Passed through unchanged
    Set(NodeSet),
}

impl Source {
    pub fn reader(reader: impl Read + 'static) -> Self {
        Source::Reader(Box::new(reader))
    }
}

impl From<&str> for Source {
    fn from(location: &str) -> Self {
        Source::Location(location.to_string())
    }
}

impl From<String> for Source {
    fn from(location: String) -> Self {
        Source::Location(location)
    }
}

impl From<&[u8]> for Source {
    fn from(bytes: &[u8]) -> Self {
        Source::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}

impl From<Arc<Document>> for Source {
    fn from(doc: Arc<Document>) -> Self {
        Source::Document(doc)
    }
}

impl From<Seq<Node>> for Source {
    fn from(nodes: Seq<Node>) -> Self {
        Source::Nodes(nodes)
    }
}

impl From<NodeSet> for Source {
    fn from(set: NodeSet) -> Self {
        Source::Set(set)
    }
}

/// Opens locations for reading. Errors reach reducers unchanged.
pub trait StreamOpener {
    fn open(&self, location: &str) -> Result<Box<dyn Read>, OpenError>;
}

/// Opens local files, given as plain paths or `file://` URLs
#[derive(Debug, Clone)]
pub struct FsOpener {
    allow_file_urls: bool,
}

impl FsOpener {
    pub fn new(allow_file_urls: bool) -> Self {
        Self { allow_file_urls }
    }

    /// Map a location onto a local path
    pub fn resolve(&self, location: &str) -> Result<PathBuf, SourceError> {
        match Url::parse(location) {
            Ok(url) if url.scheme() == "file" && self.allow_file_urls => url
                .to_file_path()
                .map_err(|()| SourceError::UnsupportedScheme(location.to_string())),
            // Single letters are Windows drive prefixes (C:\...), not schemes
            Ok(url) if url.scheme().len() > 1 => {
                Err(SourceError::UnsupportedScheme(url.scheme().to_string()))
            }
            _ => Ok(PathBuf::from(location)),
        }
    }
}

impl Default for FsOpener {
    fn default() -> Self {
        Self::new(SourceConfig::default().allow_file_urls)
    }
}

impl StreamOpener for FsOpener {
    fn open(&self, location: &str) -> Result<Box<dyn Read>, OpenError> {
        let path = self.resolve(location)?;
        tracing::debug!("[FsOpener] Opening {}", path.display());
        Ok(Box::new(File::open(&path)?))
    }
}

/// Configuration for loading sources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub parse: ParseConfig,
    /// Accept `file://` URLs as locations
    pub allow_file_urls: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            parse: ParseConfig::default(),
            allow_file_urls: true,
        }
    }
}

/// Turns sources into node sets
pub struct Loader {
    parser: HtmlParser,
    opener: Box<dyn StreamOpener>,
}

impl Loader {
    /// Create loader with default config
    pub fn new() -> Self {
        Self::with_config(SourceConfig::default())
    }

    /// Create loader with custom config
    pub fn with_config(config: SourceConfig) -> Self {
        Self {
            parser: HtmlParser::with_config(config.parse),
            opener: Box::new(FsOpener::new(config.allow_file_urls)),
        }
    }

    /// Replace how locations are opened.
    ///
    /// The default opener reads local paths and `file://` URLs only; any
    /// other scheme (`https://`, ...) fails with
    /// [`SourceError::UnsupportedScheme`] unless an opener that understands
    /// it is installed here.
    pub fn with_opener(mut self, opener: impl StreamOpener + 'static) -> Self {
        self.opener = Box::new(opener);
        self
    }

    /// Parse `reader` into a one-root set, or a failed set on error
    pub fn parse(&self, reader: impl Read) -> NodeSet {
        match self.parser.parse_reader(reader) {
            Ok(doc) => NodeSet::single(Node::root(doc)),
            Err(err) => NodeSet::failed(QueryError::upstream(err)),
        }
    }

    pub fn load(&self, source: impl Into<Source>) -> NodeSet {
        match source.into() {
            Source::Location(location) => match self.opener.open(&location) {
                // The reader is dropped, and the file closed, once parsed
                Ok(reader) => self.parse(reader),
                Err(err) => {
                    tracing::warn!("[Loader] Cannot open {}: {}", location, err);
                    NodeSet::failed(err.into())
                }
            },
            Source::Bytes(bytes) => match self.parser.parse_bytes(&bytes) {
                Ok(doc) => NodeSet::single(Node::root(doc)),
                Err(err) => NodeSet::failed(QueryError::upstream(err)),
            },
            Source::Reader(reader) => self.parse(reader),
            Source::Document(doc) => NodeSet::single(Node::root(doc)),
            Source::Nodes(nodes) => ResultSet::from_seq(nodes),
            Source::Set(set) => set,
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `reader` with the default configuration
pub fn new(reader: impl Read) -> NodeSet {
    Loader::new().parse(reader)
}

/// Build a node set from any supported source, default configuration
pub fn source(source: impl Into<Source>) -> NodeSet {
    Loader::new().load(source)
}
