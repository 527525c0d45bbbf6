//! HTML Parser - turns markup into a [`Document`] arena
//!
//! Parsing itself is html5ever (through `scraper`), with its usual error
//! recovery. This module only:
//! - bounds and reads the input
//! - copies the parsed tree into the arena, preserving document order
//!
//! Input that is not valid UTF-8 is decoded lossily; encoding sniffing is
//! not this crate's business.

use std::io::Read;
use std::sync::Arc;

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::arena::{Document, ROOT_ID};
use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};

/// Configuration for the HTML parser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Inputs longer than this are rejected before parsing
    pub max_input_bytes: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 64 * 1024 * 1024,
        }
    }
}

/// HTML parser with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    config: ParseConfig,
}

impl HtmlParser {
    /// Create parser with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parser with custom config
    pub fn with_config(config: ParseConfig) -> Self {
        Self { config }
    }

    /// Read `reader` to the end (bounded by `max_input_bytes`) and parse it
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Arc<Document>> {
        let max = self.config.max_input_bytes;
        let mut buf = Vec::new();
        // One extra byte tells "exactly max" apart from "too large"
        reader
            .take((max as u64).saturating_add(1))
            .read_to_end(&mut buf)
            .map_err(DomError::IoError)?;
        self.parse_bytes(&buf)
    }

    /// Parse raw markup bytes
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Arc<Document>> {
        if bytes.len() > self.config.max_input_bytes {
            tracing::warn!(
                "[Parser] Rejecting input: larger than {} bytes",
                self.config.max_input_bytes
            );
            return Err(DomError::InputTooLarge {
                max: self.config.max_input_bytes,
            });
        }
        Ok(self.parse_html(&String::from_utf8_lossy(bytes)))
    }

    /// Parse markup that is already text. Never fails: html5ever recovers
    /// from any malformed input.
    pub fn parse_html(&self, html: &str) -> Arc<Document> {
        let parsed = Html::parse_document(html);
        let mut doc = Document::with_capacity(html.len() / 16);

        // (source node, arena parent); children pushed reversed so they are
        // popped, and therefore numbered, in document order
        let mut stack: Vec<_> = parsed
            .tree
            .root()
            .children()
            .rev()
            .map(|child| (child, ROOT_ID))
            .collect();

        while let Some((source, parent_id)) = stack.pop() {
            let node = convert_node(source.value());
            let node_id: NodeId = match doc.append_child(parent_id, node) {
                Ok(id) => id,
                Err(err) => {
                    tracing::debug!("[Parser] Dropping node under {}: {}", parent_id, err);
                    continue;
                }
            };
            stack.extend(source.children().rev().map(|child| (child, node_id)));
        }

        tracing::debug!(
            "[Parser] Parsed document: {} bytes, {} nodes",
            html.len(),
            doc.len()
        );
        Arc::new(doc)
    }
}

/// Map one html5ever node onto an arena node (links are set by the arena)
fn convert_node(source: &scraper::Node) -> DomNode {
    match source {
        scraper::Node::Element(element) => {
            let mut node = DomNode::element(element.name());
            for (name, value) in element.attrs() {
                node = node.with_attr(name, value);
            }
            node
        }
        scraper::Node::Text(text) => DomNode::text(&**text),
        scraper::Node::Comment(comment) => DomNode::comment(&**comment),
        scraper::Node::Doctype(doctype) => DomNode::new(
            NodeType::DocumentType,
            NodeType::DocumentType.default_name(),
        )
        .with_value(doctype.name()),
        scraper::Node::ProcessingInstruction(pi) => DomNode::new(
            NodeType::ProcessingInstruction,
            NodeType::ProcessingInstruction.default_name(),
        )
        .with_value(&**pi),
        scraper::Node::Document => {
            DomNode::new(NodeType::Document, NodeType::Document.default_name())
        }
        scraper::Node::Fragment => DomNode::new(
            NodeType::DocumentFragment,
            NodeType::DocumentFragment.default_name(),
        ),
    }
}

/// Parse a reader with the default configuration
pub fn parse_reader<R: Read>(reader: R) -> Result<Arc<Document>> {
    HtmlParser::new().parse_reader(reader)
}

/// Parse markup with the default configuration
pub fn parse_html(html: &str) -> Arc<Document> {
    HtmlParser::new().parse_html(html)
}
