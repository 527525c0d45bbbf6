//! Core type definitions for the document arena
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for small arrays (avoid heap allocation)
//! 3. Keep attribute order exactly as the parser produced it

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node identifier (index into arena)
/// u32 allows 4 billion nodes, enough for any document
pub type NodeId = u32;

/// Node type, numbered after the DOM specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
}

impl NodeType {
    /// Name used for non-element nodes (`#text`, `#comment`, ...)
    pub fn default_name(self) -> &'static str {
        match self {
            NodeType::Element => "",
            NodeType::Text => "#text",
            NodeType::ProcessingInstruction => "#pi",
            NodeType::Comment => "#comment",
            NodeType::Document => "#document",
            NodeType::DocumentType => "#doctype",
            NodeType::DocumentFragment => "#document-fragment",
        }
    }
}

/// One `name="value"` pair of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The stored tree node
///
/// Design philosophy:
/// - Small fixed-size fields first (better packing)
/// - Use indices instead of pointers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>, // Most nodes have <4 children

    /// Tag name for elements, `#text` etc. otherwise
    pub node_name: String,
    /// Character data for text, comment and PI nodes
    pub node_value: String,
    pub attributes: SmallVec<[Attribute; 2]>,
}

impl DomNode {
    /// Create a detached node; the arena assigns id and links on insertion
    pub fn new(node_type: NodeType, node_name: impl Into<String>) -> Self {
        Self {
            node_id: 0,
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name: node_name.into(),
            node_value: String::new(),
            attributes: SmallVec::new(),
        }
    }

    pub fn element(tag: impl Into<String>) -> Self {
        Self::new(NodeType::Element, tag)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeType::Text, NodeType::Text.default_name()).with_value(value)
    }

    pub fn comment(value: impl Into<String>) -> Self {
        Self::new(NodeType::Comment, NodeType::Comment.default_name()).with_value(value)
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.node_value = value.into();
        self
    }

    /// Append an attribute (duplicates are kept, lookups see the first)
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    /// Check if node is an element
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if node is text
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get attribute value, first match wins
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}
