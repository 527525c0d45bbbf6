//! Arena-based document storage
//!
//! ## Memory Layout
//!
//! ```text
//! Document: Vec<DomNode>
//!           [#document][Node1][Node2]...
//!            ↑ 4-byte index, not 8-byte pointer
//! ```
//!
//! The arena is append-only. Once built it is shared behind an `Arc` and
//! read through [`Node`](crate::Node) handles; nothing is ever removed, so an
//! id handed out by the arena stays valid for the arena's lifetime.

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};

/// Id of the `#document` node every arena starts with
pub const ROOT_ID: NodeId = 0;

/// Arena of document nodes
///
/// Design:
/// - Single Vec<DomNode> for sequential allocation
/// - No Rc/Arc between nodes: use indices everywhere
/// - Node 0 is always the `#document` root
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<DomNode>,
}

impl Document {
    /// Create an arena holding only the `#document` root
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(DomNode::new(
            NodeType::Document,
            NodeType::Document.default_name(),
        ));
        Self { nodes }
    }

    /// Add `node` as the last child of `parent_id`, returns its ID
    pub fn append_child(&mut self, parent_id: NodeId, mut node: DomNode) -> Result<NodeId> {
        let parent = self.get(parent_id)?;
        if matches!(
            parent.node_type,
            NodeType::Text | NodeType::Comment | NodeType::ProcessingInstruction
        ) {
            return Err(DomError::InvalidNodeType {
                expected: "container node".to_string(),
                actual: format!("{:?}", parent.node_type),
            });
        }

        let node_id = next_node_id(self.nodes.len())?;
        node.node_id = node_id;
        node.parent_id = Some(parent_id);
        node.children_ids.clear();
        self.nodes.push(node);
        self.get_mut(parent_id)?.children_ids.push(node_id);
        Ok(node_id)
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get root node
    pub fn root(&self) -> &DomNode {
        &self.nodes[ROOT_ID as usize]
    }

    /// Total number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

/// Id for the node stored at `index`, if the id space still has room
fn next_node_id(index: usize) -> Result<NodeId> {
    NodeId::try_from(index).map_err(|_| DomError::TooManyNodes { max: NodeId::MAX })
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
