//! Shared read-only handles into a built [`Document`]
//!
//! A [`Node`] is an `Arc<Document>` plus an index. Cloning one is a refcount
//! bump; the document lives as long as any handle to it does.

use std::fmt;
use std::sync::Arc;

use crate::arena::{Document, ROOT_ID};
use crate::error::Result;
use crate::types::{Attribute, DomNode, NodeId, NodeType};

/// Handle to one node of a shared document
#[derive(Clone)]
pub struct Node {
    doc: Arc<Document>,
    id: NodeId,
}

impl Node {
    /// Handle to the `#document` root
    pub fn root(doc: Arc<Document>) -> Self {
        Self { doc, id: ROOT_ID }
    }

    /// Handle to an arbitrary node, checked against the arena
    pub fn new(doc: Arc<Document>, id: NodeId) -> Result<Self> {
        doc.get(id)?;
        Ok(Self { doc, id })
    }

    fn data(&self) -> &DomNode {
        // ids are validated on construction and the arena is append-only
        self.doc.get(self.id).unwrap_or_else(|_| self.doc.root())
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.doc
    }

    pub fn node_type(&self) -> NodeType {
        self.data().node_type
    }

    pub fn is_element(&self) -> bool {
        self.data().is_element()
    }

    /// `div`, `#text`, `#document`, ...
    pub fn node_name(&self) -> &str {
        &self.data().node_name
    }

    /// Tag name, only for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        self.data().tag_name()
    }

    /// Character data of text, comment and PI nodes
    pub fn value(&self) -> &str {
        &self.data().node_value
    }

    /// Attributes in source order
    pub fn attrs(&self) -> &[Attribute] {
        &self.data().attributes
    }

    /// First attribute named `name`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.data().attr(name)
    }

    pub fn parent(&self) -> Option<Node> {
        self.data().parent_id.map(|id| self.at(id))
    }

    /// Direct children, in order
    pub fn children(&self) -> Children<'_> {
        Children {
            doc: &self.doc,
            ids: self.data().children_ids.iter(),
        }
    }

    /// All descendants in depth-first document order, excluding `self`.
    /// Pulled one at a time: dropping the iterator stops the walk.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = Vec::new();
        stack.extend(self.data().children_ids.iter().rev());
        Descendants {
            doc: &self.doc,
            stack,
        }
    }

    /// Concatenated text of every text node in the subtree
    pub fn text_content(&self) -> String {
        std::iter::once(self.clone())
            .chain(self.descendants())
            .filter(|node| node.data().is_text())
            .map(|node| node.value().to_string())
            .collect()
    }

    fn at(&self, id: NodeId) -> Node {
        Node {
            doc: Arc::clone(&self.doc),
            id,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.doc, &other.doc)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.node_name())
            .finish()
    }
}

/// Iterator over the direct children of a node
pub struct Children<'a> {
    doc: &'a Arc<Document>,
    ids: std::slice::Iter<'a, NodeId>,
}

impl Iterator for Children<'_> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        self.ids.next().map(|&id| Node {
            doc: Arc::clone(self.doc),
            id,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

/// Pre-order walk below a node, explicit stack instead of recursion
pub struct Descendants<'a> {
    doc: &'a Arc<Document>,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let id = self.stack.pop()?;
        if let Ok(node) = self.doc.get(id) {
            // Push children in reverse order (so they're visited left-to-right)
            self.stack.extend(node.children_ids.iter().rev());
        }
        Some(Node {
            doc: Arc::clone(self.doc),
            id,
        })
    }
}
