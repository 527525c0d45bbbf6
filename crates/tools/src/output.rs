//! JSON shapes printed by `dql`

use dom::{Attribute, DomSerializer, Node, NodeType};
use query::QueryError;
use serde::Serialize;
use serde_json::{Value, json};

/// A node as printed in listings
#[derive(Debug, Serialize)]
pub struct NodeView {
    pub kind: NodeType,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    pub text: String,
}

impl NodeView {
    pub fn new(node: &Node) -> Self {
        let text = match node.node_type() {
            NodeType::Comment | NodeType::DocumentType | NodeType::ProcessingInstruction => {
                node.value().to_string()
            }
            _ => node.text_content().trim().to_string(),
        };
        Self {
            kind: node.node_type(),
            name: node.node_name().to_string(),
            attributes: node.attrs().to_vec(),
            text,
        }
    }
}

/// How nodes are rendered
#[derive(Debug, Clone)]
pub enum NodeFormat {
    Json,
    Html(DomSerializer),
}

pub fn node(node: &Node, format: &NodeFormat) -> Value {
    match format {
        NodeFormat::Html(serializer) => Value::String(serializer.serialize(node)),
        NodeFormat::Json => serde_json::to_value(NodeView::new(node)).unwrap_or(Value::Null),
    }
}

/// One item of a listing: the value, or the reason there is none
pub fn item<T>(item: Result<T, QueryError>, render: impl Fn(T) -> Value) -> Value {
    match item {
        Ok(value) => json!({ "value": render(value) }),
        Err(err) => json!({ "error": err.to_string() }),
    }
}
