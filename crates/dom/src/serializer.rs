//! DOM Serializer - render a subtree back to HTML
//!
//! Used for showing query results. Output is normalized markup, not the
//! original bytes: attribute quoting, entity escaping and void elements
//! follow HTML serialization rules.

use crate::node::Node;
use crate::types::NodeType;

/// Elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text children are written without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    /// One node per line, indented by depth
    pub pretty: bool,
    /// Truncate text nodes longer than this (None = keep everything)
    pub max_text_length: Option<usize>,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            max_text_length: None,
        }
    }
}

/// DOM Tree Serializer
#[derive(Debug, Clone, Default)]
pub struct DomSerializer {
    config: SerializerConfig,
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize `node` and its subtree
    pub fn serialize(&self, node: &Node) -> String {
        let mut output = String::with_capacity(256);
        self.serialize_node(node, 0, &mut output);
        output
    }

    fn serialize_node(&self, node: &Node, depth: usize, output: &mut String) {
        let indent = if self.config.pretty {
            "  ".repeat(depth)
        } else {
            String::new()
        };
        let newline = if self.config.pretty { "\n" } else { "" };

        match node.node_type() {
            NodeType::Element => {
                let tag = node.node_name();
                output.push_str(&indent);
                output.push('<');
                output.push_str(tag);
                for attr in node.attrs() {
                    output.push(' ');
                    output.push_str(&attr.name);
                    output.push_str("=\"");
                    escape_into(&attr.value, true, output);
                    output.push('"');
                }
                output.push('>');
                output.push_str(newline);

                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }

                for child in node.children() {
                    self.serialize_node(&child, depth + 1, output);
                }

                output.push_str(&indent);
                output.push_str("</");
                output.push_str(tag);
                output.push('>');
                output.push_str(newline);
            }
            NodeType::Text => {
                let text = node.value();
                if self.config.pretty && text.trim().is_empty() {
                    return;
                }
                let text = self.cap_text_length(text);
                output.push_str(&indent);
                if in_raw_text_element(node) {
                    output.push_str(&text);
                } else {
                    escape_into(&text, false, output);
                }
                output.push_str(newline);
            }
            NodeType::Comment => {
                output.push_str(&indent);
                output.push_str("<!--");
                output.push_str(node.value());
                output.push_str("-->");
                output.push_str(newline);
            }
            NodeType::DocumentType => {
                output.push_str(&indent);
                output.push_str("<!DOCTYPE ");
                output.push_str(node.value());
                output.push('>');
                output.push_str(newline);
            }
            NodeType::Document | NodeType::DocumentFragment => {
                // Containers have no markup of their own
                for child in node.children() {
                    self.serialize_node(&child, depth, output);
                }
            }
            NodeType::ProcessingInstruction => {}
        }
    }

    /// Cap text length to keep result listings readable
    fn cap_text_length(&self, text: &str) -> String {
        match self.config.max_text_length {
            Some(max_len) if text.chars().count() > max_len => {
                let capped: String = text.chars().take(max_len).collect();
                format!("{}...", capped)
            }
            _ => text.to_string(),
        }
    }
}

fn in_raw_text_element(node: &Node) -> bool {
    node.parent()
        .is_some_and(|parent| parent.tag_name().is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag)))
}

fn escape_into(text: &str, in_attribute: bool, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            '"' if in_attribute => output.push_str("&quot;"),
            '<' if !in_attribute => output.push_str("&lt;"),
            '>' if !in_attribute => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Serialize with the default (compact) configuration
pub fn outer_html(node: &Node) -> String {
    DomSerializer::new().serialize(node)
}
