//! Renderable content nodes.

use serde::Serialize;
use std::collections::BTreeMap;

/// A node of parsed children content, ready for an external renderer.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentNode {
    /// An element with attributes and children.
    Element {
        /// Tag name as written (e.g., "div", "Badge").
        name: String,
        /// Attribute values as plain text.
        attributes: BTreeMap<String, String>,
        /// Child nodes.
        children: Vec<ContentNode>,
    },
    /// Plain text.
    Text {
        /// The text.
        value: String,
    },
}

impl ContentNode {
    /// Creates a text node.
    pub fn text(value: impl Into<String>) -> Self {
        ContentNode::Text {
            value: value.into(),
        }
    }

    /// Creates an element with no attributes.
    pub fn element(name: impl Into<String>, children: Vec<ContentNode>) -> Self {
        ContentNode::Element {
            name: name.into(),
            attributes: BTreeMap::new(),
            children,
        }
    }

    /// Adds an attribute to an element; text nodes are returned unchanged.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let ContentNode::Element { attributes, .. } = &mut self {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Tag name, for elements.
    pub fn name(&self) -> Option<&str> {
        match self {
            ContentNode::Element { name, .. } => Some(name.as_str()),
            ContentNode::Text { .. } => None,
        }
    }

    /// Attribute value, for elements.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            ContentNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            ContentNode::Text { .. } => None,
        }
    }

    /// Child nodes; empty for text.
    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Element { children, .. } => children.as_slice(),
            ContentNode::Text { .. } => &[],
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        self.collect_text(&mut buffer);
        buffer
    }

    fn collect_text(&self, buffer: &mut String) {
        match self {
            ContentNode::Text { value } => buffer.push_str(value),
            ContentNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(buffer);
                }
            }
        }
    }
}
