#![forbid(unsafe_code)]

//! Node-type registration.
//!
//! A host document dispatches each stored block to the node type named by
//! its type tag, and each live element to the node type claiming its host
//! tag. Only the inline text type ships here.

use std::fmt;

use fdoc_style::{StyleId, StyleRegistry};
use thiserror::Error;

use crate::decode::decode;
use crate::encode::encode;
use crate::error::Result;
use crate::item::Item;
use crate::node::Node;
use crate::sink::TreeSink;

/// Static description of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeDescriptor {
    /// Key used in stored data.
    pub type_tag: &'static str,
    /// Host element tags this type claims.
    pub tags: &'static [&'static str],
    /// The type has no host element children of its own.
    pub is_empty: bool,
    /// The type participates in style nesting.
    pub is_wrapped: bool,
}

/// Decode and encode logic for one kind of stored node.
pub trait NodeType: Send + Sync + fmt::Debug {
    fn descriptor(&self) -> &NodeDescriptor;

    fn decode(&self, items: &[Item], styles: &StyleRegistry) -> Result<Vec<Node>>;

    fn encode(
        &self,
        node: &Node,
        inherited: &[StyleId],
        styles: &StyleRegistry,
        emit: &mut dyn FnMut(Item),
    ) -> Result<()>;
}

pub const TEXT_NODE: NodeDescriptor = NodeDescriptor {
    type_tag: "text",
    tags: &["#text"],
    is_empty: true,
    is_wrapped: false,
};

/// Inline styled text, stored as flat items.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNodeType;

impl NodeType for TextNodeType {
    fn descriptor(&self) -> &NodeDescriptor {
        &TEXT_NODE
    }

    fn decode(&self, items: &[Item], styles: &StyleRegistry) -> Result<Vec<Node>> {
        decode(items, &mut TreeSink, styles)
    }

    fn encode(
        &self,
        node: &Node,
        inherited: &[StyleId],
        styles: &StyleRegistry,
        emit: &mut dyn FnMut(Item),
    ) -> Result<()> {
        encode(node, inherited, styles, emit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeTypeError {
    #[error("node type `{0}` is already registered")]
    DuplicateType(&'static str),

    #[error("host tag `{tag}` is already claimed by `{owner}`")]
    DuplicateTag {
        tag: &'static str,
        owner: &'static str,
    },
}

/// Registered node types, in registration order.
#[derive(Debug, Default)]
pub struct NodeTypeRegistry {
    types: Vec<Box<dyn NodeType>>,
}

impl NodeTypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only [`TextNodeType`].
    #[must_use]
    pub fn with_text() -> Self {
        Self {
            types: vec![Box::new(TextNodeType)],
        }
    }

    /// Add a node type. Type tags and host tags must be unique.
    pub fn register(&mut self, node_type: impl NodeType + 'static) -> Result<(), NodeTypeError> {
        let descriptor = *node_type.descriptor();
        if self.get(descriptor.type_tag).is_some() {
            return Err(NodeTypeError::DuplicateType(descriptor.type_tag));
        }
        for &tag in descriptor.tags {
            if let Some(owner) = self.match_tag(tag) {
                return Err(NodeTypeError::DuplicateTag {
                    tag,
                    owner: owner.descriptor().type_tag,
                });
            }
        }
        tracing::debug!(type_tag = descriptor.type_tag, "node type registered");
        self.types.push(Box::new(node_type));
        Ok(())
    }

    /// Look up a node type by its stored type tag.
    #[must_use]
    pub fn get(&self, type_tag: &str) -> Option<&dyn NodeType> {
        self.iter().find(|t| t.descriptor().type_tag == type_tag)
    }

    /// Find the node type claiming a host element tag.
    #[must_use]
    pub fn match_tag(&self, tag: &str) -> Option<&dyn NodeType> {
        self.iter()
            .find(|t| t.descriptor().tags.iter().any(|&claimed| claimed == tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn NodeType> {
        self.types.iter().map(|t| t.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
