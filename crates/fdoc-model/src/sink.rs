#![forbid(unsafe_code)]

//! Output sink seam.
//!
//! The decoder never builds host nodes itself; it asks a [`NodeSink`] to
//! create text leaves and wrappers and to append children. [`TreeSink`]
//! builds this crate's own [`Node`] tree.

use fdoc_style::{StyleId, WrapperElement};
use thiserror::Error;

use crate::error::BoxError;
use crate::node::{Node, WrapperNode};

/// Node construction API supplied by the host document model.
pub trait NodeSink {
    type Node;

    fn create_text(&mut self, text: &str) -> Result<Self::Node, BoxError>;

    fn create_wrapper(
        &mut self,
        style: StyleId,
        element: WrapperElement,
    ) -> Result<Self::Node, BoxError>;

    fn append_child(&mut self, parent: &mut Self::Node, child: Self::Node) -> Result<(), BoxError>;
}

impl<S: NodeSink + ?Sized> NodeSink for &mut S {
    type Node = S::Node;

    fn create_text(&mut self, text: &str) -> Result<Self::Node, BoxError> {
        (**self).create_text(text)
    }

    fn create_wrapper(
        &mut self,
        style: StyleId,
        element: WrapperElement,
    ) -> Result<Self::Node, BoxError> {
        (**self).create_wrapper(style, element)
    }

    fn append_child(&mut self, parent: &mut Self::Node, child: Self::Node) -> Result<(), BoxError> {
        (**self).append_child(parent, child)
    }
}

/// Raised when a child is appended to a text leaf.
#[derive(Debug, Error)]
#[error("text leaves cannot hold children")]
pub struct LeafParentError;

/// Sink producing [`Node`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSink;

impl NodeSink for TreeSink {
    type Node = Node;

    fn create_text(&mut self, text: &str) -> Result<Node, BoxError> {
        Ok(Node::text(text))
    }

    fn create_wrapper(&mut self, style: StyleId, element: WrapperElement) -> Result<Node, BoxError> {
        Ok(Node::Wrapper(WrapperNode::new(style, element)))
    }

    fn append_child(&mut self, parent: &mut Node, child: Node) -> Result<(), BoxError> {
        match parent {
            Node::Wrapper(wrapper) => {
                wrapper.children.push(child);
                Ok(())
            }
            Node::Text { .. } => Err(LeafParentError.into()),
        }
    }
}
