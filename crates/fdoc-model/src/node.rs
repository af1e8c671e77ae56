#![forbid(unsafe_code)]

//! Live document tree for inline text.
//!
//! A [`Node`] is either a text leaf or a [`WrapperNode`] that applies one
//! style to the children it owns.
//!
//! ```
//! use fdoc_model::node::Node;
//! use fdoc_style::{StyleId, WrapperElement};
//!
//! let bold = Node::wrapper(StyleId(1), WrapperElement::new("b"))
//!     .child(Node::text("a"))
//!     .child(Node::wrapper(StyleId(2), WrapperElement::new("u")).child(Node::text("b")));
//! assert_eq!(bold.text_content(), "ab");
//! assert_eq!(bold.to_string(), "<b>a<u>b</u></b>");
//! ```

use std::fmt;

use fdoc_style::{StyleId, WrapperElement};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A node of an inline text tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Node {
    Text { text: String },
    Wrapper(WrapperNode),
}

/// A node applying one style to its children.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WrapperNode {
    pub style: StyleId,
    pub element: WrapperElement,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Node>,
}

impl WrapperNode {
    #[must_use]
    pub fn new(style: StyleId, element: WrapperElement) -> Self {
        Self {
            style,
            element,
            children: Vec::new(),
        }
    }
}

impl Node {
    /// Create a text leaf.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an empty wrapper.
    #[must_use]
    pub fn wrapper(style: StyleId, element: WrapperElement) -> Self {
        Self::Wrapper(WrapperNode::new(style, element))
    }

    /// Append a child, returning the node. Text leaves ignore children.
    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        if let Self::Wrapper(wrapper) = &mut self {
            wrapper.children.push(child);
        }
        self
    }

    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    #[must_use]
    pub fn as_wrapper(&self) -> Option<&WrapperNode> {
        match self {
            Self::Wrapper(wrapper) => Some(wrapper),
            Self::Text { .. } => None,
        }
    }

    /// Children of a wrapper; empty for text leaves.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Wrapper(wrapper) => &wrapper.children,
            Self::Text { .. } => &[],
        }
    }

    /// Concatenated text of every leaf below this node, in document order.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { text } => out.push_str(text),
            Self::Wrapper(wrapper) => {
                for child in &wrapper.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Number of wrappers in this subtree, including this node.
    #[must_use]
    pub fn wrapper_count(&self) -> usize {
        match self {
            Self::Text { .. } => 0,
            Self::Wrapper(wrapper) => {
                1 + wrapper
                    .children
                    .iter()
                    .map(Node::wrapper_count)
                    .sum::<usize>()
            }
        }
    }

    /// Deepest wrapper nesting in this subtree.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Text { .. } => 0,
            Self::Wrapper(wrapper) => {
                1 + wrapper.children.iter().map(Node::depth).max().unwrap_or(0)
            }
        }
    }
}

impl From<WrapperNode> for Node {
    fn from(wrapper: WrapperNode) -> Self {
        Self::Wrapper(wrapper)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::markup::write_node(f, self)
    }
}
