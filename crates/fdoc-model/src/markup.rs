#![forbid(unsafe_code)]

//! Compact markup rendering of node trees.
//!
//! Used for diagnostics, test assertions and the CLI. Wrappers render as
//! `<tag attr="value">…</tag>`; text and attribute values are HTML-escaped.

use std::fmt::{self, Write};

use crate::node::Node;

/// Render a sibling list as markup.
#[must_use]
pub fn to_markup(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        // Writing into a String cannot fail.
        let _ = write_node(&mut out, node);
    }
    out
}

pub(crate) fn write_node<W: Write + ?Sized>(out: &mut W, node: &Node) -> fmt::Result {
    match node {
        Node::Text { text } => write!(out, "{}", v_htmlescape::escape(text)),
        Node::Wrapper(wrapper) => {
            let tag = wrapper.element.tag();
            write!(out, "<{tag}")?;
            for (name, value) in wrapper.element.attributes() {
                write!(out, " {name}=\"{}\"", v_htmlescape::escape(value))?;
            }
            out.write_char('>')?;
            for child in &wrapper.children {
                write_node(out, child)?;
            }
            write!(out, "</{tag}>")
        }
    }
}
