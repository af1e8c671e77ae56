#![forbid(unsafe_code)]

//! Inline styled-run codec for frankendoc.
//!
//! Stored documents keep inline text as a flat list of [`Item`]s: plain text
//! units, and single characters tagged with the ordered [`StylePath`] of
//! styles applied to them. Live documents hold the same text as a tree of
//! [`Node`]s where every applied style is one wrapper.
//!
//! - [`decode`] turns items into sibling nodes, keeping a wrapper open for as
//!   long as consecutive characters share its position in their paths.
//! - [`encode`] walks a tree back into items.
//! - [`NodeSink`] is the seam to the host document model; [`TreeSink`]
//!   builds this crate's own [`Node`]s.
//! - [`NodeTypeRegistry`] lets a host dispatch stored blocks to node types.
//!
//! ```
//! use fdoc_model::{Item, TreeSink, decode, encode_to_vec, EncodeOptions};
//! use fdoc_model::markup::to_markup;
//! use fdoc_style::StyleRegistry;
//!
//! let styles = StyleRegistry::standard();
//! let items = vec![
//!     Item::styled('a', [1]),
//!     Item::styled('b', [1, 2]),
//!     Item::styled('c', [1]),
//!     Item::plain("d"),
//! ];
//! let nodes = decode(&items, &mut TreeSink, &styles).unwrap();
//! assert_eq!(to_markup(&nodes), "<b>a<u>b</u>c</b>d");
//!
//! let back = encode_to_vec(&nodes, &styles, EncodeOptions::default()).unwrap();
//! assert_eq!(back, items);
//! ```

pub mod decode;
pub mod encode;
pub mod error;
pub mod item;
pub mod markup;
pub mod node;
pub mod node_type;
pub mod path;
pub mod sink;

pub use decode::{DecodeStats, decode, decode_into, decode_with_stats};
pub use encode::{EncodeOptions, encode, encode_nodes, encode_to_vec, encode_with};
pub use error::{BoxError, CodecError, Result};
pub use item::{Item, StylePath, canonicalize, validate};
pub use node::{Node, WrapperNode};
pub use node_type::{NodeDescriptor, NodeType, NodeTypeError, NodeTypeRegistry, TextNodeType};
pub use path::first_divergence;
pub use sink::{LeafParentError, NodeSink, TreeSink};

pub use fdoc_style::{StyleId, StyleRegistry};
