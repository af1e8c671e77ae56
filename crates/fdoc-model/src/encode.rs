#![forbid(unsafe_code)]

//! Wrapper trees to flat items.
//!
//! The encoder walks a subtree depth-first, pushing each wrapper's style id
//! onto the active path and emitting one item per character of every text
//! leaf. Styled characters always carry their own copy of the path; only
//! unstyled text may be merged into multi-character runs.

use fdoc_style::{StyleId, StyleRegistry};

use crate::error::{CodecError, Result};
use crate::item::{Item, StylePath};
use crate::node::Node;

/// Encoder knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Merge adjacent unstyled characters into one plain item.
    pub coalesce_plain: bool,
}

impl EncodeOptions {
    #[must_use]
    pub const fn coalesced() -> Self {
        Self {
            coalesce_plain: true,
        }
    }
}

/// Encode `node` under the styles already active from its ancestors,
/// emitting one plain item per unstyled character.
pub fn encode<F>(node: &Node, inherited: &[StyleId], styles: &StyleRegistry, emit: F) -> Result<()>
where
    F: FnMut(Item),
{
    encode_with(node, inherited, styles, EncodeOptions::default(), emit)
}

/// Encode a single subtree with explicit options.
pub fn encode_with<F>(
    node: &Node,
    inherited: &[StyleId],
    styles: &StyleRegistry,
    options: EncodeOptions,
    emit: F,
) -> Result<()>
where
    F: FnMut(Item),
{
    encode_nodes(std::slice::from_ref(node), inherited, styles, options, emit)
}

/// Encode a list of sibling nodes, in order.
pub fn encode_nodes<F>(
    nodes: &[Node],
    inherited: &[StyleId],
    styles: &StyleRegistry,
    options: EncodeOptions,
    emit: F,
) -> Result<()>
where
    F: FnMut(Item),
{
    let _span = tracing::debug_span!("codec.encode", roots = nodes.len()).entered();

    let mut encoder = Encoder {
        styles,
        options,
        emit,
        path: StylePath::new(),
        pending: String::new(),
        emitted: 0,
    };
    let result = inherited
        .iter()
        .try_for_each(|&id| encoder.enter(id))
        .and_then(|()| nodes.iter().try_for_each(|node| encoder.walk(node)))
        .map(|()| encoder.flush_plain());

    match &result {
        Ok(()) => tracing::debug!(items = encoder.emitted, "encoded styled runs"),
        Err(error) => tracing::warn!(%error, "encode failed"),
    }
    result
}

/// Encode sibling nodes into a vector.
pub fn encode_to_vec(
    nodes: &[Node],
    styles: &StyleRegistry,
    options: EncodeOptions,
) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    encode_nodes(nodes, &[], styles, options, |item| items.push(item))?;
    Ok(items)
}

struct Encoder<'a, F> {
    styles: &'a StyleRegistry,
    options: EncodeOptions,
    emit: F,
    path: StylePath,
    /// Unstyled text held back for coalescing.
    pending: String,
    emitted: usize,
}

impl<F: FnMut(Item)> Encoder<'_, F> {
    fn walk(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Text { text } => {
                self.text(text);
                Ok(())
            }
            Node::Wrapper(wrapper) => {
                self.enter(wrapper.style)?;
                let result = wrapper
                    .children
                    .iter()
                    .try_for_each(|child| self.walk(child));
                self.path.pop();
                result
            }
        }
    }

    /// Push a style onto the active path. The id must be registered and
    /// not already active.
    fn enter(&mut self, id: StyleId) -> Result<()> {
        let index = self.emitted;
        if !self.styles.contains(id) {
            return Err(CodecError::UnknownStyle { id, index });
        }
        if self.path.contains(&id) {
            return Err(CodecError::NestedStyle { id, index });
        }
        self.path.push(id);
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.path.is_empty() {
            if self.options.coalesce_plain {
                self.pending.push_str(text);
            } else {
                for ch in text.chars() {
                    self.push(Item::Plain(ch.to_string()));
                }
            }
            return;
        }
        self.flush_plain();
        for ch in text.chars() {
            self.push(Item::Styled(ch, self.path.clone()));
        }
    }

    fn flush_plain(&mut self) {
        if !self.pending.is_empty() {
            let run = std::mem::take(&mut self.pending);
            self.push(Item::Plain(run));
        }
    }

    fn push(&mut self, item: Item) {
        self.emitted += 1;
        (self.emit)(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdoc_style::{StyleKind, WrapperElement};
    use tracing_test::traced_test;

    fn registry() -> StyleRegistry {
        StyleRegistry::builder()
            .style(1, StyleKind::Bold)
            .style(2, StyleKind::Underline)
            .build()
            .unwrap()
    }

    fn bold() -> Node {
        Node::wrapper(StyleId(1), WrapperElement::new("b"))
    }

    fn underline() -> Node {
        Node::wrapper(StyleId(2), WrapperElement::new("u"))
    }

    fn scenario() -> Vec<Node> {
        vec![
            bold()
                .child(Node::text("a"))
                .child(underline().child(Node::text("b")))
                .child(Node::text("c")),
            Node::text("d"),
        ]
    }

    #[test]
    fn nested_tree_encodes_per_character_paths() {
        let items = encode_to_vec(&scenario(), &registry(), EncodeOptions::default()).unwrap();
        assert_eq!(
            items,
            vec![
                Item::styled('a', [1]),
                Item::styled('b', [1, 2]),
                Item::styled('c', [1]),
                Item::plain("d"),
            ]
        );
    }

    #[test]
    fn styled_runs_are_never_coalesced() {
        let tree = [bold().child(Node::text("xyz"))];
        let items = encode_to_vec(&tree, &registry(), EncodeOptions::coalesced()).unwrap();
        assert_eq!(
            items,
            vec![
                Item::styled('x', [1]),
                Item::styled('y', [1]),
                Item::styled('z', [1]),
            ]
        );
    }

    #[test]
    fn plain_runs_split_or_coalesce() {
        let tree = [
            Node::text("fo"),
            Node::text("o!"),
            bold().child(Node::text("b")),
            Node::text("ar"),
        ];
        let split = encode_to_vec(&tree, &registry(), EncodeOptions::default()).unwrap();
        assert_eq!(split.len(), 7);
        assert!(split[..4].iter().all(Item::is_plain));

        let merged = encode_to_vec(&tree, &registry(), EncodeOptions::coalesced()).unwrap();
        assert_eq!(
            merged,
            vec![Item::plain("foo!"), Item::styled('b', [1]), Item::plain("ar")]
        );
    }

    #[test]
    fn inherited_path_prefixes_every_styled_item() {
        let mut items = Vec::new();
        encode(&Node::text("hi"), &[StyleId(2)], &registry(), |item| {
            items.push(item);
        })
        .unwrap();
        assert_eq!(items, vec![Item::styled('h', [2]), Item::styled('i', [2])]);

        let mut nested = Vec::new();
        encode(
            &bold().child(Node::text("x")),
            &[StyleId(2)],
            &registry(),
            |item| nested.push(item),
        )
        .unwrap();
        assert_eq!(nested, vec![Item::styled('x', [2, 1])]);
    }

    #[test]
    fn empty_leaves_emit_nothing() {
        let tree = [bold().child(Node::text("")), Node::text("")];
        let items = encode_to_vec(&tree, &registry(), EncodeOptions::coalesced()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn unregistered_wrapper_style_fails() {
        let stray = Node::wrapper(StyleId(8), WrapperElement::new("em")).child(Node::text("q"));
        let tree = [Node::text("ab"), stray];
        let err = encode_to_vec(&tree, &registry(), EncodeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownStyle {
                id: StyleId(8),
                index: 2
            }
        ));
    }

    #[test]
    fn nested_same_style_wrapper_fails() {
        let tree = [Node::text("a"), bold().child(underline().child(bold().child(Node::text("x"))))];
        let err = encode_to_vec(&tree, &registry(), EncodeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::NestedStyle {
                id: StyleId(1),
                index: 1
            }
        ));
    }

    #[test]
    fn encoded_items_always_decode() {
        let tree = [bold().child(underline().child(Node::text("x"))).child(Node::text("y"))];
        let items = encode_to_vec(&tree, &registry(), EncodeOptions::default()).unwrap();
        let nodes = crate::decode::decode(&items, &mut crate::sink::TreeSink, &registry()).unwrap();
        assert_eq!(nodes, tree);
    }

    #[test]
    fn inherited_path_is_checked() {
        let mut items = Vec::new();
        let err = encode(&Node::text("q"), &[StyleId(99)], &registry(), |item| {
            items.push(item);
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownStyle {
                id: StyleId(99),
                index: 0
            }
        ));

        let err = encode(&Node::text("q"), &[StyleId(2), StyleId(2)], &registry(), |item| {
            items.push(item);
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CodecError::NestedStyle {
                id: StyleId(2),
                index: 0
            }
        ));

        let err = encode(
            &bold().child(Node::text("q")),
            &[StyleId(1)],
            &registry(),
            |item| items.push(item),
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::NestedStyle { id: StyleId(1), .. }));
        assert!(items.is_empty());
    }

    #[traced_test]
    #[test]
    fn encode_logs_item_count() {
        encode_to_vec(&scenario(), &registry(), EncodeOptions::default()).unwrap();
        assert!(logs_contain("encoded styled runs"));
        assert!(logs_contain("items=4"));
    }
}
