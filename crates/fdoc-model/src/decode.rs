#![forbid(unsafe_code)]

//! Flat items to wrapper trees.
//!
//! The decoder walks the items once, keeping the chain of currently open
//! wrappers as a stack of frames. When the next styled item shares a prefix
//! of its style path with the previous one, the wrappers for that prefix stay
//! open and only the tail is closed and rebuilt:
//!
//! ```text
//!  items:   a[1]  b[1,2]  c[1]  d
//!  frames:  <b>   <b><u>  <b>   -
//!  output:  <b>a<u>b</u>c</b>d
//! ```
//!
//! Each step is a transition `(state, item) -> state` folded over the input.
//! Nothing is attached to caller-owned nodes until the whole pass succeeds.

use fdoc_style::{StyleId, StyleRegistry};

use crate::error::{CodecError, Result};
use crate::item::{Item, StylePath, validate};
use crate::path::first_divergence;
use crate::sink::NodeSink;

/// Counters collected during one decode call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Wrappers constructed through the sink.
    pub wrappers_opened: usize,
    /// Open wrappers kept across a style boundary instead of being rebuilt.
    pub wrappers_reused: usize,
    /// Text leaves constructed through the sink.
    pub text_leaves: usize,
}

/// Decode flat items into top-level sibling nodes.
///
/// Items are validated before the sink sees any call. On error every node
/// built so far is dropped.
pub fn decode<S: NodeSink>(
    items: &[Item],
    sink: &mut S,
    styles: &StyleRegistry,
) -> Result<Vec<S::Node>> {
    decode_with_stats(items, sink, styles).map(|(nodes, _)| nodes)
}

/// Like [`decode`], also returning the call's [`DecodeStats`].
pub fn decode_with_stats<S: NodeSink>(
    items: &[Item],
    sink: &mut S,
    styles: &StyleRegistry,
) -> Result<(Vec<S::Node>, DecodeStats)> {
    let span = tracing::debug_span!(
        "codec.decode",
        items = items.len(),
        wrappers_opened = tracing::field::Empty,
        wrappers_reused = tracing::field::Empty,
        top_level = tracing::field::Empty,
    );
    let _guard = span.enter();

    let result = validate(items).and_then(|()| {
        let mut ctx = DecodeCtx {
            sink,
            styles,
            stats: DecodeStats::default(),
        };
        let nodes = items
            .iter()
            .enumerate()
            .try_fold(DecodeState::new(), |state, (index, item)| {
                state.step(&mut ctx, index, item)
            })?
            .finish(&mut ctx)?;
        Ok((nodes, ctx.stats))
    });

    match &result {
        Ok((nodes, stats)) => {
            span.record("wrappers_opened", stats.wrappers_opened);
            span.record("wrappers_reused", stats.wrappers_reused);
            span.record("top_level", nodes.len());
            tracing::debug!(
                wrappers_opened = stats.wrappers_opened,
                wrappers_reused = stats.wrappers_reused,
                text_leaves = stats.text_leaves,
                top_level = nodes.len(),
                "decoded styled runs"
            );
        }
        Err(error) => tracing::warn!(%error, "decode failed"),
    }
    result
}

/// Decode and append the resulting nodes under `parent`.
///
/// The whole item sequence is decoded first; `parent` is only touched once
/// decoding has succeeded. Returns the number of nodes appended.
pub fn decode_into<S: NodeSink>(
    items: &[Item],
    sink: &mut S,
    styles: &StyleRegistry,
    parent: &mut S::Node,
) -> Result<usize> {
    let nodes = decode(items, sink, styles)?;
    let count = nodes.len();
    for node in nodes {
        sink.append_child(parent, node).map_err(CodecError::Sink)?;
    }
    Ok(count)
}

struct DecodeCtx<'a, S> {
    sink: &'a mut S,
    styles: &'a StyleRegistry,
    stats: DecodeStats,
}

/// One open wrapper and the children it has collected so far.
struct Frame<N> {
    node: N,
    children: Vec<N>,
}

struct DecodeState<N> {
    top: Vec<N>,
    /// Open wrappers, outermost first. Always as long as `previous`.
    frames: Vec<Frame<N>>,
    text: String,
    previous: StylePath,
}

impl<N> DecodeState<N> {
    fn new() -> Self {
        Self {
            top: Vec::new(),
            frames: Vec::new(),
            text: String::new(),
            previous: StylePath::new(),
        }
    }

    fn step<S>(mut self, ctx: &mut DecodeCtx<'_, S>, index: usize, item: &Item) -> Result<Self>
    where
        S: NodeSink<Node = N>,
    {
        match item {
            Item::Plain(text) => {
                if !self.frames.is_empty() {
                    self.flush_text(ctx)?;
                    self.close_to(0, ctx)?;
                    self.previous.clear();
                }
                self.text.push_str(text);
            }
            Item::Styled(ch, path) => {
                if let Some(depth) = first_divergence(path, &self.previous) {
                    self.flush_text(ctx)?;
                    self.close_to(depth, ctx)?;
                    ctx.stats.wrappers_reused += depth;
                    for &id in &path[depth..] {
                        self.open(ctx, id, index)?;
                    }
                    self.previous = path.clone();
                }
                self.text.push(*ch);
            }
        }
        Ok(self)
    }

    fn finish<S>(mut self, ctx: &mut DecodeCtx<'_, S>) -> Result<Vec<N>>
    where
        S: NodeSink<Node = N>,
    {
        self.flush_text(ctx)?;
        self.close_to(0, ctx)?;
        Ok(self.top)
    }

    /// Children list of the innermost open frame, or the top level.
    fn current_children(&mut self) -> &mut Vec<N> {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.top,
        }
    }

    fn flush_text<S>(&mut self, ctx: &mut DecodeCtx<'_, S>) -> Result<()>
    where
        S: NodeSink<Node = N>,
    {
        if self.text.is_empty() {
            return Ok(());
        }
        let leaf = ctx
            .sink
            .create_text(&self.text)
            .map_err(CodecError::Sink)?;
        self.text.clear();
        ctx.stats.text_leaves += 1;
        self.current_children().push(leaf);
        Ok(())
    }

    fn open<S>(&mut self, ctx: &mut DecodeCtx<'_, S>, id: StyleId, index: usize) -> Result<()>
    where
        S: NodeSink<Node = N>,
    {
        let def = ctx
            .styles
            .resolve(id)
            .ok_or(CodecError::UnknownStyle { id, index })?;
        let element = ctx.styles.constructors().construct(def);
        let node = ctx
            .sink
            .create_wrapper(id, element)
            .map_err(CodecError::Sink)?;
        tracing::trace!(%id, depth = self.frames.len(), "open wrapper");
        ctx.stats.wrappers_opened += 1;
        self.frames.push(Frame {
            node,
            children: Vec::new(),
        });
        Ok(())
    }

    /// Close frames until only `depth` remain open.
    ///
    /// Each closed wrapper receives its children before it is appended to
    /// its parent frame (or the top level).
    fn close_to<S>(&mut self, depth: usize, ctx: &mut DecodeCtx<'_, S>) -> Result<()>
    where
        S: NodeSink<Node = N>,
    {
        while self.frames.len() > depth {
            let Some(Frame { mut node, children }) = self.frames.pop() else {
                break;
            };
            for child in children {
                ctx.sink
                    .append_child(&mut node, child)
                    .map_err(CodecError::Sink)?;
            }
            self.current_children().push(node);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::node::Node;
    use crate::sink::TreeSink;
    use fdoc_style::{StyleKind, WrapperElement};
    use tracing_test::traced_test;

    fn registry() -> StyleRegistry {
        StyleRegistry::builder()
            .style(1, StyleKind::Bold)
            .style(2, StyleKind::Underline)
            .style(3, StyleKind::Italic)
            .build()
            .unwrap()
    }

    fn markup(items: &[Item]) -> String {
        let nodes = decode(items, &mut TreeSink, &registry()).unwrap();
        crate::markup::to_markup(&nodes)
    }

    #[test]
    fn nested_run_reuses_outer_wrapper() {
        let items = [
            Item::styled('a', [1]),
            Item::styled('b', [1, 2]),
            Item::styled('c', [1]),
            Item::plain("d"),
        ];
        let nodes = decode(&items, &mut TreeSink, &registry()).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(crate::markup::to_markup(&nodes), "<b>a<u>b</u>c</b>d");
        let bold = nodes[0].as_wrapper().unwrap();
        assert_eq!(bold.style, StyleId(1));
        assert_eq!(bold.children.len(), 3);
        assert_eq!(bold.children[0], Node::text("a"));
        assert_eq!(bold.children[2], Node::text("c"));
        assert_eq!(nodes[1], Node::text("d"));
    }

    #[test]
    fn plain_characters_coalesce_into_one_leaf() {
        let items = [
            Item::plain("f"),
            Item::plain("o"),
            Item::plain("o"),
            Item::plain("!"),
        ];
        let nodes = decode(&items, &mut TreeSink, &registry()).unwrap();
        assert_eq!(nodes, vec![Node::text("foo!")]);
    }

    #[test]
    fn disjoint_paths_produce_sibling_wrappers() {
        let items = [Item::styled('x', [1]), Item::styled('y', [2])];
        assert_eq!(markup(&items), "<b>x</b><u>y</u>");
    }

    #[test]
    fn reordered_path_closes_everything() {
        let items = [Item::styled('x', [1, 2]), Item::styled('y', [2])];
        assert_eq!(markup(&items), "<b><u>x</u></b><u>y</u>");
    }

    #[test]
    fn sibling_inner_wrappers_share_parent() {
        let items = [
            Item::styled('a', [1, 2]),
            Item::styled('b', [1, 3]),
            Item::styled('c', [1, 3]),
        ];
        assert_eq!(markup(&items), "<b><u>a</u><i>bc</i></b>");
    }

    #[test]
    fn deep_close_attaches_in_ancestor_order() {
        let items = [
            Item::styled('a', [1, 2, 3]),
            Item::styled('b', [1]),
            Item::plain("c"),
        ];
        assert_eq!(markup(&items), "<b><u><i>a</i></u>b</b>c");
    }

    #[test]
    fn plain_between_styled_runs_closes_chain() {
        let items = [
            Item::styled('a', [1]),
            Item::plain("-"),
            Item::styled('b', [1]),
        ];
        let nodes = decode(&items, &mut TreeSink, &registry()).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(crate::markup::to_markup(&nodes), "<b>a</b>-<b>b</b>");
    }

    #[test]
    fn leading_plain_text_is_flushed_before_first_wrapper() {
        let items = [Item::plain("ab"), Item::styled('c', [2])];
        assert_eq!(markup(&items), "ab<u>c</u>");
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        let nodes = decode(&[], &mut TreeSink, &registry()).unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn stats_count_opens_and_reuse() {
        let items = [
            Item::styled('a', [1]),
            Item::styled('b', [1, 2]),
            Item::styled('c', [1, 2]),
            Item::styled('d', [1]),
        ];
        let (_, stats) = decode_with_stats(&items, &mut TreeSink, &registry()).unwrap();
        assert_eq!(stats.wrappers_opened, 2);
        assert_eq!(stats.wrappers_reused, 2);
        assert_eq!(stats.text_leaves, 3);
    }

    #[test]
    fn unknown_style_fails_whole_call() {
        let items = [
            Item::styled('a', [1]),
            Item::styled('b', [1, 99]),
            Item::plain("c"),
        ];
        let err = decode(&items, &mut TreeSink, &registry()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownStyle {
                id: StyleId(99),
                index: 1
            }
        ));
    }

    #[test]
    fn decode_into_leaves_parent_untouched_on_failure() {
        let mut parent = Node::wrapper(StyleId(0), WrapperElement::new("p"));
        let items = [Item::plain("ok"), Item::styled('x', [7])];
        let result = decode_into(&items, &mut TreeSink, &registry(), &mut parent);
        assert!(result.is_err());
        assert!(parent.children().is_empty());

        let items = [Item::plain("ok"), Item::styled('x', [1])];
        let appended = decode_into(&items, &mut TreeSink, &registry(), &mut parent).unwrap();
        assert_eq!(appended, 2);
        assert_eq!(parent.to_string(), "<p>ok<b>x</b></p>");
    }

    #[test]
    fn malformed_item_fails_before_sink_is_called() {
        struct PanickingSink;
        impl NodeSink for PanickingSink {
            type Node = ();
            fn create_text(&mut self, _: &str) -> std::result::Result<(), BoxError> {
                panic!("sink used before validation");
            }
            fn create_wrapper(
                &mut self,
                _: StyleId,
                _: WrapperElement,
            ) -> std::result::Result<(), BoxError> {
                panic!("sink used before validation");
            }
            fn append_child(&mut self, _: &mut (), _: ()) -> std::result::Result<(), BoxError> {
                panic!("sink used before validation");
            }
        }

        let items = [Item::styled('a', [1]), Item::styled('b', [2, 2])];
        let err = decode(&items, &mut PanickingSink, &registry()).unwrap_err();
        assert!(matches!(err, CodecError::MalformedItem { index: 1, .. }));
    }

    #[test]
    fn sink_failure_is_propagated() {
        #[derive(Debug, thiserror::Error)]
        #[error("no more nodes")]
        struct Exhausted;

        struct LimitedSink {
            remaining: usize,
        }
        impl NodeSink for LimitedSink {
            type Node = Node;
            fn create_text(&mut self, text: &str) -> std::result::Result<Node, BoxError> {
                TreeSink.create_text(text)
            }
            fn create_wrapper(
                &mut self,
                style: StyleId,
                element: WrapperElement,
            ) -> std::result::Result<Node, BoxError> {
                if self.remaining == 0 {
                    return Err(Exhausted.into());
                }
                self.remaining -= 1;
                TreeSink.create_wrapper(style, element)
            }
            fn append_child(
                &mut self,
                parent: &mut Node,
                child: Node,
            ) -> std::result::Result<(), BoxError> {
                TreeSink.append_child(parent, child)
            }
        }

        let items = [Item::styled('a', [1]), Item::styled('b', [1, 2, 3])];
        let err = decode(&items, &mut LimitedSink { remaining: 2 }, &registry()).unwrap_err();
        let CodecError::Sink(source) = err else {
            panic!("expected sink error");
        };
        assert!(source.downcast_ref::<Exhausted>().is_some());
    }

    #[traced_test]
    #[test]
    fn decode_logs_summary() {
        let items = [Item::styled('a', [1]), Item::styled('b', [1, 2])];
        decode(&items, &mut TreeSink, &registry()).unwrap();
        assert!(logs_contain("decoded styled runs"));
        assert!(logs_contain("wrappers_opened=2"));
    }

    #[traced_test]
    #[test]
    fn decode_failure_is_logged() {
        let _ = decode(&[Item::styled('a', [5])], &mut TreeSink, &registry());
        assert!(logs_contain("decode failed"));
    }
}
