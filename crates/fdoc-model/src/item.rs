#![forbid(unsafe_code)]

//! Flat styled-text items.
//!
//! Stored documents keep inline text as a flat sequence of [`Item`]s. A
//! plain item is unstyled text; a styled item is a single character plus
//! the [`StylePath`] of styles applied to it, outermost first.

use std::ops::Deref;

use fdoc_style::StyleId;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Ordered style ids from the outermost to the innermost wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StylePath(SmallVec<[StyleId; 4]>);

impl StylePath {
    #[must_use]
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    #[inline]
    pub fn push(&mut self, id: StyleId) {
        self.0.push(id);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<StyleId> {
        self.0.pop()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[StyleId] {
        &self.0
    }

    /// First id that appears more than once, if any.
    #[must_use]
    pub fn repeated_id(&self) -> Option<StyleId> {
        self.0
            .iter()
            .enumerate()
            .find(|&(i, id)| self.0[..i].contains(id))
            .map(|(_, id)| *id)
    }
}

impl Deref for StylePath {
    type Target = [StyleId];

    fn deref(&self) -> &[StyleId] {
        &self.0
    }
}

impl FromIterator<StyleId> for StylePath {
    fn from_iter<I: IntoIterator<Item = StyleId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&[StyleId]> for StylePath {
    fn from(ids: &[StyleId]) -> Self {
        Self(SmallVec::from_slice(ids))
    }
}

impl From<Vec<StyleId>> for StylePath {
    fn from(ids: Vec<StyleId>) -> Self {
        Self(SmallVec::from_vec(ids))
    }
}

impl<const N: usize> From<[u32; N]> for StylePath {
    fn from(ids: [u32; N]) -> Self {
        ids.into_iter().map(StyleId).collect()
    }
}

/// One unit of flat styled text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Item {
    /// Unstyled text; usually a single character, possibly a coalesced run.
    Plain(String),
    /// One character with the styles applied to it.
    Styled(char, StylePath),
}

impl Item {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    #[must_use]
    pub fn styled(ch: char, path: impl Into<StylePath>) -> Self {
        Self::Styled(ch, path.into())
    }

    #[inline]
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(_))
    }

    /// Styles applied to this item; empty for plain text.
    #[must_use]
    pub fn style_path(&self) -> &[StyleId] {
        match self {
            Self::Plain(_) => &[],
            Self::Styled(_, path) => path,
        }
    }

    /// Number of characters this item carries.
    #[must_use]
    pub fn char_count(&self) -> usize {
        match self {
            Self::Plain(text) => text.chars().count(),
            Self::Styled(..) => 1,
        }
    }

    fn check(&self) -> Result<(), &'static str> {
        match self {
            Self::Plain(text) if text.is_empty() => Err("plain text is empty"),
            Self::Plain(_) => Ok(()),
            Self::Styled(_, path) if path.is_empty() => Err("styled item has no styles"),
            Self::Styled(_, path) if path.repeated_id().is_some() => {
                Err("style path repeats a style id")
            }
            Self::Styled(..) => Ok(()),
        }
    }
}

/// Check every item before any output is produced.
pub fn validate(items: &[Item]) -> Result<(), CodecError> {
    items.iter().enumerate().try_for_each(|(index, item)| {
        item.check()
            .map_err(|reason| CodecError::MalformedItem { index, reason })
    })
}

/// Merge adjacent plain items into a single plain run.
///
/// Empty plain items are dropped. Styled items are kept as they are.
pub fn canonicalize(items: impl IntoIterator<Item = Item>) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::new();
    for item in items {
        match item {
            Item::Plain(text) if text.is_empty() => {}
            Item::Plain(text) => match out.last_mut() {
                Some(Item::Plain(run)) => run.push_str(&text),
                _ => out.push(Item::Plain(text)),
            },
            item => out.push(item),
        }
    }
    out
}

/// Split text into one plain item per character.
pub fn plain_chars(text: &str) -> impl Iterator<Item = Item> + '_ {
    text.chars().map(|ch| Item::Plain(ch.to_string()))
}
