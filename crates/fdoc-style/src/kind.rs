#![forbid(unsafe_code)]

//! Closed style vocabulary and the wrapper elements styles turn into.
//!
//! Every inline formatting attribute a document can carry is one of the
//! [`StyleKind`] variants. A [`StyleDef`] pairs a kind with its optional
//! value (the target of a link, the color of a color span), and a
//! [`WrapperElement`] is the concrete node a definition renders as.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The closed set of inline style kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StyleKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Subscript,
    Superscript,
    /// Hyperlink; the definition value is the target URL.
    Link,
    /// Foreground color; the definition value is a CSS color.
    Color,
}

impl StyleKind {
    /// Number of style kinds.
    pub const COUNT: usize = 9;

    /// Every kind, in declaration order.
    pub const ALL: [StyleKind; Self::COUNT] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strikethrough,
        Self::Code,
        Self::Subscript,
        Self::Superscript,
        Self::Link,
        Self::Color,
    ];

    /// Dense index of this kind, usable as a table slot.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name, as used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strikethrough => "strikethrough",
            Self::Code => "code",
            Self::Subscript => "subscript",
            Self::Superscript => "superscript",
            Self::Link => "link",
            Self::Color => "color",
        }
    }

    /// Whether definitions of this kind carry a value.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        matches!(self, Self::Link | Self::Color)
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A style definition: a kind plus its value, if the kind takes one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StyleDef {
    pub kind: StyleKind,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub value: Option<String>,
}

impl StyleDef {
    /// Definition for a kind without a value.
    #[must_use]
    pub const fn new(kind: StyleKind) -> Self {
        Self { kind, value: None }
    }

    /// Definition for a kind with a value.
    #[must_use]
    pub fn with_value(kind: StyleKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
        }
    }

    #[must_use]
    pub fn link(href: impl Into<String>) -> Self {
        Self::with_value(StyleKind::Link, href)
    }

    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self::with_value(StyleKind::Color, color)
    }

    /// Check that the value is present exactly when the kind takes one.
    pub fn validate(&self) -> Result<(), &'static str> {
        match (self.kind.takes_value(), self.value.as_deref()) {
            (true, None) => Err("kind requires a value"),
            (true, Some(v)) if v.trim().is_empty() => Err("value must not be blank"),
            (false, Some(_)) => Err("kind does not take a value"),
            _ => Ok(()),
        }
    }
}

impl From<StyleKind> for StyleDef {
    fn from(kind: StyleKind) -> Self {
        Self::new(kind)
    }
}

/// The concrete wrapper a style definition is rendered as.
///
/// Attributes keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WrapperElement {
    tag: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    attributes: Vec<(String, String)>,
}

impl WrapperElement {
    /// Create an element with no attributes.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of the first attribute with the given name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}
