#![forbid(unsafe_code)]

//! Style registry.
//!
//! The [`StyleRegistry`] maps style ids to style definitions and style
//! definitions to wrapper elements. Runs of styled text store compact
//! [`StyleId`]s instead of full definitions; the codec resolves them here.
//!
//! A registry is assembled once through [`StyleRegistryBuilder`] and is
//! immutable afterwards, so it can be shared by reference across any number
//! of codec calls.
//!
//! # Usage
//!
//! ```
//! use fdoc_style::{StyleDef, StyleId, StyleKind, StyleRegistry};
//!
//! let registry = StyleRegistry::builder()
//!     .style(1, StyleKind::Bold)
//!     .style(2, StyleDef::link("https://example.com"))
//!     .build()
//!     .unwrap();
//! assert_eq!(registry.resolve(StyleId(1)).map(|d| d.kind), Some(StyleKind::Bold));
//! assert_eq!(registry.construct(StyleId(2)).unwrap().tag(), "a");
//! ```

use std::fmt;

use ahash::AHashMap;
use thiserror::Error;

use crate::constructor::ConstructorTable;
use crate::kind::{StyleDef, StyleKind, WrapperElement};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque key naming one registered style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StyleId(pub u32);

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StyleId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Errors raised while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("style id {id} is registered more than once")]
    DuplicateId { id: StyleId },

    #[error("style {id} ({kind}) is invalid: {reason}")]
    InvalidDefinition {
        id: StyleId,
        kind: StyleKind,
        reason: &'static str,
    },

    #[error("no wrapper constructor for style kind {kind}")]
    MissingConstructor { kind: StyleKind },

    #[cfg(feature = "serde")]
    #[error("invalid style configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Immutable style registry.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    defs: AHashMap<StyleId, StyleDef>,
    /// Definition to id lookup; the lowest id wins for repeated definitions.
    lookup: AHashMap<StyleDef, StyleId>,
    constructors: ConstructorTable,
}

impl StyleRegistry {
    /// Start assembling a registry.
    #[must_use]
    pub fn builder() -> StyleRegistryBuilder {
        StyleRegistryBuilder::default()
    }

    /// Registry with the standard flag styles under fixed ids:
    /// 1 bold, 2 underline, 3 italic, 4 strikethrough, 5 code,
    /// 6 subscript, 7 superscript.
    #[must_use]
    pub fn standard() -> Self {
        let kinds = [
            StyleKind::Bold,
            StyleKind::Underline,
            StyleKind::Italic,
            StyleKind::Strikethrough,
            StyleKind::Code,
            StyleKind::Subscript,
            StyleKind::Superscript,
        ];
        let mut defs = AHashMap::with_capacity(kinds.len());
        let mut lookup = AHashMap::with_capacity(kinds.len());
        for (id, kind) in (1..).map(StyleId).zip(kinds) {
            defs.insert(id, StyleDef::new(kind));
            lookup.insert(StyleDef::new(kind), id);
        }
        Self {
            defs,
            lookup,
            constructors: ConstructorTable::standard(),
        }
    }

    /// Resolve an id to its definition.
    #[inline]
    pub fn resolve(&self, id: StyleId) -> Option<&StyleDef> {
        self.defs.get(&id)
    }

    /// Resolve an id and build its wrapper element.
    pub fn construct(&self, id: StyleId) -> Option<WrapperElement> {
        self.resolve(id).map(|def| self.constructors.construct(def))
    }

    /// Find the id registered for a definition.
    pub fn find(&self, def: &StyleDef) -> Option<StyleId> {
        self.lookup.get(def).copied()
    }

    /// Check if the registry contains an id.
    #[inline]
    pub fn contains(&self, id: StyleId) -> bool {
        self.defs.contains_key(&id)
    }

    /// Number of registered styles.
    #[inline]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Check if the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Registered styles ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &StyleDef)> {
        let mut entries: Vec<(StyleId, &StyleDef)> =
            self.defs.iter().map(|(id, def)| (*id, def)).collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries.into_iter()
    }

    /// The constructor table in use.
    #[must_use]
    pub fn constructors(&self) -> &ConstructorTable {
        &self.constructors
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Staging area for a [`StyleRegistry`].
///
/// Entries are validated together in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct StyleRegistryBuilder {
    entries: Vec<(StyleId, StyleDef)>,
    constructors: Option<ConstructorTable>,
}

impl StyleRegistryBuilder {
    /// Stage a style under an explicit id.
    #[must_use]
    pub fn style(mut self, id: u32, def: impl Into<StyleDef>) -> Self {
        self.entries.push((StyleId(id), def.into()));
        self
    }

    /// Stage a style under the next free id and return that id.
    ///
    /// If an identical definition is already staged, returns its id instead.
    pub fn register(&mut self, def: impl Into<StyleDef>) -> StyleId {
        let def = def.into();
        if let Some((id, _)) = self.entries.iter().find(|(_, staged)| *staged == def) {
            return *id;
        }
        let id = self
            .entries
            .iter()
            .map(|(id, _)| id.0.saturating_add(1))
            .max()
            .unwrap_or(1);
        let id = StyleId(id);
        self.entries.push((id, def));
        id
    }

    /// Use a custom constructor table instead of the standard one.
    #[must_use]
    pub fn constructors(mut self, table: ConstructorTable) -> Self {
        self.constructors = Some(table);
        self
    }

    /// Validate the staged styles and freeze them.
    pub fn build(self) -> Result<StyleRegistry, RegistryError> {
        let mut defs = AHashMap::with_capacity(self.entries.len());
        let mut lookup = AHashMap::with_capacity(self.entries.len());

        let mut entries = self.entries;
        entries.sort_by_key(|(id, _)| *id);

        for (id, def) in entries {
            def.validate()
                .map_err(|reason| RegistryError::InvalidDefinition {
                    id,
                    kind: def.kind,
                    reason,
                })?;
            if defs.contains_key(&id) {
                return Err(RegistryError::DuplicateId { id });
            }
            lookup.entry(def.clone()).or_insert(id);
            defs.insert(id, def);
        }

        tracing::debug!(styles = defs.len(), "style registry built");

        Ok(StyleRegistry {
            defs,
            lookup,
            constructors: self.constructors.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn sample() -> StyleRegistry {
        StyleRegistry::builder()
            .style(1, StyleKind::Bold)
            .style(2, StyleKind::Underline)
            .style(9, StyleDef::link("https://example.com"))
            .build()
            .unwrap()
    }

    #[test]
    fn resolve_and_construct() {
        let registry = sample();
        assert_eq!(registry.resolve(StyleId(1)), Some(&StyleDef::new(StyleKind::Bold)));
        assert_eq!(registry.construct(StyleId(2)).unwrap().tag(), "u");
        let link = registry.construct(StyleId(9)).unwrap();
        assert_eq!(link.attribute("href"), Some("https://example.com"));
    }

    #[test]
    fn unknown_id_resolves_to_none() {
        let registry = sample();
        assert_eq!(registry.resolve(StyleId(3)), None);
        assert_eq!(registry.construct(StyleId(u32::MAX)), None);
        assert!(!registry.contains(StyleId(0)));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = StyleRegistry::builder()
            .style(1, StyleKind::Bold)
            .style(1, StyleKind::Italic)
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId { id: StyleId(1) }));
    }

    #[test]
    fn invalid_definition_is_rejected() {
        let err = StyleRegistry::builder()
            .style(4, StyleKind::Link)
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "style 4 (link) is invalid: kind requires a value"
        );
    }

    #[test]
    fn register_deduplicates_and_allocates() {
        let mut builder = StyleRegistry::builder().style(5, StyleKind::Code);
        let bold = builder.register(StyleKind::Bold);
        let again = builder.register(StyleKind::Bold);
        let code = builder.register(StyleKind::Code);
        assert_eq!(bold, StyleId(6));
        assert_eq!(again, bold);
        assert_eq!(code, StyleId(5));

        let mut empty = StyleRegistry::builder();
        assert_eq!(empty.register(StyleKind::Italic), StyleId(1));
    }

    #[test]
    fn find_returns_lowest_id_for_repeated_definition() {
        let registry = StyleRegistry::builder()
            .style(7, StyleKind::Bold)
            .style(3, StyleKind::Bold)
            .build()
            .unwrap();
        assert_eq!(registry.find(&StyleDef::new(StyleKind::Bold)), Some(StyleId(3)));
        assert_eq!(registry.find(&StyleDef::new(StyleKind::Italic)), None);
    }

    #[test]
    fn iter_is_ordered_by_id() {
        let ids: Vec<u32> = sample().iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, [1, 2, 9]);
    }

    #[test]
    fn standard_preset_ids() {
        let registry = StyleRegistry::standard();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.resolve(StyleId(1)).unwrap().kind, StyleKind::Bold);
        assert_eq!(registry.resolve(StyleId(2)).unwrap().kind, StyleKind::Underline);
        assert_eq!(registry.resolve(StyleId(7)).unwrap().kind, StyleKind::Superscript);
        assert!(registry.resolve(StyleId(8)).is_none());
    }

    #[test]
    fn custom_constructors_are_used() {
        use crate::kind::WrapperElement;

        let table = ConstructorTable::standard_builder()
            .with(StyleKind::Bold, |_| WrapperElement::new("strong"))
            .build()
            .unwrap();
        let registry = StyleRegistry::builder()
            .style(1, StyleKind::Bold)
            .constructors(table)
            .build()
            .unwrap();
        assert_eq!(registry.construct(StyleId(1)).unwrap().tag(), "strong");
    }

    #[test]
    fn empty_registry() {
        let registry = StyleRegistry::builder().build().unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[traced_test]
    #[test]
    fn build_logs_style_count() {
        let _ = sample();
        assert!(logs_contain("style registry built"));
        assert!(logs_contain("styles=3"));
    }
}
