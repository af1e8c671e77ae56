#![forbid(unsafe_code)]

//! Explicit mapping from style kind to wrapper constructor.
//!
//! A [`ConstructorTable`] holds exactly one [`ElementConstructor`] per
//! [`StyleKind`]. Tables are assembled through [`ConstructorTableBuilder`],
//! which refuses to build while any kind is left without a constructor, so
//! a registry can never meet a definition it cannot render.

use crate::kind::{StyleDef, StyleKind, WrapperElement};
use crate::registry::RegistryError;

/// Builds the wrapper element for a validated style definition.
pub type ElementConstructor = fn(&StyleDef) -> WrapperElement;

/// One constructor per style kind.
#[derive(Clone)]
pub struct ConstructorTable {
    slots: [ElementConstructor; StyleKind::COUNT],
}

impl ConstructorTable {
    /// Start from an empty table.
    #[must_use]
    pub fn builder() -> ConstructorTableBuilder {
        ConstructorTableBuilder::default()
    }

    /// Start from the standard table, overriding individual kinds.
    #[must_use]
    pub fn standard_builder() -> ConstructorTableBuilder {
        let mut builder = ConstructorTableBuilder::default();
        for kind in StyleKind::ALL {
            builder = builder.with(kind, standard_constructor(kind));
        }
        builder
    }

    /// HTML-flavored constructors for every kind.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            slots: StyleKind::ALL.map(standard_constructor),
        }
    }

    /// Construct the wrapper element for a definition.
    #[inline]
    #[must_use]
    pub fn construct(&self, def: &StyleDef) -> WrapperElement {
        (self.slots[def.kind.index()])(def)
    }
}

impl Default for ConstructorTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ConstructorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructorTable")
            .field("kinds", &StyleKind::COUNT)
            .finish()
    }
}

/// Builder that validates exhaustive coverage on [`build`](Self::build).
#[derive(Default, Clone)]
pub struct ConstructorTableBuilder {
    slots: [Option<ElementConstructor>; StyleKind::COUNT],
}

impl ConstructorTableBuilder {
    /// Set (or replace) the constructor for a kind.
    #[must_use]
    pub fn with(mut self, kind: StyleKind, constructor: ElementConstructor) -> Self {
        self.slots[kind.index()] = Some(constructor);
        self
    }

    /// Kinds that still lack a constructor.
    #[must_use]
    pub fn missing(&self) -> Vec<StyleKind> {
        StyleKind::ALL
            .into_iter()
            .filter(|kind| self.slots[kind.index()].is_none())
            .collect()
    }

    /// Finish the table. Fails on the first kind without a constructor.
    pub fn build(self) -> Result<ConstructorTable, RegistryError> {
        let mut slots: [ElementConstructor; StyleKind::COUNT] =
            StyleKind::ALL.map(standard_constructor);
        for kind in StyleKind::ALL {
            match self.slots[kind.index()] {
                Some(constructor) => slots[kind.index()] = constructor,
                None => return Err(RegistryError::MissingConstructor { kind }),
            }
        }
        Ok(ConstructorTable { slots })
    }
}

fn standard_constructor(kind: StyleKind) -> ElementConstructor {
    match kind {
        StyleKind::Bold => |_| WrapperElement::new("b"),
        StyleKind::Italic => |_| WrapperElement::new("i"),
        StyleKind::Underline => |_| WrapperElement::new("u"),
        StyleKind::Strikethrough => |_| WrapperElement::new("s"),
        StyleKind::Code => |_| WrapperElement::new("code"),
        StyleKind::Subscript => |_| WrapperElement::new("sub"),
        StyleKind::Superscript => |_| WrapperElement::new("sup"),
        StyleKind::Link => link_element,
        StyleKind::Color => color_element,
    }
}

fn link_element(def: &StyleDef) -> WrapperElement {
    WrapperElement::new("a").attr("href", def.value.clone().unwrap_or_default())
}

fn color_element(def: &StyleDef) -> WrapperElement {
    let color = def.value.as_deref().unwrap_or_default();
    WrapperElement::new("span").attr("style", format!("color: {color}"))
}
