#![forbid(unsafe_code)]

//! Style vocabulary and registry for frankendoc.
//!
//! # Role in frankendoc
//! `fdoc-style` is the shared vocabulary for inline formatting. Styled runs
//! in stored documents refer to styles by [`StyleId`]; this crate resolves
//! those ids to [`StyleDef`]s and turns definitions into the
//! [`WrapperElement`]s that live document trees are built from.
//!
//! # This crate provides
//! - [`StyleKind`], the closed set of inline style kinds.
//! - [`StyleDef`] and [`WrapperElement`], the definition and rendered form of a style.
//! - [`ConstructorTable`], the explicit kind-to-constructor mapping.
//! - [`StyleRegistry`], the immutable id registry shared by codec calls.
//! - JSON configuration (`serde` feature).
//!
//! # How it fits in the system
//! `fdoc-model` depends on this crate and takes a `&StyleRegistry` in every
//! decode and encode call. The registry is built once when a document model
//! starts and never mutated afterwards.

/// Style kind to wrapper constructor mapping.
pub mod constructor;
/// Style kinds, definitions, and wrapper elements.
pub mod kind;
/// Immutable id to definition registry.
pub mod registry;

/// JSON style configuration.
#[cfg(feature = "serde")]
pub mod config;

pub use constructor::{ConstructorTable, ConstructorTableBuilder, ElementConstructor};
pub use kind::{StyleDef, StyleKind, WrapperElement};
pub use registry::{RegistryError, StyleId, StyleRegistry, StyleRegistryBuilder};

#[cfg(feature = "serde")]
pub use config::{StyleConfig, StyleEntry};
