#![forbid(unsafe_code)]

//! JSON style configuration.
//!
//! ```json
//! {
//!   "styles": [
//!     { "id": 1, "kind": "bold" },
//!     { "id": 9, "kind": "link", "value": "https://example.com" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::kind::{StyleDef, StyleKind};
use crate::registry::{RegistryError, StyleRegistry};

/// Serialized form of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    #[serde(default)]
    pub styles: Vec<StyleEntry>,
}

/// One configured style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleEntry {
    pub id: u32,
    pub kind: StyleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl StyleConfig {
    /// Parse a configuration document.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Snapshot an existing registry.
    #[must_use]
    pub fn from_registry(registry: &StyleRegistry) -> Self {
        let styles = registry
            .iter()
            .map(|(id, def)| StyleEntry {
                id: id.0,
                kind: def.kind,
                value: def.value.clone(),
            })
            .collect();
        Self { styles }
    }

    /// Build a registry with the standard constructors.
    pub fn into_registry(self) -> Result<StyleRegistry, RegistryError> {
        self.styles
            .into_iter()
            .fold(StyleRegistry::builder(), |builder, entry| {
                builder.style(
                    entry.id,
                    StyleDef {
                        kind: entry.kind,
                        value: entry.value,
                    },
                )
            })
            .build()
    }
}

impl StyleRegistry {
    /// Build a registry from a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        StyleConfig::from_json(json)?.into_registry()
    }
}
