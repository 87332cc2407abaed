//! How an entity's fill geometry is rendered.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The batching strategy for an entity's fill geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Classification {
    /// Nothing to render.
    #[default]
    None,
    /// Static geometry with a solid color baked into instance attributes.
    Color,
    /// Static geometry drawn with a non-color material.
    Material,
    /// Geometry recomputed every frame from live property values.
    Dynamic,
}

impl Classification {
    /// Returns true for the classifications backed by a constant snapshot.
    pub fn is_static(self) -> bool {
        matches!(self, Self::Color | Self::Material)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "NONE",
            Self::Color => "COLOR",
            Self::Material => "MATERIAL",
            Self::Dynamic => "DYNAMIC",
        })
    }
}
