//! Vertex attribute layouts requested from geometry builders.

use geoscope_core::MaterialKind;
use serde::{Deserialize, Serialize};

/// Which vertex attributes a geometry must compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct VertexFormat {
    pub position: bool,
    pub normal: bool,
    pub st: bool,
    pub binormal: bool,
    pub tangent: bool,
}

impl VertexFormat {
    /// Positions and normals; used by per-instance color appearances.
    pub const POSITION_AND_NORMAL: Self = Self {
        position: true,
        normal: true,
        st: false,
        binormal: false,
        tangent: false,
    };

    /// Positions, normals and texture coordinates; used by textured materials.
    pub const POSITION_NORMAL_AND_ST: Self = Self {
        position: true,
        normal: true,
        st: true,
        binormal: false,
        tangent: false,
    };

    /// Returns the layout the renderer needs for a material kind.
    pub fn for_material(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Color => Self::POSITION_AND_NORMAL,
            MaterialKind::Image => Self::POSITION_NORMAL_AND_ST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_material() {
        assert_eq!(VertexFormat::for_material(MaterialKind::Color), VertexFormat::POSITION_AND_NORMAL);
        assert!(VertexFormat::for_material(MaterialKind::Image).st);
    }
}
