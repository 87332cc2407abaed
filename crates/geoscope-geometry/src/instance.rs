//! Render instances: geometry plus per-instance attributes.

use bytemuck::{Pod, Zeroable};
use geoscope_core::{Color, EntityId, JulianDate, MaterialProperty};

use crate::geometry::Geometry;

/// Per-instance visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowAttribute {
    pub value: bool,
}

/// Per-instance color, stored as normalized bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAttribute {
    pub value: [u8; 4],
}

impl From<Color> for ColorAttribute {
    fn from(color: Color) -> Self {
        Self {
            value: color.to_bytes(),
        }
    }
}

/// The attribute set of a render instance.
///
/// Color-batched instances carry a color; material-batched instances get
/// their appearance from the renderer's material system and carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceAttributes {
    pub show: ShowAttribute,
    pub color: Option<ColorAttribute>,
}

impl InstanceAttributes {
    /// Attributes for a color-batched instance.
    pub fn with_color(show: bool, color: Color) -> Self {
        Self {
            show: ShowAttribute { value: show },
            color: Some(color.into()),
        }
    }

    /// Attributes for a material-batched instance.
    pub fn show_only(show: bool) -> Self {
        Self {
            show: ShowAttribute { value: show },
            color: None,
        }
    }

    /// Attributes for a fill drawn with `material`: color materials bake
    /// their color sampled at `time` (white when undefined), other kinds
    /// carry visibility only.
    pub fn for_material(material: &MaterialProperty, show: bool, time: JulianDate) -> Self {
        match material.as_color() {
            Some(color_material) => Self::with_color(
                show,
                color_material
                    .color()
                    .map_or(Color::WHITE, |color| color.value(time)),
            ),
            None => Self::show_only(show),
        }
    }

    /// Packs the attributes for upload to a per-instance vertex buffer.
    ///
    /// Instances without a color attribute pack as opaque white.
    pub fn packed(&self) -> PackedInstanceAttributes {
        PackedInstanceAttributes {
            color: self.color.map_or([255; 4], |c| c.value),
            show: u8::from(self.show.value),
            _padding: [0; 3],
        }
    }
}

/// GPU layout of [`InstanceAttributes`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PackedInstanceAttributes {
    pub color: [u8; 4],
    pub show: u8,
    pub _padding: [u8; 3],
}

/// Geometry and attributes for one entity, ready to be batched.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryInstance {
    pub id: EntityId,
    pub geometry: Geometry,
    pub attributes: InstanceAttributes,
}
