//! Material properties.
//!
//! Materials come in kinds that the renderer batches differently: a solid
//! color can be baked into per-instance attributes, while every other kind
//! is drawn through the renderer's material system.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::property::{ConstantProperty, PropertyRef};

/// The kind of a [`MaterialProperty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Solid color.
    Color,
    /// Image texture.
    Image,
}

/// A material, tagged by kind.
#[derive(Clone)]
pub enum MaterialProperty {
    Color(ColorMaterialProperty),
    Image(ImageMaterialProperty),
}

impl MaterialProperty {
    /// Creates a solid color material from a constant color.
    pub fn solid(color: Color) -> Self {
        Self::Color(ColorMaterialProperty::from_color(color))
    }

    /// Returns the kind of this material.
    pub fn kind(&self) -> MaterialKind {
        match self {
            Self::Color(_) => MaterialKind::Color,
            Self::Image(_) => MaterialKind::Image,
        }
    }

    /// Returns true for solid color materials.
    pub fn is_color(&self) -> bool {
        matches!(self, Self::Color(_))
    }

    /// Returns the color material, if this is one.
    pub fn as_color(&self) -> Option<&ColorMaterialProperty> {
        match self {
            Self::Color(material) => Some(material),
            Self::Image(_) => None,
        }
    }
}

impl std::fmt::Debug for MaterialProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MaterialProperty").field(&self.kind()).finish()
    }
}

/// A solid color material.
#[derive(Clone, Default)]
pub struct ColorMaterialProperty {
    color: Option<PropertyRef<Color>>,
}

impl ColorMaterialProperty {
    /// Creates a color material; an absent color renders white.
    pub fn new(color: Option<PropertyRef<Color>>) -> Self {
        Self { color }
    }

    /// Creates a color material from a constant color.
    pub fn from_color(color: Color) -> Self {
        Self::new(Some(ConstantProperty::shared(color)))
    }

    /// Returns the color property.
    pub fn color(&self) -> Option<&PropertyRef<Color>> {
        self.color.as_ref()
    }
}

/// An image material. The renderer's material system reads the image and
/// repeat directly; geometry only needs to know the kind.
#[derive(Clone, Default)]
pub struct ImageMaterialProperty {
    /// Image URI.
    pub image: Option<PropertyRef<String>>,
    /// Texture repeat.
    pub repeat: Option<PropertyRef<Vec2>>,
}

impl ImageMaterialProperty {
    /// Creates an image material from an image URI and texture repeat.
    pub fn new(image: Option<PropertyRef<String>>, repeat: Option<PropertyRef<Vec2>>) -> Self {
        Self { image, repeat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{CallbackProperty, Property};

    #[test]
    fn test_material_kind() {
        let solid = MaterialProperty::solid(Color::RED);
        assert_eq!(solid.kind(), MaterialKind::Color);
        assert!(solid.is_color());
        assert!(solid.as_color().is_some());

        let image = MaterialProperty::Image(ImageMaterialProperty::default());
        assert_eq!(image.kind(), MaterialKind::Image);
        assert!(!image.is_color());
        assert!(image.as_color().is_none());
    }

    #[test]
    fn test_image_material_carries_its_properties() {
        let image = ImageMaterialProperty::new(
            Some(ConstantProperty::shared("grid.png".to_string())),
            Some(CallbackProperty::shared(|_| Vec2::new(2.0, 2.0))),
        );
        let uri = image.image.as_ref().map(|p| p.value(crate::JulianDate::J2000));
        assert_eq!(uri.as_deref(), Some("grid.png"));
        assert!(image.repeat.as_ref().is_some_and(|p| !p.is_constant()));
    }
}
