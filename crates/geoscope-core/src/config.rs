//! Default property values used when an ellipse leaves a property undefined.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;
use crate::material::MaterialProperty;
use crate::property::{ConstantProperty, PropertyRef};

/// Serializable defaults for geometry updaters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterDefaults {
    /// Whether geometry is shown when `show` is undefined.
    pub show: bool,
    /// Fill color used when `material` is undefined.
    pub material_color: Color,
    /// Whether geometry is outlined when `outline` is undefined.
    pub outline: bool,
    /// Outline color used when `outlineColor` is undefined.
    pub outline_color: Color,
    /// Number of vertical lines drawn on extruded outlines.
    pub number_of_vertical_lines: u32,
}

impl Default for UpdaterDefaults {
    fn default() -> Self {
        Self {
            show: true,
            material_color: Color::WHITE,
            outline: false,
            outline_color: Color::BLACK,
            number_of_vertical_lines: 16,
        }
    }
}

impl UpdaterDefaults {
    /// Parses defaults from JSON. Missing fields keep their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the immutable property bundle handed to updaters.
    pub fn to_properties(&self) -> DefaultProperties {
        DefaultProperties {
            show: ConstantProperty::shared(self.show),
            material: Rc::new(MaterialProperty::solid(self.material_color)),
            outline: ConstantProperty::shared(self.outline),
            outline_color: ConstantProperty::shared(self.outline_color),
            number_of_vertical_lines: self.number_of_vertical_lines,
        }
    }
}

/// Constant properties substituted for undefined ellipse properties.
pub struct DefaultProperties {
    pub show: PropertyRef<bool>,
    pub material: Rc<MaterialProperty>,
    pub outline: PropertyRef<bool>,
    pub outline_color: PropertyRef<Color>,
    pub number_of_vertical_lines: u32,
}

thread_local! {
    static SHARED_DEFAULTS: Rc<DefaultProperties> = Rc::new(UpdaterDefaults::default().to_properties());
}

impl DefaultProperties {
    /// Returns the defaults built from [`UpdaterDefaults::default`].
    ///
    /// The bundle is shared per thread; updaters hold `Rc`s and never leave
    /// the thread that created them.
    pub fn shared() -> Rc<Self> {
        SHARED_DEFAULTS.with(Rc::clone)
    }
}

impl std::fmt::Debug for DefaultProperties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultProperties")
            .field("material", &self.material)
            .field("number_of_vertical_lines", &self.number_of_vertical_lines)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::JulianDate;

    #[test]
    fn test_defaults() {
        let defaults = UpdaterDefaults::default();
        assert!(defaults.show);
        assert!(!defaults.outline);
        assert_eq!(defaults.material_color, Color::WHITE);
        assert_eq!(defaults.outline_color, Color::BLACK);
        assert_eq!(defaults.number_of_vertical_lines, 16);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let defaults = UpdaterDefaults::from_json(r#"{ "outline": true, "number_of_vertical_lines": 8 }"#)
            .expect("valid json");
        assert!(defaults.outline);
        assert!(defaults.show);
        assert_eq!(defaults.number_of_vertical_lines, 8);
        assert_eq!(defaults.outline_color, Color::BLACK);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = UpdaterDefaults::from_json("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_to_properties() {
        let props = UpdaterDefaults {
            outline_color: Color::RED,
            ..UpdaterDefaults::default()
        }
        .to_properties();

        assert!(props.show.is_constant());
        assert!(props.show.value(JulianDate::MINIMUM));
        assert_eq!(props.outline_color.value(JulianDate::J2000), Color::RED);
        assert!(props.material.is_color());
    }

    #[test]
    fn test_shared_defaults_are_reused() {
        assert!(Rc::ptr_eq(&DefaultProperties::shared(), &DefaultProperties::shared()));
    }
}
