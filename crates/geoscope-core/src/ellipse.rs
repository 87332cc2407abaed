//! The ellipse shape attached to an entity.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::color::Color;
use crate::event::Event;
use crate::material::MaterialProperty;
use crate::property::{replace_if_changed, PropertyRef};

/// Names the ellipse property that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EllipseProperty {
    Show,
    Fill,
    Material,
    Outline,
    OutlineColor,
    SemiMajorAxis,
    SemiMinorAxis,
    Rotation,
    Height,
    ExtrudedHeight,
    Granularity,
    StRotation,
}

impl EllipseProperty {
    /// Returns the property name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Fill => "fill",
            Self::Material => "material",
            Self::Outline => "outline",
            Self::OutlineColor => "outlineColor",
            Self::SemiMajorAxis => "semiMajorAxis",
            Self::SemiMinorAxis => "semiMinorAxis",
            Self::Rotation => "rotation",
            Self::Height => "height",
            Self::ExtrudedHeight => "extrudedHeight",
            Self::Granularity => "granularity",
            Self::StRotation => "stRotation",
        }
    }
}

/// Payload of [`EllipseGraphics::definition_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EllipseChanged {
    pub property: EllipseProperty,
}

/// An ellipse on the surface, optionally extruded.
///
/// Every property is optional and may independently be constant or
/// time-varying. Setters raise [`EllipseGraphics::definition_changed`] only
/// when a different property object is stored.
#[derive(Default)]
pub struct EllipseGraphics {
    show: RefCell<Option<PropertyRef<bool>>>,
    fill: RefCell<Option<PropertyRef<bool>>>,
    material: RefCell<Option<Rc<MaterialProperty>>>,
    outline: RefCell<Option<PropertyRef<bool>>>,
    outline_color: RefCell<Option<PropertyRef<Color>>>,
    semi_major_axis: RefCell<Option<PropertyRef<f64>>>,
    semi_minor_axis: RefCell<Option<PropertyRef<f64>>>,
    rotation: RefCell<Option<PropertyRef<f64>>>,
    height: RefCell<Option<PropertyRef<f64>>>,
    extruded_height: RefCell<Option<PropertyRef<f64>>>,
    granularity: RefCell<Option<PropertyRef<f64>>>,
    st_rotation: RefCell<Option<PropertyRef<f64>>>,
    definition_changed: Event<EllipseChanged>,
}

macro_rules! ellipse_accessors {
    ($($(#[$doc:meta])* $field:ident, $setter:ident, $variant:ident: $ty:ty;)*) => {
        impl EllipseGraphics {
            $(
                $(#[$doc])*
                pub fn $field(&self) -> Option<$ty> {
                    self.$field.borrow().clone()
                }

                #[doc = concat!("Sets the `", stringify!($field), "` property.")]
                pub fn $setter(&self, value: Option<$ty>) {
                    if replace_if_changed(&self.$field, value).is_some() {
                        self.raise(EllipseProperty::$variant);
                    }
                }
            )*
        }
    };
}

ellipse_accessors! {
    /// Whether the ellipse is shown.
    show, set_show, Show: PropertyRef<bool>;
    /// Whether the ellipse is filled.
    fill, set_fill, Fill: PropertyRef<bool>;
    /// The fill material.
    material, set_material, Material: Rc<MaterialProperty>;
    /// Whether the ellipse is outlined.
    outline, set_outline, Outline: PropertyRef<bool>;
    /// The outline color.
    outline_color, set_outline_color, OutlineColor: PropertyRef<Color>;
    /// The semi-major axis in meters.
    semi_major_axis, set_semi_major_axis, SemiMajorAxis: PropertyRef<f64>;
    /// The semi-minor axis in meters.
    semi_minor_axis, set_semi_minor_axis, SemiMinorAxis: PropertyRef<f64>;
    /// Rotation from north, in radians.
    rotation, set_rotation, Rotation: PropertyRef<f64>;
    /// Height above the ellipsoid in meters.
    height, set_height, Height: PropertyRef<f64>;
    /// Height of the extruded face in meters.
    extruded_height, set_extruded_height, ExtrudedHeight: PropertyRef<f64>;
    /// Angular distance between points on the ellipse, in radians.
    granularity, set_granularity, Granularity: PropertyRef<f64>;
    /// Texture coordinate rotation, in radians.
    st_rotation, set_st_rotation, StRotation: PropertyRef<f64>;
}

impl EllipseGraphics {
    /// Creates an ellipse with every property undefined.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raised whenever one of the ellipse's properties is replaced.
    pub fn definition_changed(&self) -> &Event<EllipseChanged> {
        &self.definition_changed
    }

    fn raise(&self, property: EllipseProperty) {
        log::trace!("ellipse property '{}' changed", property.name());
        self.definition_changed.raise(&EllipseChanged { property });
    }
}

impl fmt::Debug for EllipseGraphics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EllipseGraphics")
            .field("material", &self.material.borrow())
            .field("definition_changed", &self.definition_changed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::property::ConstantProperty;

    #[test]
    fn test_setter_raises_only_on_change() {
        let ellipse = EllipseGraphics::new();
        let raised = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let raised = Rc::clone(&raised);
            ellipse
                .definition_changed()
                .subscribe(move |c: &EllipseChanged| raised.borrow_mut().push(c.property))
        };

        let axis = ConstantProperty::shared(10.0);
        ellipse.set_semi_major_axis(Some(Rc::clone(&axis)));
        ellipse.set_semi_major_axis(Some(Rc::clone(&axis)));
        ellipse.set_semi_major_axis(None);
        ellipse.set_semi_major_axis(None);

        assert_eq!(
            *raised.borrow(),
            vec![EllipseProperty::SemiMajorAxis, EllipseProperty::SemiMajorAxis]
        );
    }

    #[test]
    fn test_getters_return_stored_property() {
        let ellipse = EllipseGraphics::new();
        assert!(ellipse.outline().is_none());

        ellipse.set_outline(Some(ConstantProperty::shared(true)));
        let outline = ellipse.outline().expect("outline set");
        assert!(outline.value(crate::JulianDate::MINIMUM));
    }

    #[test]
    fn test_each_setter_names_its_property() {
        let ellipse = EllipseGraphics::new();
        let last = Rc::new(Cell::new(None));
        let _sub = {
            let last = Rc::clone(&last);
            ellipse
                .definition_changed()
                .subscribe(move |c: &EllipseChanged| last.set(Some(c.property.name())))
        };

        ellipse.set_st_rotation(Some(ConstantProperty::shared(0.5)));
        assert_eq!(last.get(), Some("stRotation"));
        ellipse.set_outline_color(Some(ConstantProperty::shared(Color::RED)));
        assert_eq!(last.get(), Some("outlineColor"));
        ellipse.set_material(Some(Rc::new(MaterialProperty::solid(Color::RED))));
        assert_eq!(last.get(), Some("material"));
    }
}
