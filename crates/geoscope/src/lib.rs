//! geoscope: reactive classification of time-varying scene shapes.
//!
//! Entities carry shapes whose properties may each be constant or vary over
//! time. geoscope watches those properties and decides how each shape is
//! rendered, so a renderer can batch static geometry and rebuild only what
//! actually changes.
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use geoscope::*;
//!
//! fn main() -> Result<()> {
//!     let ellipse = EllipseGraphics::new();
//!     ellipse.set_semi_major_axis(Some(ConstantProperty::shared(300.0)));
//!     ellipse.set_semi_minor_axis(Some(ConstantProperty::shared(200.0)));
//!
//!     let entity = Rc::new(Entity::new("field"));
//!     entity.set_position(Some(ConstantProperty::shared(DVec3::new(0.0, 0.0, 6.4e6))));
//!     entity.set_ellipse(Some(Rc::new(ellipse)));
//!
//!     let updater = EllipseGeometryUpdater::new(Rc::clone(&entity))?;
//!     assert_eq!(updater.classification(), Classification::Color);
//!
//!     let instance = updater.create_fill_instance(JulianDate::J2000)?;
//!     assert!(instance.attributes.show.value);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - An [`Entity`] owns an optional [`EllipseGraphics`] and a position, each
//!   made of [`Property`] values.
//! - An [`EllipseGeometryUpdater`] subscribes to both and keeps a
//!   [`Classification`]; static classifications come with a sampled
//!   [`EllipseGeometryOptions`] snapshot.
//! - A [`GeometryBatcher`] listens to updaters and maintains batches.

pub use geoscope_core::{
    CallbackProperty, Classification, Color, ColorMaterialProperty, ConstantProperty,
    DefaultProperties, EllipseChanged, EllipseGraphics, EllipseProperty, Entity, EntityId,
    EntityPropertyChanged, EntityValue, Event, GeoscopeError, ImageMaterialProperty, JulianDate,
    MaterialKind, MaterialProperty, Property, PropertyRef, Result, Subscription, UpdaterDefaults,
    DVec3, Vec2, Vec4,
};

pub use geoscope_geometry::{
    BatchKind, ColorAttribute, DynamicEllipseUpdater, DynamicFrame, EllipseGeometry,
    EllipseGeometryOptions, EllipseGeometryUpdater, EllipseOutlineGeometry, Geometry,
    GeometryBatcher, GeometryChanged, GeometryInstance, InstanceAttributes,
    PackedInstanceAttributes, ShowAttribute, VertexFormat,
};

use std::rc::Rc;

/// Creates an updater for every entity, using `defaults` when given.
///
/// Entities are added to a fresh [`GeometryBatcher`] in order.
pub fn batch_entities<'a>(
    entities: impl IntoIterator<Item = &'a Rc<Entity>>,
    defaults: Option<&UpdaterDefaults>,
) -> Result<GeometryBatcher> {
    let defaults = defaults.map_or_else(DefaultProperties::shared, |d| Rc::new(d.to_properties()));
    let mut batcher = GeometryBatcher::new();
    for entity in entities {
        batcher.add(EllipseGeometryUpdater::with_defaults(
            Rc::clone(entity),
            Rc::clone(&defaults),
        )?);
    }
    log::info!("batched {} entities", batcher.len());
    Ok(batcher)
}
