//! Geometry updaters for geoscope.
//!
//! This crate decides how an entity's shape is rendered and produces the
//! render instances for it:
//! - [`EllipseGeometryUpdater`] classifies an ellipse as static color,
//!   static material, dynamic, or nothing, and raises change events
//! - [`DynamicEllipseUpdater`] rebuilds dynamic ellipses every frame
//! - [`GeometryBatcher`] groups entities into batches from those events

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Accessors return values that callers commonly ignore in chains
#![allow(clippy::must_use_candidate)]
// Snapshot fields mirror property names like semi_major_axis
#![allow(clippy::struct_field_names)]

pub mod batch;
pub mod dynamic;
pub mod geometry;
pub mod instance;
pub mod options;
pub mod updater;
pub mod vertex_format;

pub use batch::{BatchKind, GeometryBatcher};
pub use dynamic::{DynamicEllipseUpdater, DynamicFrame};
pub use geometry::{EllipseGeometry, EllipseOutlineGeometry, Geometry};
pub use instance::{
    ColorAttribute, GeometryInstance, InstanceAttributes, PackedInstanceAttributes, ShowAttribute,
};
pub use options::EllipseGeometryOptions;
pub use updater::{EllipseGeometryUpdater, GeometryChanged};
pub use vertex_format::VertexFormat;
