//! Core scene abstractions for geoscope.
//!
//! This crate provides the building blocks the geometry updaters react to:
//! - [`Property`] for values that may vary over time, sampled at a [`JulianDate`]
//! - [`Event`] and [`Subscription`] for synchronous change notification
//! - [`Entity`] and its [`EllipseGraphics`] shape
//! - [`MaterialProperty`] and [`Color`]
//! - [`UpdaterDefaults`] configuration and the [`Classification`] enum

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Accessors return values that callers commonly ignore in chains
#![allow(clippy::must_use_candidate)]

pub mod classification;
pub mod color;
pub mod config;
pub mod ellipse;
pub mod entity;
pub mod error;
pub mod event;
pub mod material;
pub mod property;
pub mod time;

pub use classification::Classification;
pub use color::Color;
pub use config::{DefaultProperties, UpdaterDefaults};
pub use ellipse::{EllipseChanged, EllipseGraphics, EllipseProperty};
pub use entity::{Entity, EntityId, EntityPropertyChanged, EntityValue};
pub use error::{GeoscopeError, Result};
pub use event::{Event, Subscription};
pub use material::{ColorMaterialProperty, ImageMaterialProperty, MaterialKind, MaterialProperty};
pub use property::{CallbackProperty, ConstantProperty, Property, PropertyRef};
pub use time::JulianDate;

// Re-export glam types for convenience
pub use glam::{DVec3, Vec2, Vec4};
