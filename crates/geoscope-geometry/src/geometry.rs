//! Ellipse geometry descriptors.
//!
//! These hold everything a tessellator needs, resolved from an options
//! snapshot with defaults applied. Tessellation itself happens downstream.

use std::f64::consts::PI;

use geoscope_core::{DVec3, GeoscopeError, Result};
use serde::{Deserialize, Serialize};

use crate::options::EllipseGeometryOptions;
use crate::vertex_format::VertexFormat;

/// One degree, the default angular distance between ellipse points.
pub const DEFAULT_GRANULARITY: f64 = PI / 180.0;

/// Vertical lines drawn on an extruded outline when none is configured.
pub const DEFAULT_NUMBER_OF_VERTICAL_LINES: u32 = 16;

/// A filled ellipse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseGeometry {
    pub center: DVec3,
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    pub rotation: f64,
    pub height: f64,
    pub extruded_height: Option<f64>,
    pub granularity: f64,
    pub st_rotation: f64,
    pub vertex_format: VertexFormat,
}

impl EllipseGeometry {
    /// Resolves a fill descriptor from `options`.
    pub fn new(options: &EllipseGeometryOptions) -> Result<Self> {
        validate(options)?;
        Ok(Self {
            center: options.center,
            semi_major_axis: options.semi_major_axis,
            semi_minor_axis: options.semi_minor_axis,
            rotation: options.rotation.unwrap_or(0.0),
            height: options.height.unwrap_or(0.0),
            extruded_height: options.extruded_height,
            granularity: options.granularity.unwrap_or(DEFAULT_GRANULARITY),
            st_rotation: options.st_rotation.unwrap_or(0.0),
            vertex_format: options.vertex_format,
        })
    }

    /// Returns true if the ellipse has a second, extruded face.
    pub fn is_extruded(&self) -> bool {
        self.extruded_height
            .is_some_and(|h| (h - self.height).abs() > f64::EPSILON)
    }
}

/// The outline of an ellipse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseOutlineGeometry {
    pub center: DVec3,
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    pub rotation: f64,
    pub height: f64,
    pub extruded_height: Option<f64>,
    pub granularity: f64,
    pub number_of_vertical_lines: u32,
}

impl EllipseOutlineGeometry {
    /// Resolves an outline descriptor from `options`.
    pub fn new(options: &EllipseGeometryOptions) -> Result<Self> {
        validate(options)?;
        Ok(Self {
            center: options.center,
            semi_major_axis: options.semi_major_axis,
            semi_minor_axis: options.semi_minor_axis,
            rotation: options.rotation.unwrap_or(0.0),
            height: options.height.unwrap_or(0.0),
            extruded_height: options.extruded_height,
            granularity: options.granularity.unwrap_or(DEFAULT_GRANULARITY),
            number_of_vertical_lines: options
                .number_of_vertical_lines
                .unwrap_or(DEFAULT_NUMBER_OF_VERTICAL_LINES),
        })
    }
}

/// Geometry handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Ellipse(EllipseGeometry),
    EllipseOutline(EllipseOutlineGeometry),
}

fn validate(options: &EllipseGeometryOptions) -> Result<()> {
    let major = options.semi_major_axis;
    let minor = options.semi_minor_axis;
    if !(major > 0.0 && minor > 0.0) {
        return Err(GeoscopeError::InvalidGeometry(format!(
            "ellipse radii must be positive, got {major} and {minor}"
        )));
    }
    if major < minor {
        return Err(GeoscopeError::InvalidGeometry(format!(
            "semi-major axis {major} is smaller than semi-minor axis {minor}"
        )));
    }
    if let Some(granularity) = options.granularity {
        if granularity <= 0.0 {
            return Err(GeoscopeError::InvalidGeometry(format!(
                "granularity must be positive, got {granularity}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(major: f64, minor: f64) -> EllipseGeometryOptions {
        let mut options = EllipseGeometryOptions::new("e");
        options.semi_major_axis = major;
        options.semi_minor_axis = minor;
        options
    }

    #[test]
    fn test_defaults_applied() {
        let geometry = EllipseGeometry::new(&options(2.0, 1.0)).expect("valid");
        assert_eq!(geometry.rotation, 0.0);
        assert_eq!(geometry.height, 0.0);
        assert_eq!(geometry.granularity, DEFAULT_GRANULARITY);
        assert!(!geometry.is_extruded());

        let outline = EllipseOutlineGeometry::new(&options(2.0, 1.0)).expect("valid");
        assert_eq!(outline.number_of_vertical_lines, DEFAULT_NUMBER_OF_VERTICAL_LINES);
    }

    #[test]
    fn test_extrusion() {
        let mut o = options(2.0, 1.0);
        o.height = Some(5.0);
        o.extruded_height = Some(5.0);
        assert!(!EllipseGeometry::new(&o).expect("valid").is_extruded());
        o.extruded_height = Some(50.0);
        assert!(EllipseGeometry::new(&o).expect("valid").is_extruded());
    }

    #[test]
    fn test_invalid_radii() {
        assert!(matches!(
            EllipseGeometry::new(&options(1.0, 2.0)),
            Err(GeoscopeError::InvalidGeometry(_))
        ));
        assert!(matches!(
            EllipseOutlineGeometry::new(&options(0.0, 0.0)),
            Err(GeoscopeError::InvalidGeometry(_))
        ));
        assert!(EllipseGeometry::new(&options(f64::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_invalid_granularity() {
        let mut o = options(2.0, 1.0);
        o.granularity = Some(0.0);
        assert!(EllipseGeometry::new(&o).is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_radii_order_decides_validity(a in 0.001f64..1.0e6, b in 0.001f64..1.0e6) {
            let result = EllipseGeometry::new(&options(a, b));
            proptest::prop_assert_eq!(result.is_ok(), a >= b);
        }
    }
}
