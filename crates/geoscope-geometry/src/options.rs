//! The sampled ellipse parameters used to build geometry.

use geoscope_core::{DVec3, EllipseGraphics, EntityId, JulianDate, PropertyRef};
use serde::{Deserialize, Serialize};

use crate::vertex_format::VertexFormat;

/// Ellipse parameters sampled at one point in time.
///
/// The updater owns one of these and overwrites it in place each time the
/// ellipse settles into a constant configuration; geometry builders only
/// borrow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseGeometryOptions {
    pub id: EntityId,
    pub vertex_format: VertexFormat,
    pub center: DVec3,
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    pub rotation: Option<f64>,
    pub height: Option<f64>,
    pub extruded_height: Option<f64>,
    pub granularity: Option<f64>,
    pub st_rotation: Option<f64>,
    pub number_of_vertical_lines: Option<u32>,
}

impl EllipseGeometryOptions {
    /// Creates empty options for an entity.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            vertex_format: VertexFormat::default(),
            center: DVec3::ZERO,
            semi_major_axis: 0.0,
            semi_minor_axis: 0.0,
            rotation: None,
            height: None,
            extruded_height: None,
            granularity: None,
            st_rotation: None,
            number_of_vertical_lines: None,
        }
    }

    /// Overwrites every sampled field with values at `time`.
    ///
    /// Optional ellipse properties that are undefined clear their field.
    pub(crate) fn sample(
        &mut self,
        time: JulianDate,
        position: &PropertyRef<DVec3>,
        semi_major_axis: &PropertyRef<f64>,
        semi_minor_axis: &PropertyRef<f64>,
        ellipse: &EllipseGraphics,
    ) {
        let at = |p: Option<PropertyRef<f64>>| p.map(|p| p.value(time));

        self.center = position.value(time);
        self.semi_major_axis = semi_major_axis.value(time);
        self.semi_minor_axis = semi_minor_axis.value(time);
        self.rotation = at(ellipse.rotation());
        self.height = at(ellipse.height());
        self.extruded_height = at(ellipse.extruded_height());
        self.granularity = at(ellipse.granularity());
        self.st_rotation = at(ellipse.st_rotation());
    }
}
