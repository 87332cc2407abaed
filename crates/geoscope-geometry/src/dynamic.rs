//! Per-frame geometry for ellipses whose shape varies over time.

use std::rc::Rc;

use geoscope_core::{DefaultProperties, Entity, JulianDate, Result};

use crate::geometry::{EllipseGeometry, EllipseOutlineGeometry, Geometry};
use crate::instance::{GeometryInstance, InstanceAttributes};
use crate::options::EllipseGeometryOptions;
use crate::vertex_format::VertexFormat;

/// Instances produced for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicFrame {
    pub fill: Option<GeometryInstance>,
    pub outline: Option<GeometryInstance>,
}

impl DynamicFrame {
    /// Returns true if nothing is drawn this frame.
    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.outline.is_none()
    }
}

/// Rebuilds a dynamic ellipse from live property values each frame.
///
/// Created by [`crate::EllipseGeometryUpdater::create_dynamic_updater`].
#[derive(Debug)]
pub struct DynamicEllipseUpdater {
    entity: Rc<Entity>,
    defaults: Rc<DefaultProperties>,
    options: EllipseGeometryOptions,
}

impl DynamicEllipseUpdater {
    pub(crate) fn new(entity: Rc<Entity>, defaults: Rc<DefaultProperties>) -> Self {
        let mut options = EllipseGeometryOptions::new(entity.id());
        options.number_of_vertical_lines = Some(defaults.number_of_vertical_lines);
        Self {
            entity,
            defaults,
            options,
        }
    }

    /// Samples the ellipse at `time` and builds this frame's instances.
    ///
    /// Returns an empty frame when the ellipse is absent, hidden, or missing
    /// a required property at `time`.
    pub fn update(&mut self, time: JulianDate) -> Result<DynamicFrame> {
        let mut frame = DynamicFrame::default();

        let Some(ellipse) = self.entity.ellipse() else {
            return Ok(frame);
        };
        let (Some(position), Some(semi_major_axis), Some(semi_minor_axis)) = (
            self.entity.position(),
            ellipse.semi_major_axis(),
            ellipse.semi_minor_axis(),
        ) else {
            return Ok(frame);
        };

        let show = ellipse
            .show()
            .unwrap_or_else(|| Rc::clone(&self.defaults.show));
        if !show.value(time) {
            return Ok(frame);
        }

        let material = ellipse
            .material()
            .unwrap_or_else(|| Rc::clone(&self.defaults.material));
        self.options.vertex_format = VertexFormat::for_material(material.kind());
        self.options
            .sample(time, &position, &semi_major_axis, &semi_minor_axis, &ellipse);

        if ellipse.fill().map_or(true, |fill| fill.value(time)) {
            frame.fill = Some(GeometryInstance {
                id: self.options.id.clone(),
                geometry: Geometry::Ellipse(EllipseGeometry::new(&self.options)?),
                attributes: InstanceAttributes::for_material(&material, true, time),
            });
        }

        let outline = ellipse
            .outline()
            .unwrap_or_else(|| Rc::clone(&self.defaults.outline));
        if outline.value(time) {
            let outline_color = ellipse
                .outline_color()
                .unwrap_or_else(|| Rc::clone(&self.defaults.outline_color));
            frame.outline = Some(GeometryInstance {
                id: self.options.id.clone(),
                geometry: Geometry::EllipseOutline(EllipseOutlineGeometry::new(&self.options)?),
                attributes: InstanceAttributes::with_color(true, outline_color.value(time)),
            });
        }

        Ok(frame)
    }

    /// Returns the options sampled by the last [`DynamicEllipseUpdater::update`].
    pub fn options(&self) -> &EllipseGeometryOptions {
        &self.options
    }
}
