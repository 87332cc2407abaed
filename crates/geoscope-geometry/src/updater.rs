//! Ellipse geometry updater.
//!
//! An [`EllipseGeometryUpdater`] watches one entity and decides how its
//! ellipse is rendered:
//! - [`Classification::Color`] / [`Classification::Material`] when every
//!   shape-defining property is constant, backed by a sampled
//!   [`EllipseGeometryOptions`] snapshot
//! - [`Classification::Dynamic`] when any of them varies over time
//! - [`Classification::None`] when there is nothing to draw
//!
//! Batching code subscribes to [`EllipseGeometryUpdater::geometry_changed`]
//! and [`EllipseGeometryUpdater::outline_geometry_changed`] to move the entity
//! between batches, then calls the instance factories.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use geoscope_core::{
    Classification, Color, DVec3, DefaultProperties, EllipseGraphics, Entity, EntityId,
    EntityPropertyChanged, EntityValue, Event, GeoscopeError, JulianDate, MaterialKind,
    MaterialProperty, PropertyRef, Result, Subscription,
};
use log::{debug, trace, warn};

use crate::dynamic::DynamicEllipseUpdater;
use crate::geometry::{EllipseGeometry, EllipseOutlineGeometry, Geometry};
use crate::instance::{GeometryInstance, InstanceAttributes};
use crate::options::EllipseGeometryOptions;
use crate::vertex_format::VertexFormat;

/// Payload of [`EllipseGeometryUpdater::geometry_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryChanged {
    pub classification: Classification,
    pub previous: Classification,
}

enum Notification {
    Geometry(GeometryChanged),
    Outline(bool),
}

/// Ellipse properties with defaults substituted for undefined ones.
#[derive(Clone)]
struct ResolvedProperties {
    show: PropertyRef<bool>,
    material: Rc<MaterialProperty>,
    show_outline: PropertyRef<bool>,
    outline_color: PropertyRef<Color>,
}

struct UpdaterState {
    classification: Classification,
    is_outlined: bool,
    resolved: Option<ResolvedProperties>,
    options: EllipseGeometryOptions,
}

impl UpdaterState {
    /// Moves to `classification`, notifying only if it differs.
    fn set_classification(&mut self, classification: Classification, out: &mut Vec<Notification>) {
        if self.classification != classification {
            self.refresh_classification(classification, out);
        }
    }

    /// Moves to `classification` and always notifies; used when the
    /// snapshot behind an unchanged static classification was resampled.
    fn refresh_classification(&mut self, classification: Classification, out: &mut Vec<Notification>) {
        let previous = std::mem::replace(&mut self.classification, classification);
        debug!(
            "entity '{}' classification {previous} -> {classification}",
            self.options.id
        );
        out.push(Notification::Geometry(GeometryChanged {
            classification,
            previous,
        }));
    }

    fn set_outlined(&mut self, is_outlined: bool, out: &mut Vec<Notification>) {
        if self.is_outlined != is_outlined {
            self.refresh_outline(is_outlined, out);
        }
    }

    fn refresh_outline(&mut self, is_outlined: bool, out: &mut Vec<Notification>) {
        self.is_outlined = is_outlined;
        debug!("entity '{}' outlined = {is_outlined}", self.options.id);
        out.push(Notification::Outline(is_outlined));
    }

    fn clear(&mut self, out: &mut Vec<Notification>) {
        self.set_classification(Classification::None, out);
        self.set_outlined(false, out);
    }

    /// Re-derives classification and outline state from the entity.
    fn evaluate(&mut self, entity: &Entity, defaults: &DefaultProperties) -> Vec<Notification> {
        let mut out = Vec::new();

        let Some(ellipse) = entity.ellipse() else {
            self.clear(&mut out);
            return out;
        };

        let fill = ellipse.fill();
        let is_filled = match &fill {
            Some(fill) if fill.is_constant() => fill.value(JulianDate::MINIMUM),
            _ => true,
        };

        let outline = ellipse.outline();
        let is_outlined = match &outline {
            Some(outline) if outline.is_constant() => outline.value(JulianDate::MINIMUM),
            Some(_) => true,
            None => false,
        };

        if !is_filled && !is_outlined {
            trace!("entity '{}' is neither filled nor outlined", self.options.id);
            self.clear(&mut out);
            return out;
        }

        let show = ellipse.show();
        let hidden = show
            .as_ref()
            .is_some_and(|show| show.is_constant() && !show.value(JulianDate::MINIMUM));
        let (Some(position), Some(semi_major_axis), Some(semi_minor_axis)) = (
            entity.position(),
            ellipse.semi_major_axis(),
            ellipse.semi_minor_axis(),
        ) else {
            self.clear(&mut out);
            return out;
        };
        if hidden {
            self.clear(&mut out);
            return out;
        }

        let material = ellipse
            .material()
            .unwrap_or_else(|| Rc::clone(&defaults.material));
        let kind = material.kind();
        self.resolved = Some(ResolvedProperties {
            show: show.unwrap_or_else(|| Rc::clone(&defaults.show)),
            material,
            show_outline: outline.unwrap_or_else(|| Rc::clone(&defaults.outline)),
            outline_color: ellipse
                .outline_color()
                .unwrap_or_else(|| Rc::clone(&defaults.outline_color)),
        });

        if is_time_varying(&position, &semi_major_axis, &semi_minor_axis, &ellipse) {
            self.set_classification(Classification::Dynamic, &mut out);
            // Dynamic outlines are drawn per frame with the fill.
            self.set_outlined(false, &mut out);
            return out;
        }

        self.options.vertex_format = VertexFormat::for_material(kind);
        self.options.sample(
            JulianDate::MINIMUM,
            &position,
            &semi_major_axis,
            &semi_minor_axis,
            &ellipse,
        );
        trace!("entity '{}' snapshot resampled", self.options.id);

        if is_filled {
            let classification = match kind {
                MaterialKind::Color => Classification::Color,
                MaterialKind::Image => Classification::Material,
            };
            self.refresh_classification(classification, &mut out);
        } else {
            self.set_classification(Classification::None, &mut out);
        }

        if is_outlined {
            self.refresh_outline(true, &mut out);
        } else {
            self.set_outlined(false, &mut out);
        }

        out
    }
}

fn is_time_varying(
    position: &PropertyRef<DVec3>,
    semi_major_axis: &PropertyRef<f64>,
    semi_minor_axis: &PropertyRef<f64>,
    ellipse: &EllipseGraphics,
) -> bool {
    let optional = [
        ellipse.rotation(),
        ellipse.height(),
        ellipse.extruded_height(),
        ellipse.granularity(),
        ellipse.st_rotation(),
    ];
    !position.is_constant()
        || !semi_major_axis.is_constant()
        || !semi_minor_axis.is_constant()
        || optional.iter().flatten().any(|p| !p.is_constant())
}

struct UpdaterInner {
    id: EntityId,
    entity: Rc<Entity>,
    defaults: Rc<DefaultProperties>,
    state: RefCell<UpdaterState>,
    geometry_changed: Event<GeometryChanged>,
    outline_geometry_changed: Event<bool>,
    entity_subscription: RefCell<Option<Subscription>>,
    ellipse_subscription: RefCell<Option<Subscription>>,
    updating: Cell<bool>,
    pending: Cell<bool>,
    disposed: Cell<bool>,
}

impl UpdaterInner {
    fn on_entity_property_changed(self: &Rc<Self>, change: &EntityPropertyChanged) {
        match &change.new_value {
            EntityValue::Ellipse(ellipse) => self.track_ellipse(ellipse.as_ref()),
            EntityValue::Position(_) => self.update(),
            EntityValue::Name(_) => trace!(
                "entity '{}' ignoring '{}' change",
                self.id,
                change.property_name()
            ),
        }
    }

    /// Moves the shape subscription to `ellipse` and re-evaluates.
    fn track_ellipse(self: &Rc<Self>, ellipse: Option<&Rc<EllipseGraphics>>) {
        let previous = self.ellipse_subscription.borrow_mut().take();
        drop(previous);

        if let Some(ellipse) = ellipse {
            let weak = Rc::downgrade(self);
            let subscription = ellipse.definition_changed().subscribe(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.update();
                }
            });
            *self.ellipse_subscription.borrow_mut() = Some(subscription);
        }

        self.update();
    }

    /// Evaluates and delivers notifications. A trigger arriving while
    /// listeners run is queued and evaluated once the current pass ends.
    fn update(&self) {
        if self.disposed.get() {
            return;
        }
        if self.updating.replace(true) {
            self.pending.set(true);
            return;
        }

        loop {
            self.pending.set(false);
            let notifications = self
                .state
                .borrow_mut()
                .evaluate(&self.entity, &self.defaults);

            for notification in notifications {
                if self.disposed.get() {
                    break;
                }
                match notification {
                    Notification::Geometry(change) => self.geometry_changed.raise(&change),
                    Notification::Outline(outlined) => {
                        self.outline_geometry_changed.raise(&outlined);
                    }
                }
            }

            if !self.pending.get() || self.disposed.get() {
                break;
            }
        }

        self.updating.set(false);
    }
}

/// Keeps the render classification of one entity's ellipse up to date.
pub struct EllipseGeometryUpdater {
    inner: Rc<UpdaterInner>,
}

impl EllipseGeometryUpdater {
    /// Creates an updater for `entity` using the shared default properties.
    ///
    /// Returns [`GeoscopeError::InvalidArgument`] if no entity is given.
    pub fn new(entity: impl Into<Option<Rc<Entity>>>) -> Result<Self> {
        Self::with_defaults(entity, DefaultProperties::shared())
    }

    /// Creates an updater that substitutes `defaults` for undefined properties.
    pub fn with_defaults(
        entity: impl Into<Option<Rc<Entity>>>,
        defaults: Rc<DefaultProperties>,
    ) -> Result<Self> {
        let entity = entity
            .into()
            .ok_or_else(|| GeoscopeError::InvalidArgument("entity is required".to_string()))?;
        let id: EntityId = entity.id().to_string();

        let mut options = EllipseGeometryOptions::new(id.clone());
        options.number_of_vertical_lines = Some(defaults.number_of_vertical_lines);

        let inner = Rc::new(UpdaterInner {
            id,
            entity,
            defaults,
            state: RefCell::new(UpdaterState {
                classification: Classification::None,
                is_outlined: false,
                resolved: None,
                options,
            }),
            geometry_changed: Event::new(),
            outline_geometry_changed: Event::new(),
            entity_subscription: RefCell::new(None),
            ellipse_subscription: RefCell::new(None),
            updating: Cell::new(false),
            pending: Cell::new(false),
            disposed: Cell::new(false),
        });

        let weak = Rc::downgrade(&inner);
        let subscription = inner.entity.property_changed().subscribe(move |change| {
            if let Some(inner) = weak.upgrade() {
                inner.on_entity_property_changed(change);
            }
        });
        *inner.entity_subscription.borrow_mut() = Some(subscription);

        let ellipse = inner.entity.ellipse();
        inner.track_ellipse(ellipse.as_ref());
        debug!(
            "created ellipse updater for entity '{}' ({})",
            inner.id,
            inner.state.borrow().classification
        );

        Ok(Self { inner })
    }

    /// Returns the identifier of the watched entity.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Returns the watched entity.
    pub fn entity(&self) -> &Rc<Entity> {
        &self.inner.entity
    }

    /// Returns the current fill classification.
    pub fn classification(&self) -> Classification {
        self.inner.state.borrow().classification
    }

    /// Returns true if a static outline should be drawn.
    pub fn is_outlined(&self) -> bool {
        self.inner.state.borrow().is_outlined
    }

    /// Raised with the new and previous classification.
    ///
    /// Static classifications are re-raised whenever their snapshot is
    /// resampled, even if the value is unchanged.
    pub fn geometry_changed(&self) -> &Event<GeometryChanged> {
        &self.inner.geometry_changed
    }

    /// Raised with the new outline state.
    pub fn outline_geometry_changed(&self) -> &Event<bool> {
        &self.inner.outline_geometry_changed
    }

    pub fn show_property(&self) -> Option<PropertyRef<bool>> {
        self.resolved().map(|r| r.show)
    }

    pub fn material_property(&self) -> Option<Rc<MaterialProperty>> {
        self.resolved().map(|r| r.material)
    }

    pub fn show_outline_property(&self) -> Option<PropertyRef<bool>> {
        self.resolved().map(|r| r.show_outline)
    }

    pub fn outline_color_property(&self) -> Option<PropertyRef<Color>> {
        self.resolved().map(|r| r.outline_color)
    }

    /// Returns a copy of the current options snapshot.
    ///
    /// Only meaningful while the classification is static or the entity is
    /// outlined.
    pub fn options(&self) -> EllipseGeometryOptions {
        self.inner.state.borrow().options.clone()
    }

    /// Builds the fill instance from the snapshot, with attributes sampled
    /// at `time`.
    ///
    /// Fails unless the classification is [`Classification::Color`] or
    /// [`Classification::Material`].
    pub fn create_fill_instance(&self, time: JulianDate) -> Result<GeometryInstance> {
        self.ensure_live()?;
        let state = self.inner.state.borrow();
        let classification = state.classification;
        let resolved = match state.resolved.as_ref() {
            Some(resolved) if classification.is_static() => resolved,
            _ => {
                warn!(
                    "fill instance requested for entity '{}' while {classification}",
                    self.inner.id
                );
                return Err(GeoscopeError::InvalidClassification {
                    operation: "create a fill instance",
                    classification,
                });
            }
        };

        Ok(GeometryInstance {
            id: self.inner.id.clone(),
            geometry: Geometry::Ellipse(EllipseGeometry::new(&state.options)?),
            attributes: InstanceAttributes::for_material(
                &resolved.material,
                resolved.show.value(time),
                time,
            ),
        })
    }

    /// Builds the outline instance from the snapshot, with attributes
    /// sampled at `time`. Attributes follow the fill: a color outline for
    /// [`Classification::Color`], show only for [`Classification::Material`].
    ///
    /// Fails unless [`EllipseGeometryUpdater::is_outlined`] holds and the
    /// classification is static.
    pub fn create_outline_instance(&self, time: JulianDate) -> Result<GeometryInstance> {
        self.ensure_live()?;
        let state = self.inner.state.borrow();
        let resolved = match state.resolved.as_ref() {
            Some(resolved) if state.is_outlined => resolved,
            _ => {
                warn!(
                    "outline instance requested for entity '{}' which is not outlined",
                    self.inner.id
                );
                return Err(GeoscopeError::NotOutlined(self.inner.id.clone()));
            }
        };

        let attributes = match state.classification {
            Classification::Color => InstanceAttributes::with_color(
                resolved.show_outline.value(time),
                resolved.outline_color.value(time),
            ),
            Classification::Material => {
                InstanceAttributes::show_only(resolved.show_outline.value(time))
            }
            classification @ (Classification::None | Classification::Dynamic) => {
                warn!(
                    "outline instance requested for entity '{}' while {classification}",
                    self.inner.id
                );
                return Err(GeoscopeError::InvalidClassification {
                    operation: "create an outline instance",
                    classification,
                });
            }
        };

        Ok(GeometryInstance {
            id: self.inner.id.clone(),
            geometry: Geometry::EllipseOutline(EllipseOutlineGeometry::new(&state.options)?),
            attributes,
        })
    }

    /// Creates the per-frame updater for a dynamic ellipse.
    pub fn create_dynamic_updater(&self) -> Result<DynamicEllipseUpdater> {
        self.ensure_live()?;
        let classification = self.classification();
        if classification != Classification::Dynamic {
            return Err(GeoscopeError::InvalidClassification {
                operation: "create a dynamic updater",
                classification,
            });
        }
        Ok(DynamicEllipseUpdater::new(
            Rc::clone(&self.inner.entity),
            Rc::clone(&self.inner.defaults),
        ))
    }

    /// Stops listening to the entity and its ellipse. Safe to call twice.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        drop(self.inner.entity_subscription.borrow_mut().take());
        drop(self.inner.ellipse_subscription.borrow_mut().take());
        debug!("disposed ellipse updater for entity '{}'", self.inner.id);
    }

    /// Returns true once [`EllipseGeometryUpdater::dispose`] has been called.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    fn resolved(&self) -> Option<ResolvedProperties> {
        self.inner.state.borrow().resolved.clone()
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            Err(GeoscopeError::Disposed(self.inner.id.clone()))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for EllipseGeometryUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("EllipseGeometryUpdater")
            .field("id", &self.inner.id)
            .field("classification", &state.classification)
            .field("is_outlined", &state.is_outlined)
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}
