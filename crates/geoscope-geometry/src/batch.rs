//! Batches of render instances, kept in sync with updater classifications.
//!
//! A [`GeometryBatcher`] owns a set of [`EllipseGeometryUpdater`]s and listens
//! to their change events. Static batches are only rebuilt when one of their
//! members joins, leaves, or resamples its snapshot; the dynamic batch is
//! rebuilt every frame.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use geoscope_core::{Classification, EntityId, JulianDate, Subscription};
use log::{debug, warn};

use crate::dynamic::DynamicEllipseUpdater;
use crate::instance::GeometryInstance;
use crate::updater::{EllipseGeometryUpdater, GeometryChanged};

/// Identifies one of the batches managed by a [`GeometryBatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// Static fills with per-instance color.
    Color,
    /// Static fills drawn with a material.
    Material,
    /// Static outlines.
    Outline,
    /// Fills and outlines rebuilt every frame.
    Dynamic,
}

impl BatchKind {
    const STATIC: [Self; 3] = [Self::Color, Self::Material, Self::Outline];

    fn for_fill(classification: Classification) -> Option<Self> {
        match classification {
            Classification::None => None,
            Classification::Color => Some(Self::Color),
            Classification::Material => Some(Self::Material),
            Classification::Dynamic => Some(Self::Dynamic),
        }
    }
}

#[derive(Debug, Default)]
struct Batch {
    members: BTreeSet<EntityId>,
    dirty: bool,
    rebuilds: usize,
    instances: Vec<GeometryInstance>,
}

impl Batch {
    fn insert(&mut self, id: &str) {
        self.members.insert(id.to_string());
        self.dirty = true;
    }

    fn remove(&mut self, id: &str) {
        if self.members.remove(id) {
            self.dirty = true;
        }
    }
}

#[derive(Debug, Default)]
struct Batches {
    color: Batch,
    material: Batch,
    outline: Batch,
    dynamic: Batch,
}

impl Batches {
    fn get(&self, kind: BatchKind) -> &Batch {
        match kind {
            BatchKind::Color => &self.color,
            BatchKind::Material => &self.material,
            BatchKind::Outline => &self.outline,
            BatchKind::Dynamic => &self.dynamic,
        }
    }

    fn get_mut(&mut self, kind: BatchKind) -> &mut Batch {
        match kind {
            BatchKind::Color => &mut self.color,
            BatchKind::Material => &mut self.material,
            BatchKind::Outline => &mut self.outline,
            BatchKind::Dynamic => &mut self.dynamic,
        }
    }

    fn on_geometry_changed(&mut self, id: &str, change: GeometryChanged) {
        if let Some(kind) = BatchKind::for_fill(change.previous) {
            self.get_mut(kind).remove(id);
        }
        if let Some(kind) = BatchKind::for_fill(change.classification) {
            self.get_mut(kind).insert(id);
        }
    }

    fn on_outline_changed(&mut self, id: &str, is_outlined: bool) {
        if is_outlined {
            self.outline.insert(id);
        } else {
            self.outline.remove(id);
        }
    }

    fn remove_everywhere(&mut self, id: &str) {
        for batch in [
            &mut self.color,
            &mut self.material,
            &mut self.outline,
            &mut self.dynamic,
        ] {
            batch.remove(id);
        }
    }
}

struct Tracked {
    updater: EllipseGeometryUpdater,
    dynamic: Option<DynamicEllipseUpdater>,
    _subscriptions: [Subscription; 2],
}

/// Sorts entities into render batches by classification.
#[derive(Default)]
pub struct GeometryBatcher {
    batches: Rc<RefCell<Batches>>,
    tracked: HashMap<EntityId, Tracked>,
}

impl GeometryBatcher {
    /// Creates an empty batcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `updater`, replacing any updater with the same id.
    pub fn add(&mut self, updater: EllipseGeometryUpdater) {
        let id = updater.id().to_string();
        self.remove(&id);

        {
            let mut batches = self.batches.borrow_mut();
            if let Some(kind) = BatchKind::for_fill(updater.classification()) {
                batches.get_mut(kind).insert(&id);
            }
            if updater.is_outlined() {
                batches.outline.insert(&id);
            }
        }

        let geometry = {
            let batches = Rc::downgrade(&self.batches);
            let id = id.clone();
            updater.geometry_changed().subscribe(move |change| {
                if let Some(batches) = batches.upgrade() {
                    batches.borrow_mut().on_geometry_changed(&id, *change);
                }
            })
        };
        let outline = {
            let batches = Rc::downgrade(&self.batches);
            let id = id.clone();
            updater.outline_geometry_changed().subscribe(move |is_outlined| {
                if let Some(batches) = batches.upgrade() {
                    batches.borrow_mut().on_outline_changed(&id, *is_outlined);
                }
            })
        };

        debug!("batcher tracking entity '{id}'");
        self.tracked.insert(
            id,
            Tracked {
                updater,
                dynamic: None,
                _subscriptions: [geometry, outline],
            },
        );
    }

    /// Stops tracking and disposes the updater for `id`.
    ///
    /// Returns false if no such updater was tracked.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(tracked) = self.tracked.remove(id) else {
            return false;
        };
        tracked.updater.dispose();
        self.batches.borrow_mut().remove_everywhere(id);
        debug!("batcher dropped entity '{id}'");
        true
    }

    /// Returns the tracked updater for `id`.
    pub fn updater(&self, id: &str) -> Option<&EllipseGeometryUpdater> {
        self.tracked.get(id).map(|t| &t.updater)
    }

    /// Returns the number of tracked updaters.
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Returns true if no updaters are tracked.
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Returns the ids in a batch, in sorted order.
    pub fn members(&self, kind: BatchKind) -> Vec<EntityId> {
        self.batches.borrow().get(kind).members.iter().cloned().collect()
    }

    /// Returns true if a batch must be rebuilt on the next update.
    pub fn is_dirty(&self, kind: BatchKind) -> bool {
        self.batches.borrow().get(kind).dirty
    }

    /// Returns how many times a batch has been rebuilt.
    pub fn rebuild_count(&self, kind: BatchKind) -> usize {
        self.batches.borrow().get(kind).rebuilds
    }

    /// Returns the instances built for a batch by the last update.
    pub fn instances(&self, kind: BatchKind) -> Vec<GeometryInstance> {
        self.batches.borrow().get(kind).instances.clone()
    }

    /// Rebuilds dirty static batches and the dynamic batch at `time`.
    ///
    /// Members whose geometry cannot be built are skipped with a warning.
    pub fn update(&mut self, time: JulianDate) {
        for kind in BatchKind::STATIC {
            let members: Vec<EntityId> = {
                let batches = self.batches.borrow();
                let batch = batches.get(kind);
                if !batch.dirty {
                    continue;
                }
                batch.members.iter().cloned().collect()
            };

            let instances = members
                .iter()
                .filter_map(|id| self.tracked.get(id))
                // Outlines without a static fill snapshot are not drawn statically.
                .filter(|tracked| {
                    kind != BatchKind::Outline || tracked.updater.classification().is_static()
                })
                .filter_map(|tracked| {
                    let instance = if kind == BatchKind::Outline {
                        tracked.updater.create_outline_instance(time)
                    } else {
                        tracked.updater.create_fill_instance(time)
                    };
                    instance
                        .map_err(|e| warn!("skipping '{}' in {kind:?} batch: {e}", tracked.updater.id()))
                        .ok()
                })
                .collect();
            self.store(kind, instances);
        }

        let dynamic_members: BTreeSet<EntityId> = self.batches.borrow().dynamic.members.clone();
        let mut instances = Vec::new();
        for (id, tracked) in &mut self.tracked {
            if !dynamic_members.contains(id) {
                tracked.dynamic = None;
                continue;
            }
            if tracked.dynamic.is_none() {
                match tracked.updater.create_dynamic_updater() {
                    Ok(dynamic) => tracked.dynamic = Some(dynamic),
                    Err(e) => {
                        warn!("skipping '{id}' in dynamic batch: {e}");
                        continue;
                    }
                }
            }
            let Some(dynamic) = tracked.dynamic.as_mut() else {
                continue;
            };
            match dynamic.update(time) {
                Ok(frame) => instances.extend(frame.fill.into_iter().chain(frame.outline)),
                Err(e) => warn!("skipping '{id}' in dynamic batch: {e}"),
            }
        }
        instances.sort_by(|a, b| a.id.cmp(&b.id));
        self.store(BatchKind::Dynamic, instances);
    }

    fn store(&self, kind: BatchKind, instances: Vec<GeometryInstance>) {
        let mut batches = self.batches.borrow_mut();
        let batch = batches.get_mut(kind);
        batch.instances = instances;
        batch.dirty = false;
        batch.rebuilds += 1;
    }
}

impl std::fmt::Debug for GeometryBatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryBatcher")
            .field("batches", &self.batches.borrow())
            .field("tracked", &self.tracked.len())
            .finish()
    }
}
