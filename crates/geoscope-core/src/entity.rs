//! Scene entities.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::DVec3;

use crate::ellipse::EllipseGraphics;
use crate::event::Event;
use crate::property::{replace_if_changed, PropertyRef};

/// Stable identifier of an entity.
pub type EntityId = String;

/// The value of an entity property, before or after a change.
#[derive(Clone)]
pub enum EntityValue {
    Name(Option<String>),
    Position(Option<PropertyRef<DVec3>>),
    Ellipse(Option<Rc<EllipseGraphics>>),
}

impl EntityValue {
    /// Returns the name of the property this value belongs to.
    pub fn property_name(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Position(_) => "position",
            Self::Ellipse(_) => "ellipse",
        }
    }
}

impl fmt::Debug for EntityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Position(p) => f.debug_tuple("Position").field(&p.is_some()).finish(),
            Self::Ellipse(e) => f.debug_tuple("Ellipse").field(&e.is_some()).finish(),
        }
    }
}

/// Payload of [`Entity::property_changed`].
#[derive(Debug, Clone)]
pub struct EntityPropertyChanged {
    pub source: EntityId,
    pub new_value: EntityValue,
    pub old_value: EntityValue,
}

impl EntityPropertyChanged {
    /// Returns the name of the property that changed.
    pub fn property_name(&self) -> &'static str {
        self.new_value.property_name()
    }
}

/// A scene object holding a bag of named, possibly time-varying properties.
pub struct Entity {
    id: EntityId,
    name: RefCell<Option<String>>,
    position: RefCell<Option<PropertyRef<DVec3>>>,
    ellipse: RefCell<Option<Rc<EllipseGraphics>>>,
    property_changed: Event<EntityPropertyChanged>,
}

impl Entity {
    /// Creates an entity with no properties.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            name: RefCell::new(None),
            position: RefCell::new(None),
            ellipse: RefCell::new(None),
            property_changed: Event::new(),
        }
    }

    /// Returns the entity's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> Option<String> {
        self.name.borrow().clone()
    }

    /// Sets the display name.
    pub fn set_name(&self, name: Option<String>) {
        let old = {
            let mut current = self.name.borrow_mut();
            if *current == name {
                return;
            }
            std::mem::replace(&mut *current, name.clone())
        };
        self.raise(EntityValue::Name(name), EntityValue::Name(old));
    }

    /// Returns the position property.
    pub fn position(&self) -> Option<PropertyRef<DVec3>> {
        self.position.borrow().clone()
    }

    /// Sets the position property.
    pub fn set_position(&self, position: Option<PropertyRef<DVec3>>) {
        if let Some(old) = replace_if_changed(&self.position, position.clone()) {
            self.raise(EntityValue::Position(position), EntityValue::Position(old));
        }
    }

    /// Returns the ellipse attached to this entity.
    pub fn ellipse(&self) -> Option<Rc<EllipseGraphics>> {
        self.ellipse.borrow().clone()
    }

    /// Attaches or detaches an ellipse.
    pub fn set_ellipse(&self, ellipse: Option<Rc<EllipseGraphics>>) {
        if let Some(old) = replace_if_changed(&self.ellipse, ellipse.clone()) {
            self.raise(EntityValue::Ellipse(ellipse), EntityValue::Ellipse(old));
        }
    }

    /// Raised after any property is replaced.
    pub fn property_changed(&self) -> &Event<EntityPropertyChanged> {
        &self.property_changed
    }

    fn raise(&self, new_value: EntityValue, old_value: EntityValue) {
        self.property_changed.raise(&EntityPropertyChanged {
            source: self.id.clone(),
            new_value,
            old_value,
        });
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name.borrow())
            .field("has_position", &self.position.borrow().is_some())
            .field("has_ellipse", &self.ellipse.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::ConstantProperty;

    fn record(entity: &Entity) -> (Rc<RefCell<Vec<EntityPropertyChanged>>>, crate::Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sub = {
            let seen = Rc::clone(&seen);
            entity
                .property_changed()
                .subscribe(move |c: &EntityPropertyChanged| seen.borrow_mut().push(c.clone()))
        };
        (seen, sub)
    }

    #[test]
    fn test_entity_creation() {
        let entity = Entity::new("e1");
        assert_eq!(entity.id(), "e1");
        assert!(entity.name().is_none());
        assert!(entity.position().is_none());
        assert!(entity.ellipse().is_none());
    }

    #[test]
    fn test_set_ellipse_carries_old_and_new() {
        let entity = Entity::new("e1");
        let (seen, _sub) = record(&entity);

        let first = Rc::new(EllipseGraphics::new());
        let second = Rc::new(EllipseGraphics::new());
        entity.set_ellipse(Some(Rc::clone(&first)));
        entity.set_ellipse(Some(Rc::clone(&second)));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].source, "e1");
        assert_eq!(seen[1].property_name(), "ellipse");
        match (&seen[1].new_value, &seen[1].old_value) {
            (EntityValue::Ellipse(Some(new)), EntityValue::Ellipse(Some(old))) => {
                assert!(Rc::ptr_eq(new, &second));
                assert!(Rc::ptr_eq(old, &first));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_unchanged_values_do_not_raise() {
        let entity = Entity::new("e1");
        let (seen, _sub) = record(&entity);

        let position = ConstantProperty::shared(DVec3::X);
        entity.set_position(Some(Rc::clone(&position)));
        entity.set_position(Some(position));
        entity.set_name(Some("a".into()));
        entity.set_name(Some("a".into()));

        let names: Vec<_> = seen.borrow().iter().map(EntityPropertyChanged::property_name).collect();
        assert_eq!(names, vec!["position", "name"]);
    }
}
