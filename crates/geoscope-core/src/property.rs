//! Time-varying properties.
//!
//! A [`Property`] is a value source that can be queried at any [`JulianDate`].
//! Properties that declare themselves constant must return the same value for
//! every time, which lets consumers sample them once at
//! [`JulianDate::MINIMUM`] and cache the result.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::time::JulianDate;

/// A value that may change over time.
pub trait Property<T> {
    /// Returns true if the value is the same at every time.
    fn is_constant(&self) -> bool;

    /// Returns the value at `time`.
    fn value(&self, time: JulianDate) -> T;
}

/// Shared handle to a property, as stored on entities and graphics.
pub type PropertyRef<T> = Rc<dyn Property<T>>;

/// A property whose value never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantProperty<T> {
    value: T,
}

impl<T: Clone> ConstantProperty<T> {
    /// Creates a constant property.
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone + 'static> ConstantProperty<T> {
    /// Creates a constant property behind a shared [`PropertyRef`].
    pub fn shared(value: T) -> PropertyRef<T> {
        Rc::new(Self::new(value))
    }
}

impl<T: Clone> Property<T> for ConstantProperty<T> {
    fn is_constant(&self) -> bool {
        true
    }

    fn value(&self, _time: JulianDate) -> T {
        self.value.clone()
    }
}

/// A property computed by a callback.
///
/// The callback decides the value; `is_constant` is declared by the caller.
pub struct CallbackProperty<T> {
    callback: Box<dyn Fn(JulianDate) -> T>,
    is_constant: bool,
}

impl<T> CallbackProperty<T> {
    /// Creates a property evaluated by `callback`.
    pub fn new(callback: impl Fn(JulianDate) -> T + 'static, is_constant: bool) -> Self {
        Self {
            callback: Box::new(callback),
            is_constant,
        }
    }
}

impl<T: 'static> CallbackProperty<T> {
    /// Creates a time-varying callback property behind a shared [`PropertyRef`].
    pub fn shared(callback: impl Fn(JulianDate) -> T + 'static) -> PropertyRef<T> {
        Rc::new(Self::new(callback, false))
    }
}

impl<T> Property<T> for CallbackProperty<T> {
    fn is_constant(&self) -> bool {
        self.is_constant
    }

    fn value(&self, time: JulianDate) -> T {
        (self.callback)(time)
    }
}

impl<T> fmt::Debug for CallbackProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackProperty")
            .field("is_constant", &self.is_constant)
            .finish_non_exhaustive()
    }
}

/// Stores `value` in `slot` and returns the previous content, or `None` when
/// `value` is the same shared object already stored.
pub(crate) fn replace_if_changed<T: ?Sized>(
    slot: &RefCell<Option<Rc<T>>>,
    value: Option<Rc<T>>,
) -> Option<Option<Rc<T>>> {
    let mut current = slot.borrow_mut();
    let unchanged = match (current.as_ref(), value.as_ref()) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    };
    if unchanged {
        None
    } else {
        Some(std::mem::replace(&mut *current, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_property_ignores_time() {
        let p = ConstantProperty::new(4.5);
        assert!(p.is_constant());
        assert_eq!(p.value(JulianDate::MINIMUM), 4.5);
        assert_eq!(p.value(JulianDate::MAXIMUM), 4.5);
    }

    #[test]
    fn test_callback_property_samples_time() {
        let p = CallbackProperty::new(|t: JulianDate| t.total_days(), false);
        assert!(!p.is_constant());
        assert_eq!(p.value(JulianDate::J2000), JulianDate::J2000.total_days());
    }

    #[test]
    fn test_replace_if_changed() {
        let slot: RefCell<Option<PropertyRef<f64>>> = RefCell::new(None);
        let a = ConstantProperty::shared(1.0);

        assert!(replace_if_changed(&slot, Some(Rc::clone(&a))).is_some());
        assert!(replace_if_changed(&slot, Some(Rc::clone(&a))).is_none());

        let old = replace_if_changed(&slot, None).expect("changed");
        assert!(old.is_some_and(|p| Rc::ptr_eq(&p, &a)));
        assert!(replace_if_changed(&slot, None).is_none());
    }
}
