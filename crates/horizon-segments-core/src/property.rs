//! Property system for Horizon Segments.
//!
//! A [`Property<T>`] wraps a value and reports whether a write actually changed
//! it, so owners only emit their notification signal on real changes. Values
//! that carry a domain constraint can be written through
//! [`Property::set_validated`], which rejects the write without touching the
//! stored value.
//!
//! # Example
//!
//! ```
//! use horizon_segments_core::property::Property;
//!
//! let radius = Property::named("corner_radius", 6.0_f32);
//! assert!(radius.set(8.0));
//! assert!(!radius.set(8.0));
//!
//! let rejected = radius.set_validated(-1.0, |r| {
//!     if *r >= 0.0 { Ok(()) } else { Err("must not be negative".into()) }
//! });
//! assert!(rejected.is_err());
//! assert_eq!(radius.get(), 8.0);
//! ```

use std::fmt;

use parking_lot::RwLock;

use crate::error::PropertyError;
use crate::logging::targets;

/// A reactive property that tracks changes.
///
/// `Property<T>` uses interior mutability and is `Send + Sync` whenever `T` is.
pub struct Property<T> {
    name: &'static str,
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new anonymous property with an initial value.
    pub fn new(value: T) -> Self {
        Self::named("<anonymous>", value)
    }

    /// Create a property with a name used in errors and trace output.
    pub fn named(name: &'static str, value: T) -> Self {
        Self {
            name,
            value: RwLock::new(value),
        }
    }

    /// The property name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller emits the associated notification when this returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            tracing::trace!(target: targets::PROPERTY, name = self.name, "property changed");
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }

    /// Validate and set the value.
    ///
    /// The validator runs before the write lock is taken; a rejected value
    /// leaves the property unchanged.
    pub fn set_validated<V>(&self, value: T, validate: V) -> Result<bool, PropertyError>
    where
        V: FnOnce(&T) -> Result<(), String>,
    {
        validate(&value).map_err(|reason| PropertyError::InvalidValue {
            name: self.name,
            reason,
        })?;
        Ok(self.set(value))
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &self.get())
            .finish()
    }
}

/// A read-only view of a property.
///
/// Useful for exposing properties publicly while keeping the setter private.
pub struct ReadOnlyProperty<'a, T> {
    inner: &'a Property<T>,
}

impl<'a, T: Clone> ReadOnlyProperty<'a, T> {
    /// Create a read-only view of a property.
    pub fn new(property: &'a Property<T>) -> Self {
        Self { inner: property }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Access the value through a closure.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.with(f)
    }
}
