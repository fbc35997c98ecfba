// ============================================================================
// ripple-cells - Reactive Object
// Named reactive and computed properties behind one host-facing surface
// ============================================================================
//
// A reactive object is a string-keyed map of properties, each backed by a
// reactive cell or a computed cell. It is the boundary a host hands to
// consumers: reads come out of `get`, writes go in through `set`, and the
// dependency wiring underneath stays invisible. There is no property
// interception - fields are declared up front with `define_reactive` and
// `define_computed`, and access goes through these explicit accessors.
// ============================================================================

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::core::tracker::DependencyTracker;
use crate::primitives::cell::ReactiveCell;
use crate::primitives::computed::ComputedCell;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors surfaced by property access on a [`ReactiveObject`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The named property was never defined on this object.
    #[error("unknown property '{0}'")]
    Unknown(String),

    /// A property with this name already exists.
    #[error("property '{0}' is already defined")]
    AlreadyDefined(String),

    /// The property is computed and cannot be written.
    #[error("property '{0}' is read-only")]
    ReadOnly(String),

    /// The property exists but holds a different value type.
    #[error("property '{0}' has a different type")]
    TypeMismatch(String),
}

// =============================================================================
// FIELDS
// =============================================================================

/// One defined property. The boxed `Any` holds the typed handle
/// (`ReactiveCell<T>` or `ComputedCell<T>`) for downcasting at the
/// accessor.
enum Field {
    Reactive(Box<dyn Any>),
    Computed(Box<dyn Any>),
}

// =============================================================================
// REACTIVE OBJECT
// =============================================================================

/// A set of named reactive and computed properties over one tracker.
///
/// Reactive properties are writable observed storage; computed properties
/// are derived and read-only. Reads through [`get`](Self::get) are tracked
/// like direct cell reads, so a computed property evaluated while reading
/// another object's fields depends on them transparently.
///
/// # Example
///
/// ```
/// use ripple_cells::ReactiveObject;
///
/// let person = ReactiveObject::new();
/// person.define_reactive("age", 16).unwrap();
///
/// let height = person.define_reactive("height", 170).unwrap();
/// assert_eq!(height.get(), 170);
///
/// person.set("age", 22).unwrap();
/// assert_eq!(person.get::<i32>("age").unwrap(), 22);
/// ```
pub struct ReactiveObject {
    tracker: Rc<DependencyTracker>,
    fields: RefCell<HashMap<String, Field>>,
}

impl ReactiveObject {
    /// Create an object with its own private tracker.
    pub fn new() -> Self {
        Self::with_tracker(DependencyTracker::new())
    }

    /// Create an object on an existing tracker, letting its properties
    /// participate in dependency tracking with cells defined elsewhere.
    pub fn with_tracker(tracker: Rc<DependencyTracker>) -> Self {
        Self {
            tracker,
            fields: RefCell::new(HashMap::new()),
        }
    }

    /// The tracker this object's properties run on.
    pub fn tracker(&self) -> &Rc<DependencyTracker> {
        &self.tracker
    }

    /// Whether a property with this name is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.borrow().contains_key(name)
    }

    /// Declare a writable reactive property with an initial value.
    ///
    /// Returns the backing cell handle, which compute closures should
    /// capture directly instead of holding the whole object.
    pub fn define_reactive<T: Clone + 'static>(
        &self,
        name: &str,
        initial: T,
    ) -> Result<ReactiveCell<T>, PropertyError> {
        let mut fields = self.fields.borrow_mut();
        if fields.contains_key(name) {
            return Err(PropertyError::AlreadyDefined(name.to_string()));
        }

        tracing::debug!(property = name, "defining reactive property");
        let cell = ReactiveCell::new(&self.tracker, initial);
        fields.insert(name.to_string(), Field::Reactive(Box::new(cell.clone())));
        Ok(cell)
    }

    /// Declare a read-only computed property bound to a compute function
    /// and a change callback.
    ///
    /// The compute closure should capture cell handles rather than the
    /// object itself, which would otherwise keep the object alive through
    /// its own fields.
    pub fn define_computed<T: Clone + 'static>(
        &self,
        name: &str,
        compute: impl Fn() -> T + 'static,
        on_change: impl FnMut(&T) + 'static,
    ) -> Result<ComputedCell<T>, PropertyError> {
        let mut fields = self.fields.borrow_mut();
        if fields.contains_key(name) {
            return Err(PropertyError::AlreadyDefined(name.to_string()));
        }

        tracing::debug!(property = name, "defining computed property");
        let cell = ComputedCell::new(&self.tracker, compute, on_change);
        fields.insert(name.to_string(), Field::Computed(Box::new(cell.clone())));
        Ok(cell)
    }

    /// Read a property's current value.
    ///
    /// Reactive properties are tracked reads; computed properties evaluate
    /// their compute function fresh.
    pub fn get<T: Clone + 'static>(&self, name: &str) -> Result<T, PropertyError> {
        // Clone the typed handle out of the map borrow before evaluating:
        // a computed property's compute function may read this object's
        // other fields.
        enum Handle<T> {
            Reactive(ReactiveCell<T>),
            Computed(ComputedCell<T>),
        }

        let handle = {
            let fields = self.fields.borrow();
            match fields.get(name) {
                None => return Err(PropertyError::Unknown(name.to_string())),
                Some(Field::Reactive(boxed)) => match boxed.downcast_ref::<ReactiveCell<T>>() {
                    Some(cell) => Handle::Reactive(cell.clone()),
                    None => return Err(PropertyError::TypeMismatch(name.to_string())),
                },
                Some(Field::Computed(boxed)) => match boxed.downcast_ref::<ComputedCell<T>>() {
                    Some(cell) => Handle::Computed(cell.clone()),
                    None => return Err(PropertyError::TypeMismatch(name.to_string())),
                },
            }
        };

        match handle {
            Handle::Reactive(cell) => Ok(cell.get()),
            Handle::Computed(cell) => Ok(cell.read()),
        }
    }

    /// Write a reactive property's value, propagating to subscribers
    /// synchronously before returning.
    ///
    /// Computed properties refuse the write with
    /// [`PropertyError::ReadOnly`] and leave all state untouched.
    pub fn set<T: Clone + 'static>(&self, name: &str, value: T) -> Result<(), PropertyError> {
        let cell = {
            let fields = self.fields.borrow();
            match fields.get(name) {
                None => return Err(PropertyError::Unknown(name.to_string())),
                Some(Field::Computed(_)) => {
                    tracing::debug!(property = name, "refused write to read-only property");
                    return Err(PropertyError::ReadOnly(name.to_string()));
                }
                Some(Field::Reactive(boxed)) => match boxed.downcast_ref::<ReactiveCell<T>>() {
                    Some(cell) => cell.clone(),
                    None => return Err(PropertyError::TypeMismatch(name.to_string())),
                },
            }
        };

        cell.set(value);
        Ok(())
    }
}

impl Default for ReactiveObject {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReactiveObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveObject")
            .field("properties", &self.fields.borrow().len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
