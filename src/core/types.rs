// ============================================================================
// ripple-cells - Type Definitions
// Type-erased traits for the dependency graph
// ============================================================================

use std::any::Any;
use std::rc::{Rc, Weak};

// =============================================================================
// TYPE-ERASED TRAITS
// =============================================================================
//
// These traits enable heterogeneous storage in the dependency graph.
// Graph operations (subscribe, unsubscribe, notify) don't need to know the
// value type T - only reading and writing values does. So a cell holding an
// i64 and a cell holding a String can sit behind the same Rc<dyn AnyCell>,
// and a computation over either can be invoked through Rc<dyn AnyComputation>.
//
// The concrete ReactiveCell<T> and ComputedCell<T> types hold the actual
// values and implement these traits for graph operations.
// =============================================================================

/// Type-erased interface for an observable cell.
///
/// A cell owns an ordered set of subscribers: computations that read it
/// while active on a tracker and must re-run when it is written.
/// Membership is unique (pointer identity); insertion order is preserved,
/// which fixes the notification order.
pub trait AnyCell: Any {
    /// Number of live subscribers.
    fn subscriber_count(&self) -> usize;

    /// Add a subscriber if it is not already present.
    ///
    /// Identity is the pointer of the computation's allocation, so the same
    /// computation reading the cell twice subscribes once.
    fn subscribe(&self, computation: &Rc<dyn AnyComputation>);

    /// Remove a specific subscriber. Dead (dropped) entries encountered
    /// along the way are pruned as well.
    fn unsubscribe(&self, computation: &Rc<dyn AnyComputation>);

    /// Check whether a computation is currently subscribed.
    fn has_subscriber(&self, computation: &Rc<dyn AnyComputation>) -> bool;

    /// Drop subscribers whose computations have been deallocated.
    fn prune_dead_subscribers(&self);
}

/// Type-erased handle for a computation that depends on cells.
///
/// Implemented by `ComputedInner<T>`. A computation records the cells it
/// read during its last evaluation so that a re-evaluation can first remove
/// itself from all of them and re-subscribe from scratch - stale reads from
/// a previous run never keep notifying.
pub trait AnyComputation: Any {
    /// Re-run the computation in response to a dependency write and deliver
    /// the freshly computed value to its change callback.
    fn notify(&self);

    /// Number of cells recorded as dependencies by the last evaluation.
    fn dependency_count(&self) -> usize;

    /// Record a cell this computation just read. Duplicate records of the
    /// same cell within one evaluation are ignored.
    fn record_dependency(&self, cell: Rc<dyn AnyCell>);

    /// Unsubscribe this computation from every recorded cell and forget
    /// them. Called at the start of each evaluation.
    fn clear_dependencies(&self);
}

/// Compare two trait-object Rcs by allocation identity.
pub(crate) fn same_computation(a: &Rc<dyn AnyComputation>, b: &Rc<dyn AnyComputation>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

/// Upgrade a weak subscriber entry and compare it to a computation.
pub(crate) fn weak_is_computation(
    weak: &Weak<dyn AnyComputation>,
    computation: &Rc<dyn AnyComputation>,
) -> bool {
    weak.upgrade()
        .is_some_and(|rc| same_computation(&rc, computation))
}

// =============================================================================
// EQUALITY
// =============================================================================

/// Equality function type for deciding whether a write changed a cell.
pub type EqualsFn<T> = fn(&T, &T) -> bool;

/// The baseline contract: no two values are ever considered equal, so every
/// write stores and notifies, even when the new value equals the old one.
pub fn never_equals<T>(_: &T, _: &T) -> bool {
    false
}

/// Opt-in short-circuiting: writes of an equal value neither store nor
/// notify. Pass to `ReactiveCell::with_equality` as a hardening.
pub fn partial_eq_equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

// =============================================================================
// TESTS
// =============================================================================
