// ============================================================================
// ripple-cells - Computed Cell
// Derived, read-only values recomputed from other cells
// ============================================================================
//
// A computed cell binds a pure compute function and a change callback. Every
// read evaluates the compute function fresh - there is no cached value and
// no dirty flag. Before each evaluation the cell drops the subscriptions it
// recorded last time and re-subscribes based on what the compute function
// actually reads, so a shrinking read set never leaves stale notifications
// behind.
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::core::tracker::DependencyTracker;
use crate::core::types::{AnyCell, AnyComputation};

// =============================================================================
// COMPUTED INNER
// =============================================================================

/// The internal data for a computed cell.
///
/// Implements `AnyComputation`: its `Rc` allocation is the stable handle
/// that appears in dependency cells' subscriber sets for the life of the
/// computed cell.
pub struct ComputedInner<T> {
    /// The pure computation over other cells.
    compute: Box<dyn Fn() -> T>,

    /// Side-effecting callback invoked with each recomputed value on a
    /// triggering dependency write.
    on_change: RefCell<Box<dyn FnMut(&T)>>,

    /// Cells read during the last evaluation (for stale-subscription
    /// cleanup before the next one).
    deps: RefCell<Vec<Rc<dyn AnyCell>>>,

    /// The tracker evaluations run on.
    tracker: Rc<DependencyTracker>,

    /// Weak self-reference so `&self` methods can hand out the handle.
    /// Set immediately after construction.
    self_ref: RefCell<Weak<ComputedInner<T>>>,
}

impl<T: 'static> ComputedInner<T> {
    fn new(
        tracker: Rc<DependencyTracker>,
        compute: Box<dyn Fn() -> T>,
        on_change: Box<dyn FnMut(&T)>,
    ) -> Rc<Self> {
        let inner = Rc::new(Self {
            compute,
            on_change: RefCell::new(on_change),
            deps: RefCell::new(Vec::new()),
            tracker,
            self_ref: RefCell::new(Weak::new()),
        });

        *inner.self_ref.borrow_mut() = Rc::downgrade(&inner);

        inner
    }

    /// The computation handle backing this cell.
    fn handle(&self) -> Rc<dyn AnyComputation> {
        let rc = self
            .self_ref
            .borrow()
            .upgrade()
            .expect("computed cell alive while its handle is in use");
        rc as Rc<dyn AnyComputation>
    }

    /// Evaluate the compute function fresh under tracking.
    ///
    /// Clears the previous read set first, then re-records dependencies as
    /// the compute function reads cells. Both explicit reads and
    /// write-triggered recomputes go through here.
    fn evaluate(&self) -> T {
        let handle = self.handle();
        handle.clear_dependencies();

        tracing::trace!("evaluating computed cell");
        self.tracker
            .run_tracked(Rc::downgrade(&handle), || (self.compute)())
    }
}

impl<T: 'static> AnyComputation for ComputedInner<T> {
    fn notify(&self) {
        let value = self.evaluate();
        tracing::trace!("computed cell recomputed, invoking change callback");
        (self.on_change.borrow_mut())(&value);
    }

    fn dependency_count(&self) -> usize {
        self.deps.borrow().len()
    }

    fn record_dependency(&self, cell: Rc<dyn AnyCell>) {
        let mut deps = self.deps.borrow_mut();
        let ptr = Rc::as_ptr(&cell) as *const ();
        let already = deps.iter().any(|d| Rc::as_ptr(d) as *const () == ptr);
        if !already {
            deps.push(cell);
        }
    }

    fn clear_dependencies(&self) {
        let this = match self.self_ref.borrow().upgrade() {
            Some(rc) => rc as Rc<dyn AnyComputation>,
            None => return,
        };

        // Drain before unsubscribing so the deps borrow is released.
        let old: Vec<Rc<dyn AnyCell>> = self.deps.borrow_mut().drain(..).collect();
        for cell in old {
            cell.unsubscribe(&this);
        }
    }
}

// =============================================================================
// COMPUTED CELL
// =============================================================================

/// A derived, read-only reactive value.
///
/// Reading evaluates the compute function fresh and re-establishes the
/// dependency subscriptions for exactly the cells it touched. When any of
/// those cells is later written, the computed cell recomputes and invokes
/// its change callback with the fresh value - unconditionally, even when
/// the recomputed value is unchanged.
///
/// There is no write operation: the type has no `set`, and writing the
/// property through a [`ReactiveObject`](crate::ReactiveObject) is refused
/// with [`PropertyError::ReadOnly`](crate::PropertyError::ReadOnly).
///
/// # Example
///
/// ```
/// use ripple_cells::{ComputedCell, DependencyTracker, ReactiveCell};
///
/// let tracker = DependencyTracker::new();
/// let age = ReactiveCell::new(&tracker, 16);
///
/// let status = ComputedCell::new(
///     &tracker,
///     {
///         let age = age.clone();
///         move || if age.get() > 18 { "Adult" } else { "Minor" }
///     },
///     |_status| {},
/// );
///
/// assert_eq!(status.read(), "Minor");
/// age.set(22);
/// assert_eq!(status.read(), "Adult");
/// ```
pub struct ComputedCell<T> {
    inner: Rc<ComputedInner<T>>,
}

impl<T> Clone for ComputedCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> ComputedCell<T> {
    /// Bind a compute function and a change callback on the given tracker.
    ///
    /// The compute function must be pure over reactive cells: writing a
    /// cell from inside it re-enters propagation and can recurse without
    /// bound. The callback is not invoked at construction; the first
    /// evaluation happens on the first `read` or triggering write.
    pub fn new(
        tracker: &Rc<DependencyTracker>,
        compute: impl Fn() -> T + 'static,
        on_change: impl FnMut(&T) + 'static,
    ) -> Self {
        Self {
            inner: ComputedInner::new(tracker.clone(), Box::new(compute), Box::new(on_change)),
        }
    }

    /// Evaluate and return the current value.
    ///
    /// Always runs the compute function - no caching across reads - and
    /// rebuilds this cell's subscriptions from the reads it performs. The
    /// change callback is not invoked by reads.
    pub fn read(&self) -> T {
        self.inner.evaluate()
    }

    /// Number of cells this computed currently depends on (as of its last
    /// evaluation).
    pub fn dependency_count(&self) -> usize {
        self.inner.dependency_count()
    }

    /// The computation handle used in subscriber sets (for tests and
    /// diagnostics).
    pub fn as_computation(&self) -> Rc<dyn AnyComputation> {
        self.inner.clone()
    }
}

impl<T: 'static> std::fmt::Debug for ComputedCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputedCell")
            .field("dependencies", &self.dependency_count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
