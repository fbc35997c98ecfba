// ============================================================================
// ripple-cells - Reactive Cell
// Writable observed storage with implicit subscription on tracked reads
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::core::tracker::DependencyTracker;
use crate::core::types::{
    never_equals, same_computation, weak_is_computation, AnyCell, AnyComputation, EqualsFn,
};

// =============================================================================
// CELL INNER
// =============================================================================

/// The internal data for a reactive cell.
///
/// Separate from `ReactiveCell<T>` so it can implement `AnyCell` and be
/// stored as `Rc<dyn AnyCell>` in a computation's dependency list.
pub struct CellInner<T> {
    /// The current value. Reading never mutates it; only `set` does.
    value: RefCell<T>,

    /// Subscribed computations, in subscription order (weak refs so a cell
    /// never keeps a dropped computation alive).
    subscribers: RefCell<Vec<Weak<dyn AnyComputation>>>,

    /// Equality function deciding whether a write is a change.
    equals: EqualsFn<T>,

    /// The tracker this cell wires subscriptions through.
    tracker: Rc<DependencyTracker>,
}

impl<T: 'static> CellInner<T> {
    fn new(tracker: Rc<DependencyTracker>, value: T, equals: EqualsFn<T>) -> Self {
        Self {
            value: RefCell::new(value),
            subscribers: RefCell::new(Vec::new()),
            equals,
            tracker,
        }
    }

    /// Notify every current subscriber, synchronously and in subscription
    /// order. Each notification runs the subscriber's recompute to
    /// completion before the next one starts; a panicking subscriber
    /// unwinds out of the triggering `set` and the remaining subscribers
    /// are not notified.
    ///
    /// # Borrow safety
    /// Subscribers are collected into a Vec first, releasing the borrow on
    /// the list - a notified computation re-subscribing (or unsubscribing
    /// during stale cleanup) to this very cell must not hit a RefCell
    /// conflict.
    fn notify_subscribers(&self) {
        self.prune_dead_subscribers();

        let subscribers: Vec<Rc<dyn AnyComputation>> = self
            .subscribers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();

        tracing::trace!(count = subscribers.len(), "propagating cell write");

        for computation in subscribers {
            computation.notify();
        }
    }
}

impl<T: 'static> AnyCell for CellInner<T> {
    fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    fn subscribe(&self, computation: &Rc<dyn AnyComputation>) {
        let mut subscribers = self.subscribers.borrow_mut();
        let already = subscribers
            .iter()
            .any(|w| weak_is_computation(w, computation));
        if !already {
            subscribers.push(Rc::downgrade(computation));
            tracing::trace!(total = subscribers.len(), "subscribed computation");
        }
    }

    fn unsubscribe(&self, computation: &Rc<dyn AnyComputation>) {
        self.subscribers.borrow_mut().retain(|weak| {
            match weak.upgrade() {
                Some(rc) => !same_computation(&rc, computation),
                // Remove dead entries while we're at it
                None => false,
            }
        });
    }

    fn has_subscriber(&self, computation: &Rc<dyn AnyComputation>) -> bool {
        self.subscribers
            .borrow()
            .iter()
            .any(|w| weak_is_computation(w, computation))
    }

    fn prune_dead_subscribers(&self) {
        self.subscribers
            .borrow_mut()
            .retain(|w| w.strong_count() > 0);
    }
}

// =============================================================================
// REACTIVE CELL
// =============================================================================

/// A single mutable value whose reads and writes are observed.
///
/// Reading the cell while a computation is active on its tracker records
/// the cell as a dependency of that computation. Writing the cell
/// synchronously re-runs every subscribed computation before `set` returns.
///
/// By default every write fires, even when the new value equals the old
/// one; `with_equality` opts into short-circuiting.
///
/// # Example
///
/// ```
/// use ripple_cells::{DependencyTracker, ReactiveCell};
///
/// let tracker = DependencyTracker::new();
/// let age = ReactiveCell::new(&tracker, 25);
/// assert_eq!(age.get(), 25);
///
/// age.set(26);
/// assert_eq!(age.get(), 26);
/// ```
pub struct ReactiveCell<T> {
    inner: Rc<CellInner<T>>,
}

impl<T> Clone for ReactiveCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> ReactiveCell<T> {
    /// Create a cell with the baseline write contract: every `set` stores
    /// and notifies unconditionally.
    pub fn new(tracker: &Rc<DependencyTracker>, value: T) -> Self {
        Self::with_equality(tracker, value, never_equals)
    }

    /// Create a cell with a custom equality function. When the function
    /// reports the incoming value as equal to the current one, the write is
    /// dropped: no store, no notification.
    pub fn with_equality(tracker: &Rc<DependencyTracker>, value: T, equals: EqualsFn<T>) -> Self {
        Self {
            inner: Rc::new(CellInner::new(tracker.clone(), value, equals)),
        }
    }

    /// If a computation is active on this cell's tracker, subscribe it and
    /// record the reverse edge on the computation.
    fn track_read(&self) {
        if let Some(computation) = self.inner.tracker.active() {
            self.inner.subscribe(&computation);
            computation.record_dependency(self.inner.clone() as Rc<dyn AnyCell>);
        }
    }

    /// Get the current value (cloning).
    ///
    /// Inside a tracked evaluation this registers the cell as a dependency.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.track_read();
        self.inner.value.borrow().clone()
    }

    /// Access the current value with a closure (avoids cloning), with the
    /// same dependency registration as `get`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track_read();
        f(&self.inner.value.borrow())
    }

    /// Read the current value without registering a dependency.
    pub fn peek(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Set the cell's value and synchronously notify every subscriber.
    ///
    /// Propagation is depth-first: each subscriber's recompute and change
    /// callback run to completion before `set` returns. An error raised by
    /// a subscriber is not isolated - it unwinds to the caller of `set` and
    /// aborts the remaining notifications.
    pub fn set(&self, value: T) {
        let changed = {
            let current = self.inner.value.borrow();
            !(self.inner.equals)(&current, &value)
        };

        if !changed {
            return;
        }

        *self.inner.value.borrow_mut() = value;
        self.inner.notify_subscribers();
    }

    /// Update the value in place, then notify subscribers.
    ///
    /// In-place mutation bypasses the equality function: subscribers are
    /// always notified, matching the baseline always-fire contract.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut current = self.inner.value.borrow_mut();
            f(&mut current);
        }
        self.inner.notify_subscribers();
    }

    /// Number of live subscribers (for tests and diagnostics).
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriber_count()
    }

    /// The cell as a type-erased graph node.
    pub fn as_any_cell(&self) -> Rc<dyn AnyCell> {
        self.inner.clone()
    }
}

impl<T: std::fmt::Debug + Clone + 'static> std::fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("value", &self.peek())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
