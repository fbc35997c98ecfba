// ============================================================================
// ripple-cells - Dependency Tracker
// Records which computation is currently reading cells
// ============================================================================
//
// The tracker is an explicit instance, not a process-wide singleton: every
// cell receives an Rc<DependencyTracker> at construction, and cells only
// wire up to computations running on the same tracker. Tracked evaluations
// nest, so the active computation lives on a stack rather than in a single
// slot - an inner evaluation pushes on entry and pops on exit, and the
// outer computation's reads track correctly again once control returns.
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::types::AnyComputation;

/// Tracks the stack of computations currently reading cells.
///
/// Reading a `ReactiveCell` while a computation is active on its tracker
/// subscribes that computation to the cell. The tracker itself holds only
/// weak handles; it never keeps a computation alive.
///
/// # Example
///
/// ```
/// use ripple_cells::DependencyTracker;
///
/// let tracker = DependencyTracker::new();
/// assert!(!tracker.is_tracking());
/// ```
pub struct DependencyTracker {
    /// Active computations, innermost last.
    stack: RefCell<Vec<Weak<dyn AnyComputation>>>,
}

impl DependencyTracker {
    /// Create a new tracker.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            stack: RefCell::new(Vec::new()),
        })
    }

    /// Run `body` with `handle` as the active computation.
    ///
    /// The handle is pushed before `body` runs and popped on every exit
    /// path, including an unwinding panic, so the stack never retains a
    /// computation past its evaluation.
    pub fn run_tracked<R>(&self, handle: Weak<dyn AnyComputation>, body: impl FnOnce() -> R) -> R {
        self.stack.borrow_mut().push(handle);
        tracing::trace!(depth = self.depth(), "entered tracked evaluation");

        struct PopGuard<'a> {
            tracker: &'a DependencyTracker,
        }

        impl Drop for PopGuard<'_> {
            fn drop(&mut self) {
                self.tracker.stack.borrow_mut().pop();
                tracing::trace!(depth = self.tracker.depth(), "left tracked evaluation");
            }
        }

        let _guard = PopGuard { tracker: self };
        body()
    }

    /// The innermost active computation, if any.
    ///
    /// Only the top of the stack subscribes during reads; an outer
    /// computation resumes tracking once the inner evaluation pops.
    pub fn active(&self) -> Option<Rc<dyn AnyComputation>> {
        self.stack.borrow().last().and_then(Weak::upgrade)
    }

    /// Whether any tracked evaluation is currently running.
    pub fn is_tracking(&self) -> bool {
        self.active().is_some()
    }

    /// Current nesting depth of tracked evaluations.
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubComputation;

    impl AnyComputation for StubComputation {
        fn notify(&self) {}

        fn dependency_count(&self) -> usize {
            0
        }

        fn record_dependency(&self, _cell: Rc<dyn crate::core::types::AnyCell>) {}

        fn clear_dependencies(&self) {}
    }

    fn stub() -> Rc<dyn AnyComputation> {
        Rc::new(StubComputation)
    }

    #[test]
    fn starts_idle() {
        let tracker = DependencyTracker::new();
        assert!(!tracker.is_tracking());
        assert!(tracker.active().is_none());
        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn run_tracked_activates_and_restores() {
        let tracker = DependencyTracker::new();
        let computation = stub();

        let result = tracker.run_tracked(Rc::downgrade(&computation), || {
            assert!(tracker.is_tracking());
            assert_eq!(tracker.depth(), 1);
            42
        });

        assert_eq!(result, 42);
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn nested_evaluations_compose() {
        let tracker = DependencyTracker::new();
        let outer = stub();
        let inner = stub();

        tracker.run_tracked(Rc::downgrade(&outer), || {
            let active = tracker.active().unwrap();
            assert!(Rc::ptr_eq(&active, &outer));

            tracker.run_tracked(Rc::downgrade(&inner), || {
                let active = tracker.active().unwrap();
                assert!(Rc::ptr_eq(&active, &inner));
                assert_eq!(tracker.depth(), 2);
            });

            // Outer is active again after the inner evaluation pops.
            let active = tracker.active().unwrap();
            assert!(Rc::ptr_eq(&active, &outer));
            assert_eq!(tracker.depth(), 1);
        });

        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn panic_in_body_still_pops() {
        let tracker = DependencyTracker::new();
        let computation = stub();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            tracker.run_tracked(Rc::downgrade(&computation), || {
                panic!("boom");
            })
        }));

        assert!(result.is_err());
        assert_eq!(tracker.depth(), 0);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn dropped_computation_yields_no_active() {
        let tracker = DependencyTracker::new();
        let weak = {
            let computation = stub();
            Rc::downgrade(&computation)
        };

        tracker.run_tracked(weak, || {
            // Handle is dead, so nothing is considered active.
            assert!(tracker.active().is_none());
            assert!(!tracker.is_tracking());
            assert_eq!(tracker.depth(), 1);
        });
    }

    #[test]
    fn tracked_body_can_reenter_tracker_state() {
        let tracker = DependencyTracker::new();
        let computation = stub();
        let depths = RefCell::new(Vec::new());

        tracker.run_tracked(Rc::downgrade(&computation), || {
            depths.borrow_mut().push(tracker.depth());
            tracker.run_tracked(Rc::downgrade(&computation), || {
                depths.borrow_mut().push(tracker.depth());
            });
            depths.borrow_mut().push(tracker.depth());
        });

        assert_eq!(*depths.borrow(), vec![1, 2, 1]);
    }
}
