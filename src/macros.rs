// ============================================================================
// ripple-cells - Ergonomic Macros
// ============================================================================

/// Helper macro to clone variables into a move closure.
///
/// This reduces the boilerplate of manually cloning `Rc` or cell handles
/// before moving them into a compute function or change callback.
///
/// # Usage
///
/// ```rust
/// use ripple_cells::{cloned, ComputedCell, DependencyTracker, ReactiveCell};
///
/// let tracker = DependencyTracker::new();
/// let a = ReactiveCell::new(&tracker, 1);
/// let b = ReactiveCell::new(&tracker, 2);
///
/// // Use:
/// let sum = ComputedCell::new(
///     &tracker,
///     cloned!(a, b => move || a.get() + b.get()),
///     |_| {},
/// );
/// assert_eq!(sum.read(), 3);
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}
