// ============================================================================
// ripple-cells - Core Module
// Type-erased graph traits and the dependency tracker
// ============================================================================

pub mod tracker;
pub mod types;

// Re-export commonly used items
pub use tracker::DependencyTracker;
pub use types::{never_equals, partial_eq_equals, AnyCell, AnyComputation, EqualsFn};
