// ============================================================================
// ripple-cells - A Minimal Reactive Dependency-Tracking Core
// ============================================================================
//
// Observed storage cells, derived computed values, and the tracker that
// wires them together. Dependencies are discovered by running computations
// under the tracker and recording which cells they read; writes propagate
// to subscribers synchronously, before the write returns.
// ============================================================================

pub mod core;
pub mod macros;
pub mod primitives;

// Re-export core items at crate root for ergonomic access
pub use core::tracker::DependencyTracker;
pub use core::types::{never_equals, partial_eq_equals, AnyCell, AnyComputation, EqualsFn};

// Re-export primitives at crate root
pub use primitives::cell::ReactiveCell;
pub use primitives::computed::ComputedCell;
pub use primitives::object::{PropertyError, ReactiveObject};

// =============================================================================
// TESTS
// =============================================================================
