// ============================================================================
// ripple-cells - Primitives Module
// The reactive primitives: cell, computed, and the host object boundary
// ============================================================================

pub mod cell;
pub mod computed;
pub mod object;

// Re-export for convenience
pub use cell::ReactiveCell;
pub use computed::ComputedCell;
pub use object::{PropertyError, ReactiveObject};
