//! # inspectable - Inspect and Modify Values Functionally
//!
//! A small value-transformation library:
//! - **Identity values** modified by an ordered chain of transformations
//! - **Priority-ordered** transformations that can be toggled on and off
//! - **Change detection** with identity-changed and value-changed callbacks
//! - **Scoped attachments** that detach themselves when dropped
//!
//! ## Core Concepts
//!
//! ### Value Pipeline
//!
//! ```text
//! [identity] → [Transformation (highest priority)] → ... → [cached value]
//! ```
//!
//! 1. **Identity** is the base value set by its owner
//! 2. **Transformations** are folded over a copy of the identity, highest
//!    priority first, ties in attachment order; disabled ones are skipped
//! 3. The result is **cached** until the next forced update, and
//!    value-changed callbacks fire only when it differs from the last one
//!
//! Modifiers don't need to know about each other or about the value they
//! modify. Recomputation is opt-in: attaching, toggling or replacing the
//! identity only recompute when asked to.
//!
//! ## Example
//!
//! ```rust
//! use inspectable::{Inspectable, ScopedTransformation, TransformFn, Transformation, MIN_PRIORITY};
//!
//! let speed = Inspectable::new(5.0);
//! let mud_trap = Transformation::from_fn(|v: &mut f64| *v -= 1.0);
//! let power_pill = Transformation::from_fn(|v: &mut f64| *v *= 1.5);
//!
//! // Trap first, then pill: (5 - 1) * 1.5
//! speed.add_transformation(&mud_trap, false);
//! speed.add_transformation(&power_pill, true);
//! assert_eq!(speed.get_value(false), 6.0);
//!
//! // Pill gets a higher priority: 5 * 1.5 - 1
//! power_pill.set(TransformFn::new(|v: &mut f64| *v *= 1.5), 1, true);
//! assert_eq!(speed.get_value(true), 6.5);
//!
//! // A scoped buff lasts until the end of its scope
//! {
//!     let _haste = ScopedTransformation::new(
//!         &speed,
//!         TransformFn::new(|v: &mut f64| *v += 2.0),
//!         MIN_PRIORITY,
//!         true,
//!         true,
//!     )
//!     .with_update_on_destroy(true);
//!     assert_eq!(speed.get_value(false), 8.5);
//! }
//! assert_eq!(speed.get_value(false), 6.5);
//! ```
//!
//! ## Modules
//!
//! - [`transformation`] - Transform functions and transformations
//! - [`inspectable`] - Inspectable values and change callbacks
//! - [`scoped`] - Scoped transformations and callbacks
//! - [`modifier`] - Declarative numeric modifiers
//! - [`numeric`] - Numeric value types usable with modifiers
//! - [`aliases`] - Per-type aliases
//! - [`error`] - Error types

pub mod aliases;
pub mod error;
pub mod inspectable;
pub mod modifier;
pub mod numeric;
pub mod scoped;
pub mod transformation;

// Re-export main types for convenience
pub use error::InspectError;
pub use inspectable::{ChangeFn, Inspectable};
pub use scoped::{ScopedIdentityChangedFn, ScopedTransformation, ScopedValueChangedFn};
pub use transformation::{
    TransformFn, Transformation, INVALID_PRIORITY, MAX_PRIORITY, MIN_PRIORITY,
};

// Re-export modifier types
pub use modifier::{Modifier, ModifierSpec};
pub use numeric::Numeric;
