//! Error types for inspectable values.
//!
//! Registration and recomputation are infallible by contract: absent or
//! empty inputs are silently ignored. The errors here cover the two places
//! where a caller can ask for a verdict: a guarded recomputation
//! (`Inspectable::try_force_update`) and declarative modifier loading.

use thiserror::Error;

/// Errors reported by inspectable values and modifier specs.
///
/// # Examples
///
/// ```rust
/// use inspectable::InspectError;
///
/// let err = InspectError::InvalidModifier {
///     name: "haste".to_string(),
///     reason: "factor is not finite".to_string(),
/// };
/// assert_eq!(err.to_string(), "Invalid modifier haste: factor is not finite");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InspectError {
    /// A recomputation was requested while transformation functions of the
    /// same inspectable were still being folded.
    #[error("Re-entrant update rejected: transformations are already being applied")]
    ReentrantUpdate,

    /// A modifier spec carries a value that cannot be applied.
    #[error("Invalid modifier {name}: {reason}")]
    InvalidModifier { name: String, reason: String },

    /// A modifier spec uses the priority reserved for "unset".
    #[error("Modifier {0} uses the reserved invalid priority")]
    ReservedPriority(String),

    /// Modifier configuration could not be parsed.
    #[error("Invalid modifier configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for InspectError {
    fn from(err: serde_json::Error) -> Self {
        InspectError::Config(err.to_string())
    }
}
