//! Error types for the overlay merge engine.

use crate::value::Kind;
use thiserror::Error;

/// Merge failures. All variants are returned as values and propagate up the
/// recursive walk by early return; the engine never panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// A top-level argument was not a non-null reference. Raised before any
    /// mutation, so the destination is guaranteed untouched.
    #[error("the value sent is not a reference")]
    NotAPointer,

    /// Origin and destination report different kinds at some depth. Fields
    /// visited earlier in declaration order may already have been mutated.
    #[error("types: {origin} and {destination} are not equal")]
    TypeMismatch { origin: Kind, destination: Kind },

    /// A kind with no merge rule was encountered; carries the host type name.
    #[error("unsupported kind: {0}")]
    UnsupportedKind(String),
}
