//! Overlay: Structural Merge of Same-Shaped Value Trees
//!
//! Copies "present" (non-zero) fields of an origin value onto a destination
//! value of the same shape, recursing through structures, references, and
//! maps. Useful for "apply defaults" and "overlay configuration" semantics: a
//! partially-specified value fills in or overrides a fuller one without
//! per-type merge code.
//!
//! Values are represented as [`Value`] mirror trees; [`substitute`] merges one
//! tree into another under a [`MergePolicy`], and the [`Reflect`] trait plus
//! [`overlay`] lift the same operation to host types.
//!
//! ```
//! use overlay::{substitute_default, Value};
//!
//! let origin = Value::reference(Value::map([("a", Value::from("1"))]));
//! let mut dest = Value::reference(Value::map([("b", Value::from("2"))]));
//!
//! substitute_default(&origin, &mut dest).unwrap();
//!
//! let expected = Value::reference(Value::map([
//!     ("b", Value::from("2")),
//!     ("a", Value::from("1")),
//! ]));
//! assert_eq!(dest, expected);
//! ```

pub mod engine;
pub mod error;
pub mod policy;
pub mod reflect;
pub mod value;

pub use engine::{substitute, substitute_default};
pub use error::MergeError;
pub use policy::MergePolicy;
pub use reflect::{overlay, overlay_default, Reflect};
pub use value::{Complex, FieldValue, HandleId, Kind, StructValue, Value};
