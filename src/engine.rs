//! Recursive merge engine: kind dispatch and policy application.
//!
//! The engine walks origin and destination in lock-step and copies "present"
//! origin nodes over destination nodes, where presence is the non-zero rule of
//! [`Value::is_zero`] adjusted by the [`MergePolicy`] switches. Structures
//! recurse field-by-field, references recurse or adopt depending on
//! destination nullness, maps merge right-biased, and sequences replace
//! wholesale.

use crate::error::MergeError;
use crate::policy::MergePolicy;
use crate::value::{Kind, StructValue, Value};
use indexmap::IndexMap;
use tracing::{instrument, trace};

/// Merge `origin` into `destination` under `policy`.
///
/// Both arguments must be non-null references ([`Value::Ref`]) to values of
/// the same shape; anything else fails with [`MergeError::NotAPointer`] before
/// the destination is touched. On success the destination's referent has been
/// mutated in place; the origin is never mutated.
///
/// A mid-walk failure ([`MergeError::TypeMismatch`] or
/// [`MergeError::UnsupportedKind`]) leaves fields visited earlier in
/// declaration order already merged; there is no rollback.
#[instrument(level = "trace", skip_all)]
pub fn substitute(
    origin: &Value,
    destination: &mut Value,
    policy: &MergePolicy,
) -> Result<(), MergeError> {
    let (Value::Ref(Some(origin_inner)), Value::Ref(Some(dest_inner))) = (origin, destination)
    else {
        return Err(MergeError::NotAPointer);
    };
    substitute_value(origin_inner, dest_inner, policy)
}

/// [`substitute`] with the default policy: `false` booleans are absent,
/// non-zero origin always overwrites, maps merge key-by-key.
pub fn substitute_default(origin: &Value, destination: &mut Value) -> Result<(), MergeError> {
    substitute(origin, destination, &MergePolicy::default())
}

/// Presence test for scalar kinds. Booleans follow the `allow_false_booleans`
/// switch instead of the zero-value rule and ignore
/// `skip_if_destination_nonzero`.
fn scalar_present(origin: &Value, destination: &Value, policy: &MergePolicy) -> bool {
    let origin_set = !origin.is_zero();
    if origin.kind() == Kind::Bool {
        return origin_set || policy.allow_false_booleans;
    }
    origin_set && !(policy.skip_if_destination_nonzero && !destination.is_zero())
}

fn substitute_value(
    origin: &Value,
    destination: &mut Value,
    policy: &MergePolicy,
) -> Result<(), MergeError> {
    if origin.kind() != destination.kind() {
        return Err(MergeError::TypeMismatch {
            origin: origin.kind(),
            destination: destination.kind(),
        });
    }
    match (origin, destination) {
        (Value::Opaque(type_name), _) => {
            return Err(MergeError::UnsupportedKind(type_name.clone()));
        }

        // Callable handles are never copied.
        (Value::Func(_), _) => {}

        (
            Value::String(_)
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Uint(_)
            | Value::Float(_)
            | Value::Complex(_),
            dest,
        ) => {
            if scalar_present(origin, dest, policy) {
                trace!(kind = %origin.kind(), "copying scalar");
                *dest = origin.clone();
            }
        }

        (Value::Chan(handle), dest) => {
            if handle.is_some() {
                *dest = origin.clone();
            }
        }

        // Sequences replace wholesale; a nil or empty origin is absent.
        (Value::Slice(items), dest) => {
            if items.as_ref().is_some_and(|items| !items.is_empty()) {
                *dest = origin.clone();
            }
        }

        (Value::Array(items), dest) => {
            if !origin.is_zero() && !items.is_empty() {
                *dest = origin.clone();
            }
        }

        (Value::Map(entries), Value::Map(dest_entries)) => {
            if policy.replace_maps_wholesale {
                // Wholesale replacement keys off nil-ness, not length: an
                // empty non-nil origin map still replaces.
                if let Some(entries) = entries {
                    trace!(len = entries.len(), "replacing map wholesale");
                    *dest_entries = Some(entries.clone());
                }
            } else if let Some(entries) = entries.as_ref().filter(|m| !m.is_empty()) {
                let merged = dest_entries.get_or_insert_with(IndexMap::new);
                for (key, value) in entries {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        (Value::Struct(orig_struct), Value::Struct(dest_struct)) => {
            substitute_struct(orig_struct, dest_struct, policy)?;
        }

        (Value::Ref(referent), Value::Ref(dest_ref)) => {
            if let Some(orig_inner) = referent {
                match dest_ref {
                    Some(dest_inner) => substitute_value(orig_inner, dest_inner, policy)?,
                    // Null destination adopts the origin's referent directly.
                    None => *dest_ref = Some(orig_inner.clone()),
                }
            }
        }

        // Unreachable once kinds match, kept as an error rather than a panic.
        (origin, destination) => {
            return Err(MergeError::TypeMismatch {
                origin: origin.kind(),
                destination: destination.kind(),
            });
        }
    }
    Ok(())
}

/// Field-by-field merge in declaration order. The first failing field aborts
/// the walk; earlier fields stay merged.
fn substitute_struct(
    origin: &StructValue,
    destination: &mut StructValue,
    policy: &MergePolicy,
) -> Result<(), MergeError> {
    if origin.fields.len() != destination.fields.len() {
        return Err(MergeError::TypeMismatch {
            origin: Kind::Struct,
            destination: Kind::Struct,
        });
    }
    for (orig_field, dest_field) in origin.fields.iter().zip(destination.fields.iter_mut()) {
        substitute_value(&orig_field.value, &mut dest_field.value, policy)?;
    }
    Ok(())
}
