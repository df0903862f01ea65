//! Typed overlay surface.
//!
//! [`Reflect`] is the capability interface a host type implements to become
//! mergeable without per-call boilerplate: it produces the mirror tree the
//! engine walks and writes a merged tree back into the host value. Impls for
//! the primitive scalars and the common containers are provided here; struct
//! types implement the trait by listing their fields in declaration order.

use crate::engine::substitute;
use crate::error::MergeError;
use crate::policy::MergePolicy;
use crate::value::{Kind, Value};
use indexmap::IndexMap;

/// Maps a host type onto the mirror tree and back.
pub trait Reflect {
    /// Mirror representation of `self`.
    fn reflect(&self) -> Value;

    /// Write a merged mirror tree back into `self`. Fails with
    /// [`MergeError::TypeMismatch`] when the tree's shape does not match.
    fn absorb(&mut self, value: &Value) -> Result<(), MergeError>;
}

/// Merge `origin` into `destination` through their mirror representations.
///
/// Reflects both sides, runs [`substitute`], and absorbs the merged tree back
/// into `destination`. The origin value is never mutated.
pub fn overlay<T: Reflect>(
    origin: &T,
    destination: &mut T,
    policy: &MergePolicy,
) -> Result<(), MergeError> {
    let origin_tree = Value::reference(origin.reflect());
    let mut dest_tree = Value::reference(destination.reflect());
    substitute(&origin_tree, &mut dest_tree, policy)?;
    let Value::Ref(Some(merged)) = dest_tree else {
        return Err(MergeError::NotAPointer);
    };
    destination.absorb(&merged)
}

/// [`overlay`] with the default policy.
pub fn overlay_default<T: Reflect>(origin: &T, destination: &mut T) -> Result<(), MergeError> {
    overlay(origin, destination, &MergePolicy::default())
}

macro_rules! impl_scalar_reflect {
    ($host:ty, $variant:ident, $kind:expr) => {
        impl Reflect for $host {
            fn reflect(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn absorb(&mut self, value: &Value) -> Result<(), MergeError> {
                match value {
                    Value::$variant(v) => {
                        *self = v.clone();
                        Ok(())
                    }
                    other => Err(MergeError::TypeMismatch {
                        origin: other.kind(),
                        destination: $kind,
                    }),
                }
            }
        }
    };
}

impl_scalar_reflect!(String, String, Kind::String);
impl_scalar_reflect!(bool, Bool, Kind::Bool);
impl_scalar_reflect!(i64, Int, Kind::Int);
impl_scalar_reflect!(u64, Uint, Kind::Uint);
impl_scalar_reflect!(f64, Float, Kind::Float);

impl<T: Reflect + Default> Reflect for Option<T> {
    fn reflect(&self) -> Value {
        Value::Ref(self.as_ref().map(|v| Box::new(v.reflect())))
    }

    fn absorb(&mut self, value: &Value) -> Result<(), MergeError> {
        match value {
            Value::Ref(None) => {
                *self = None;
                Ok(())
            }
            Value::Ref(Some(inner)) => match self {
                Some(current) => current.absorb(inner),
                None => {
                    let mut adopted = T::default();
                    adopted.absorb(inner)?;
                    *self = Some(adopted);
                    Ok(())
                }
            },
            other => Err(MergeError::TypeMismatch {
                origin: other.kind(),
                destination: Kind::Ref,
            }),
        }
    }
}

impl<T: Reflect + Default> Reflect for Vec<T> {
    fn reflect(&self) -> Value {
        Value::Slice(Some(self.iter().map(Reflect::reflect).collect()))
    }

    fn absorb(&mut self, value: &Value) -> Result<(), MergeError> {
        match value {
            Value::Slice(None) => {
                self.clear();
                Ok(())
            }
            Value::Slice(Some(items)) => {
                let mut absorbed = Vec::with_capacity(items.len());
                for item in items {
                    let mut element = T::default();
                    element.absorb(item)?;
                    absorbed.push(element);
                }
                *self = absorbed;
                Ok(())
            }
            other => Err(MergeError::TypeMismatch {
                origin: other.kind(),
                destination: Kind::Slice,
            }),
        }
    }
}

impl<T: Reflect + Default> Reflect for IndexMap<String, T> {
    fn reflect(&self) -> Value {
        Value::Map(Some(
            self.iter().map(|(k, v)| (k.clone(), v.reflect())).collect(),
        ))
    }

    fn absorb(&mut self, value: &Value) -> Result<(), MergeError> {
        match value {
            Value::Map(None) => {
                self.clear();
                Ok(())
            }
            Value::Map(Some(entries)) => {
                let mut absorbed = IndexMap::with_capacity(entries.len());
                for (key, entry) in entries {
                    let mut element = T::default();
                    element.absorb(entry)?;
                    absorbed.insert(key.clone(), element);
                }
                *self = absorbed;
                Ok(())
            }
            other => Err(MergeError::TypeMismatch {
                origin: other.kind(),
                destination: Kind::Map,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct ServerConfig {
        host: String,
        port: u64,
        verbose: bool,
        tags: Vec<String>,
        limits: Option<Limits>,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Limits {
        max_connections: i64,
    }

    impl Reflect for Limits {
        fn reflect(&self) -> Value {
            Value::structure(
                "Limits",
                [FieldValue::new("max_connections", self.max_connections.reflect())],
            )
        }

        fn absorb(&mut self, value: &Value) -> Result<(), MergeError> {
            match value {
                Value::Struct(s) if s.fields.len() == 1 => {
                    self.max_connections.absorb(&s.fields[0].value)
                }
                other => Err(MergeError::TypeMismatch {
                    origin: other.kind(),
                    destination: Kind::Struct,
                }),
            }
        }
    }

    impl Reflect for ServerConfig {
        fn reflect(&self) -> Value {
            Value::structure(
                "ServerConfig",
                [
                    FieldValue::new("host", self.host.reflect()),
                    FieldValue::new("port", self.port.reflect()),
                    FieldValue::new("verbose", self.verbose.reflect()),
                    FieldValue::new("tags", self.tags.reflect()),
                    FieldValue::new("limits", self.limits.reflect()),
                ],
            )
        }

        fn absorb(&mut self, value: &Value) -> Result<(), MergeError> {
            match value {
                Value::Struct(s) if s.fields.len() == 5 => {
                    self.host.absorb(&s.fields[0].value)?;
                    self.port.absorb(&s.fields[1].value)?;
                    self.verbose.absorb(&s.fields[2].value)?;
                    self.tags.absorb(&s.fields[3].value)?;
                    self.limits.absorb(&s.fields[4].value)
                }
                other => Err(MergeError::TypeMismatch {
                    origin: other.kind(),
                    destination: Kind::Struct,
                }),
            }
        }
    }

    #[test]
    fn test_overlay_fills_unset_fields() {
        let origin = ServerConfig {
            host: "localhost".into(),
            port: 8080,
            verbose: false,
            tags: vec!["default".into()],
            limits: Some(Limits {
                max_connections: 64,
            }),
        };
        let mut dest = ServerConfig {
            host: String::new(),
            port: 9090,
            verbose: true,
            tags: Vec::new(),
            limits: None,
        };

        overlay_default(&origin, &mut dest).unwrap();

        assert_eq!(dest.host, "localhost");
        // Non-zero origin overwrites under the default policy.
        assert_eq!(dest.port, 8080);
        assert!(dest.verbose);
        assert_eq!(dest.tags, vec!["default".to_string()]);
        assert_eq!(dest.limits, Some(Limits { max_connections: 64 }));
    }

    #[test]
    fn test_overlay_skip_preserves_set_destination() {
        let origin = ServerConfig {
            host: "localhost".into(),
            port: 8080,
            ..ServerConfig::default()
        };
        let mut dest = ServerConfig {
            host: "example.com".into(),
            port: 0,
            ..ServerConfig::default()
        };

        let policy = MergePolicy::new().with_skip_if_destination_nonzero(true);
        overlay(&origin, &mut dest, &policy).unwrap();

        assert_eq!(dest.host, "example.com");
        assert_eq!(dest.port, 8080);
    }

    #[test]
    fn test_overlay_recurses_into_present_option() {
        let origin = ServerConfig {
            limits: Some(Limits {
                max_connections: 10,
            }),
            ..ServerConfig::default()
        };
        let mut dest = ServerConfig {
            limits: Some(Limits {
                max_connections: 0,
            }),
            ..ServerConfig::default()
        };

        overlay_default(&origin, &mut dest).unwrap();
        assert_eq!(dest.limits, Some(Limits { max_connections: 10 }));
    }

    #[test]
    fn test_overlay_never_mutates_origin() {
        let origin = ServerConfig {
            host: "a".into(),
            ..ServerConfig::default()
        };
        let snapshot = origin.clone();
        let mut dest = ServerConfig::default();

        overlay_default(&origin, &mut dest).unwrap();
        assert_eq!(origin, snapshot);
    }

    #[test]
    fn test_absorb_rejects_wrong_shape() {
        let mut port = 0u64;
        let err = port.absorb(&Value::from("not a port")).unwrap_err();
        assert_eq!(
            err,
            MergeError::TypeMismatch {
                origin: Kind::String,
                destination: Kind::Uint
            }
        );
    }

    #[test]
    fn test_index_map_round_trip() {
        let mut labels: IndexMap<String, String> = IndexMap::new();
        labels.insert("env".into(), "prod".into());

        let tree = labels.reflect();
        let mut restored: IndexMap<String, String> = IndexMap::new();
        restored.absorb(&tree).unwrap();
        assert_eq!(restored, labels);
    }
}
