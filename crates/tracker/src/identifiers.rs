//! Type-safe identifiers for students, routes and trips.
//!
//! Backed by `Arc<str>` so snapshots can be cloned across views without copying ids.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::new(s))
            }
        }
    };
}

impl_identifier!(StudentIdentifier);
impl_identifier!(RouteIdentifier);
impl_identifier!(TripIdentifier);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality() {
        let id1 = StudentIdentifier::new("student_123");
        let id2 = StudentIdentifier::new("student_123");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
    }

    #[test]
    fn test_identifier_as_map_key() {
        use std::collections::HashMap;

        let mut overrides = HashMap::new();
        overrides.insert(StudentIdentifier::new("amira"), Some(4));

        assert_eq!(overrides.get(&StudentIdentifier::new("amira")), Some(&Some(4)));
        assert_eq!(overrides.get(&StudentIdentifier::new("bilal")), None);
    }

    #[test]
    fn test_identifier_display() {
        let id = RouteIdentifier::new("north_loop");
        assert_eq!(format!("{}", id), "north_loop");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_identifier_serde_is_plain_string() {
        let id = TripIdentifier::new("north_2024-05-02_AM");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"north_2024-05-02_AM\"");

        let back: TripIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
