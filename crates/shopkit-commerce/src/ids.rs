//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing an OrderId where a ProductId is expected.
//!
//! The storefront backend issues numeric ids; they are accepted on
//! deserialization and kept as their decimal string.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                Self(n.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

/// Wire form of an id: either a JSON string or a JSON integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

define_id!(ProductId);
define_id!(OrderId);
define_id!(UserId);
define_id!(CategoryId);
define_id!(AddressId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
    }

    #[test]
    fn test_id_from_string() {
        let id: ProductId = "prod-456".into();
        assert_eq!(id.as_str(), "prod-456");

        let id: OrderId = 42.into();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_id_display() {
        let id = ProductId::new("prod-789");
        assert_eq!(format!("{}", id), "prod-789");
    }

    #[test]
    fn test_id_deserializes_string_or_number() {
        let from_number: OrderId = serde_json::from_str("1017").unwrap();
        let from_string: OrderId = serde_json::from_str("\"1017\"").unwrap();
        assert_eq!(from_number, from_string);

        assert!(serde_json::from_str::<OrderId>("true").is_err());
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = ProductId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }
}
