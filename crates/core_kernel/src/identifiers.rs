//! Strongly-typed identifiers for domain entities
//!
//! The claim store and the workflow engine issue their own identifiers, so
//! these wrap opaque strings instead of UUIDs. The newtypes still prevent
//! accidental mixing of a claim id with a process instance id.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an identifier issued by an external system
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Generates a short prefixed identifier (e.g. `CLM-1a2b3c4d`)
            pub fn generate() -> Self {
                let raw = Uuid::new_v4().simple().to_string();
                Self(format!("{}-{}", $prefix, &raw[..8]))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the identifier prefix used by [`Self::generate`]
            pub fn prefix() -> &'static str {
                $prefix
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Claim store identifiers
define_id!(ClaimId, "CLM");

// Workflow engine identifiers
define_id!(ProcessInstanceId, "PI");
define_id!(TaskId, "TSK");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_claim_id_shape() {
        let id = ClaimId::generate();
        assert!(id.as_str().starts_with("CLM-"));
        assert_eq!(id.as_str().len(), 12);
    }

    #[test]
    fn test_external_id_is_preserved() {
        let id: ProcessInstanceId = "2501".parse().unwrap();
        assert_eq!(id.to_string(), "2501");
    }
}
