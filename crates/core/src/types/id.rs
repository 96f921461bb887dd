//! Newtype IDs for type-safe entity references.
//!
//! The content API is not consistent about id types: some endpoints return
//! numeric ids, others return strings, and ids taken from page URLs are
//! always strings. Every ID type therefore normalises to a `String` and
//! accepts either JSON form on input. Output is always a JSON string.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain JSON string
/// - `Deserialize` from a JSON string or integer (`12` and `"12"` are equal)
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_str()`, `Display`, `From<&str>`, `From<String>`, `From<i64>`
///
/// # Example
///
/// ```rust
/// # use cohort_core::define_id;
/// define_id!(ListingId);
/// define_id!(AgentId);
///
/// let listing = ListingId::from(7);
/// assert_eq!(listing, ListingId::new("7"));
///
/// // These are different types, so this won't compile:
/// // let _: ListingId = AgentId::new("7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_owned()))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }
    };
}

/// Wire form of an ID before normalisation.
#[doc(hidden)]
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

define_id!(PropertyId);
define_id!(UserId);
define_id!(BlogId);
define_id!(VisitId);
define_id!(SearchId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids_are_equal() {
        let from_number: PropertyId = serde_json::from_str("42").unwrap();
        let from_string: PropertyId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.as_str(), "42");
    }

    #[test]
    fn test_ids_serialize_as_strings() {
        let id = PropertyId::from(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_rejects_non_scalar_ids() {
        assert!(serde_json::from_str::<UserId>("{\"id\": 1}").is_err());
        assert!(serde_json::from_str::<UserId>("1.5").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(BlogId::new("spring-launch").to_string(), "spring-launch");
    }
}
