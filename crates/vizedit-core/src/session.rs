//! Session identifiers.
//!
//! ## Learning: Newtypes
//!
//! A `SessionId` is just a string on the wire, but wrapping it means a
//! container id or a message body can never be passed where the backend
//! address is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

/// Opaque identifier addressing one backend editing session.
///
/// Stable for the life of a panel: reconnecting under a different id is a
/// new, unrelated session as far as the backend is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Wraps an id handed out by the backend.
    ///
    /// Ids must be non-empty and free of whitespace and URL delimiters,
    /// since they end up in the channel address.
    pub fn new(id: impl Into<String>) -> CoreResult<Self> {
        let id = id.into();
        let valid = !id.is_empty()
            && !id
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '&' | '#' | '='));
        if valid {
            Ok(Self(id))
        } else {
            Err(CoreError::InvalidSessionId(id))
        }
    }

    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The id as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert_eq!(SessionId::new("s1").unwrap().as_str(), "s1");
        assert_eq!("42".parse::<SessionId>().unwrap().to_string(), "42");
    }

    #[test]
    fn test_invalid_ids() {
        assert!(SessionId::new("").is_err());
        assert!(SessionId::new("a b").is_err());
        assert!(SessionId::new("a?uid=b").is_err());
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_serde_validates() {
        let id: SessionId = serde_json::from_str("\"s1\"").unwrap();
        assert_eq!(id.as_str(), "s1");
        assert!(serde_json::from_str::<SessionId>("\"\"").is_err());
    }
}
