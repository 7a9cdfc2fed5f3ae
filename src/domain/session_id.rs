//! Type-safe conversation session identifier.
//!
//! [`SessionId`] wraps a [`uuid::Uuid`] (v4) so session identifiers cannot be
//! mixed up with message ids or catalog GIDs. It is stored as its canonical
//! hyphenated string form in the `sessions.id` column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a conversation session.
///
/// Generated once by [`SessionId::new`] when a session is created. A v4 UUID
/// carries 122 random bits, so collisions are not a practical concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Creates a new random `SessionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `SessionId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl From<uuid::Uuid> for SessionId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<SessionId> for uuid::Uuid {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn display_is_hyphenated_uuid() {
        let s = SessionId::new().to_string();
        assert_eq!(s.len(), 36);
        assert_eq!(s.matches('-').count(), 4);
    }

    #[test]
    fn parses_its_own_display_form() {
        let id = SessionId::new();
        let Ok(parsed) = id.to_string().parse::<SessionId>() else {
            panic!("display form should parse");
        };
        assert_eq!(parsed, id);
    }

    #[test]
    fn uppercase_input_maps_to_stored_lowercase_key() {
        let Ok(id) = "0B6F3C2A-9D4E-4F10-8A7B-1C2D3E4F5A6B".parse::<SessionId>() else {
            panic!("uppercase uuid should parse");
        };
        assert_eq!(id.to_string(), "0b6f3c2a-9d4e-4f10-8a7b-1c2d3e4f5a6b");
    }

    #[test]
    fn deserializes_only_from_uuid_strings() {
        let Ok(id) =
            serde_json::from_str::<SessionId>("\"0b6f3c2a-9d4e-4f10-8a7b-1c2d3e4f5a6b\"")
        else {
            panic!("uuid string should deserialize");
        };
        assert_eq!(id.as_uuid().get_version_num(), 4);
        assert!(serde_json::from_str::<SessionId>("42").is_err());
        assert!(serde_json::from_str::<SessionId>("\"session-1\"").is_err());
    }

    #[test]
    fn rejects_non_uuid_strings() {
        assert!("not-a-session".parse::<SessionId>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let uuid = uuid::Uuid::new_v4();
        let id = SessionId::from_uuid(uuid);
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, format!("\"{uuid}\""));
        assert_eq!(*id.as_uuid(), uuid);
    }
}
