//! Client-supplied room code.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Opaque, case-sensitive room code chosen by the clients.
///
/// The only validation applied is that the code is non-empty; `"room1"` and
/// `"ROOM1"` name different rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Creates a room code from a client-supplied string.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidJoin`] if `code` is empty.
    pub fn new(code: impl Into<String>) -> Result<Self, RelayError> {
        let code = code.into();
        if code.is_empty() {
            return Err(RelayError::InvalidJoin("room code must not be empty".to_string()));
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = RelayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}
