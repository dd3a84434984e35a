//! The two role-slots of a room.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::RelayError;

/// Role a connection plays inside a room.
///
/// Every room has exactly one slot per role. Deployments name the display
/// side differently, so [`Role::from_str`] accepts `"projection"` as an
/// alias for [`Role::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Renders the shared session (laptop, projector).
    Display,
    /// Sends input events (phone).
    Controller,
}

impl Role {
    /// Returns the role occupying the other slot of the same room.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Display => Self::Controller,
            Self::Controller => Self::Display,
        }
    }

    /// Canonical wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Controller => "controller",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "display" | "projection" => Ok(Self::Display),
            "controller" => Ok(Self::Controller),
            other => Err(RelayError::InvalidJoin(format!("unknown client_type: {other}"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_display_alias() {
        let Ok(role) = "projection".parse::<Role>() else {
            panic!("projection should parse");
        };
        assert_eq!(role, Role::Display);
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!("spectator".parse::<Role>().is_err());
        assert!("Display".parse::<Role>().is_err());
    }

    #[test]
    fn opposite_swaps_slots() {
        assert_eq!(Role::Display.opposite(), Role::Controller);
        assert_eq!(Role::Controller.opposite(), Role::Display);
    }
}
