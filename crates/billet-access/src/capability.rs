//! The named permissions a master can hold in a project.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AccessError;

/// A named boolean permission granted through a project's ACL.
///
/// The accommodation core only checks two of these
/// ([`CanManageAccommodation`](Self::CanManageAccommodation) for the room
/// inventory, [`CanSetPlayersAccommodations`](Self::CanSetPlayersAccommodations)
/// for occupying rooms), but the ACL is shared with claims and finances, so
/// the full set lives here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    Deserialize,
)]
pub enum Capability {
    CanChangeFields,
    CanChangeProjectProperties,
    CanGrantRights,
    CanManageClaims,
    CanEditRoles,
    CanManageMoney,
    CanSendMassMails,
    CanManagePlots,
    /// Create, edit, and delete room types and rooms.
    CanManageAccommodation,
    /// Move players into and out of rooms.
    CanSetPlayersAccommodations,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 10] = [
        Self::CanChangeFields,
        Self::CanChangeProjectProperties,
        Self::CanGrantRights,
        Self::CanManageClaims,
        Self::CanEditRoles,
        Self::CanManageMoney,
        Self::CanSendMassMails,
        Self::CanManagePlots,
        Self::CanManageAccommodation,
        Self::CanSetPlayersAccommodations,
    ];

    /// The capability's name as stored in ACL tables and shown in errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::CanChangeFields => "CanChangeFields",
            Self::CanChangeProjectProperties => "CanChangeProjectProperties",
            Self::CanGrantRights => "CanGrantRights",
            Self::CanManageClaims => "CanManageClaims",
            Self::CanEditRoles => "CanEditRoles",
            Self::CanManageMoney => "CanManageMoney",
            Self::CanSendMassMails => "CanSendMassMails",
            Self::CanManagePlots => "CanManagePlots",
            Self::CanManageAccommodation => "CanManageAccommodation",
            Self::CanSetPlayersAccommodations => "CanSetPlayersAccommodations",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cap| cap.name() == s)
            .ok_or_else(|| AccessError::UnknownCapability(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_parses_from_its_name() {
        for cap in Capability::ALL {
            assert_eq!(cap.name().parse::<Capability>().unwrap(), cap);
        }
    }

    #[test]
    fn test_unknown_capability_name_is_rejected() {
        let result = "CanFlyDragons".parse::<Capability>();
        assert!(
            matches!(result, Err(AccessError::UnknownCapability(ref n)) if n == "CanFlyDragons")
        );
    }

    #[test]
    fn test_capability_display_matches_name() {
        assert_eq!(
            Capability::CanSetPlayersAccommodations.to_string(),
            "CanSetPlayersAccommodations"
        );
    }

    #[test]
    fn test_capability_serializes_as_name() {
        let json =
            serde_json::to_string(&Capability::CanManageMoney).unwrap();
        assert_eq!(json, "\"CanManageMoney\"");
    }
}
