//! Error types for the access layer.

use billet_types::{ProjectId, UserId};

use crate::Capability;

/// Errors raised by permission checks.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The user has no ACL entry granting the capability in this project.
    #[error("user {user} lacks {capability} in project {project}")]
    PermissionDenied {
        user: UserId,
        project: ProjectId,
        capability: Capability,
    },

    /// A capability name didn't match any known capability.
    #[error("unknown capability: {0}")]
    UnknownCapability(String),
}
