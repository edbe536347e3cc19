//! Projects and their access-control lists.
//!
//! A [`Project`] is always handed around with its ACL already loaded. The
//! permission checks read `project.acls` directly and never fetch anything
//! on demand, so a check can't silently hit the database.

use std::collections::BTreeSet;

use billet_types::{ProjectId, UserId};
use serde::{Deserialize, Serialize};

use crate::Capability;

// ---------------------------------------------------------------------------
// ProjectAcl
// ---------------------------------------------------------------------------

/// One user's grants within one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAcl {
    pub project_id: ProjectId,
    pub user_id: UserId,
    /// Owners implicitly hold every capability.
    pub is_owner: bool,
    pub capabilities: BTreeSet<Capability>,
}

impl ProjectAcl {
    /// A master entry holding exactly the given capabilities.
    pub fn granting(
        user_id: UserId,
        project_id: ProjectId,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        Self {
            project_id,
            user_id,
            is_owner: false,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// The project owner's entry.
    pub fn owner(user_id: UserId, project_id: ProjectId) -> Self {
        Self {
            project_id,
            user_id,
            is_owner: true,
            capabilities: Capability::ALL.into_iter().collect(),
        }
    }

    /// Returns `true` if this entry grants `capability`.
    pub fn grants(&self, capability: Capability) -> bool {
        self.is_owner || self.capabilities.contains(&capability)
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A project (one game/event) with its ACL snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub acls: Vec<ProjectAcl>,
}

impl Project {
    /// A project with an empty ACL.
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            acls: Vec::new(),
        }
    }

    /// Adds an ACL entry. Entries for other projects are ignored by the
    /// checks, so they're rejected here with a warning.
    pub fn with_acl(mut self, acl: ProjectAcl) -> Self {
        if acl.project_id != self.id {
            tracing::warn!(
                project_id = %self.id,
                acl_project_id = %acl.project_id,
                "ignoring ACL entry scoped to another project"
            );
            return self;
        }
        self.acls.push(acl);
        self
    }

    /// The ACL entry for `user`, if they are a master here.
    pub fn acl_for(&self, user: UserId) -> Option<&ProjectAcl> {
        self.acls
            .iter()
            .find(|acl| acl.user_id == user && acl.project_id == self.id)
    }

    /// All users with an ACL entry (masters of the project).
    pub fn masters(&self) -> impl Iterator<Item = UserId> + '_ {
        self.acls
            .iter()
            .filter(|acl| acl.project_id == self.id)
            .map(|acl| acl.user_id)
    }
}
