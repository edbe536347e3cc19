//! Capability checks over a loaded ACL.

use billet_types::UserId;

use crate::{AccessError, Capability, Project};

/// Returns `true` if `user` holds `capability` in `project`.
///
/// Pure: reads only `project.acls`.
pub fn has_capability(
    user: UserId,
    project: &Project,
    capability: Capability,
) -> bool {
    project
        .acl_for(user)
        .is_some_and(|acl| acl.grants(capability))
}

/// Fails with [`AccessError::PermissionDenied`] unless `user` holds
/// `capability` in `project`.
///
/// Callers run this before touching any state, so a denial never leaves a
/// half-applied change behind.
pub fn require_capability(
    user: UserId,
    project: &Project,
    capability: Capability,
) -> Result<(), AccessError> {
    if has_capability(user, project, capability) {
        return Ok(());
    }
    tracing::debug!(
        user_id = %user,
        project_id = %project.id,
        %capability,
        "capability check denied"
    );
    Err(AccessError::PermissionDenied {
        user,
        project: project.id,
        capability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectAcl;
    use billet_types::ProjectId;

    fn project() -> Project {
        Project::new(ProjectId(1), "Winter Ball")
            .with_acl(ProjectAcl::owner(UserId(1), ProjectId(1)))
            .with_acl(ProjectAcl::granting(
                UserId(2),
                ProjectId(1),
                [Capability::CanSetPlayersAccommodations],
            ))
            .with_acl(ProjectAcl::granting(
                UserId(3),
                ProjectId(1),
                [Capability::CanManageClaims],
            ))
    }

    #[test]
    fn test_owner_has_every_capability() {
        let p = project();
        assert!(has_capability(UserId(1), &p, Capability::CanManageMoney));
        assert!(has_capability(
            UserId(1),
            &p,
            Capability::CanSetPlayersAccommodations
        ));
    }

    #[test]
    fn test_master_has_only_granted_capability() {
        let p = project();
        assert!(has_capability(
            UserId(2),
            &p,
            Capability::CanSetPlayersAccommodations
        ));
        assert!(!has_capability(
            UserId(2),
            &p,
            Capability::CanManageAccommodation
        ));
    }

    #[test]
    fn test_user_without_acl_has_nothing() {
        let p = project();
        for cap in Capability::ALL {
            assert!(!has_capability(UserId(42), &p, cap));
        }
    }

    #[test]
    fn test_require_capability_denies_with_details() {
        let p = project();

        let result = require_capability(
            UserId(3),
            &p,
            Capability::CanSetPlayersAccommodations,
        );

        match result {
            Err(AccessError::PermissionDenied {
                user,
                project,
                capability,
            }) => {
                assert_eq!(user, UserId(3));
                assert_eq!(project, ProjectId(1));
                assert_eq!(capability, Capability::CanSetPlayersAccommodations);
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn test_require_capability_allows_granted() {
        let p = project();
        assert!(
            require_capability(
                UserId(2),
                &p,
                Capability::CanSetPlayersAccommodations
            )
            .is_ok()
        );
    }
}
