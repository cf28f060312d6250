/// Authorization policy
///
/// Decides whether an authenticated identity may perform an action against a
/// target tenant. The decision is pure: it looks only at the identity, the
/// action, and the target slug, and never touches storage.
///
/// # Permission Model
///
/// | Action | Requirement |
/// |---|---|
/// | List/Read/Create/Update/Delete notes | caller's tenant is the target |
/// | Upgrade plan, Invite user | caller is admin **and** caller's tenant is the target |
///
/// No cross-tenant administrative trust exists; an admin of one tenant is a
/// stranger to every other tenant.
///
/// # Example
///
/// ```
/// use notevault_shared::auth::authorization::{authorize, Action};
/// use notevault_shared::auth::middleware::IdentityContext;
/// use notevault_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// let admin = IdentityContext {
///     user_id: Uuid::new_v4(),
///     role: UserRole::Admin,
///     tenant_slug: "acme".to_string(),
/// };
///
/// assert!(authorize(&admin, Action::UpgradePlan, "acme").is_ok());
/// assert!(authorize(&admin, Action::UpgradePlan, "globex").is_err());
/// ```

use super::middleware::IdentityContext;
use crate::models::user::UserRole;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthzError {
    /// Caller acts outside their own tenant
    #[error("Not authorized to access tenant {0}")]
    WrongTenant(String),

    /// Caller lacks the admin role
    #[error("Insufficient permissions: requires {required}, has {actual}")]
    InsufficientRole { required: UserRole, actual: UserRole },
}

/// Actions subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListNotes,
    ReadNote,
    CreateNote,
    UpdateNote,
    DeleteNote,

    /// Move the tenant to the pro plan
    UpgradePlan,

    /// Add a user to the tenant
    InviteUser,
}

impl Action {
    /// Gets the minimum role required for this action
    pub fn min_role(&self) -> UserRole {
        match self {
            Action::UpgradePlan | Action::InviteUser => UserRole::Admin,
            Action::ListNotes
            | Action::ReadNote
            | Action::CreateNote
            | Action::UpdateNote
            | Action::DeleteNote => UserRole::Member,
        }
    }

    /// Whether only admins may perform this action
    pub fn requires_admin(&self) -> bool {
        self.min_role().is_admin()
    }
}

/// Authorizes `identity` to perform `action` on the tenant `target_slug`
///
/// The tenant check comes first, so a member poking at another tenant's admin
/// endpoint sees the same error as an admin would.
///
/// # Errors
///
/// - `AuthzError::WrongTenant` if the identity belongs to another tenant
/// - `AuthzError::InsufficientRole` if the action needs admin and the identity
///   is a member
pub fn authorize(identity: &IdentityContext, action: Action, target_slug: &str) -> Result<(), AuthzError> {
    if identity.tenant_slug != target_slug {
        return Err(AuthzError::WrongTenant(target_slug.to_string()));
    }

    if action.requires_admin() && !identity.role.is_admin() {
        return Err(AuthzError::InsufficientRole {
            required: action.min_role(),
            actual: identity.role,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const MEMBER_ACTIONS: [Action; 5] = [
        Action::ListNotes,
        Action::ReadNote,
        Action::CreateNote,
        Action::UpdateNote,
        Action::DeleteNote,
    ];
    const ADMIN_ACTIONS: [Action; 2] = [Action::UpgradePlan, Action::InviteUser];

    fn identity(role: UserRole, slug: &str) -> IdentityContext {
        IdentityContext {
            user_id: Uuid::new_v4(),
            role,
            tenant_slug: slug.to_string(),
        }
    }

    #[test]
    fn test_action_min_role() {
        for action in MEMBER_ACTIONS {
            assert_eq!(action.min_role(), UserRole::Member);
            assert!(!action.requires_admin());
        }
        for action in ADMIN_ACTIONS {
            assert_eq!(action.min_role(), UserRole::Admin);
            assert!(action.requires_admin());
        }
    }

    #[test]
    fn test_member_actions_on_own_tenant() {
        for role in [UserRole::Member, UserRole::Admin] {
            let caller = identity(role, "acme");
            for action in MEMBER_ACTIONS {
                assert!(authorize(&caller, action, "acme").is_ok());
            }
        }
    }

    #[test]
    fn test_member_actions_on_other_tenant() {
        let caller = identity(UserRole::Admin, "acme");
        for action in MEMBER_ACTIONS {
            assert_eq!(
                authorize(&caller, action, "globex"),
                Err(AuthzError::WrongTenant("globex".to_string()))
            );
        }
    }

    #[test]
    fn test_admin_actions() {
        let admin = identity(UserRole::Admin, "acme");
        let member = identity(UserRole::Member, "acme");

        for action in ADMIN_ACTIONS {
            assert!(authorize(&admin, action, "acme").is_ok());
            assert_eq!(
                authorize(&member, action, "acme"),
                Err(AuthzError::InsufficientRole {
                    required: UserRole::Admin,
                    actual: UserRole::Member,
                })
            );
        }
    }

    #[test]
    fn test_admin_cannot_act_on_other_tenant() {
        let admin = identity(UserRole::Admin, "acme");

        for action in ADMIN_ACTIONS {
            assert!(matches!(
                authorize(&admin, action, "other"),
                Err(AuthzError::WrongTenant(_))
            ));
        }
    }

    #[test]
    fn test_slug_comparison_is_exact() {
        let caller = identity(UserRole::Admin, "acme");
        assert!(authorize(&caller, Action::ListNotes, "ACME").is_err());
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::WrongTenant("globex".to_string());
        assert!(err.to_string().contains("globex"));

        let err = AuthzError::InsufficientRole {
            required: UserRole::Admin,
            actual: UserRole::Member,
        };
        assert!(err.to_string().contains("requires admin"));
    }
}
