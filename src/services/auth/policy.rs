//! Access policy: pure decisions over an already-loaded identity.
//!
//! Nothing here performs I/O. Callers pass the request identity (if any) and
//! the ownership value they already fetched.

use uuid::Uuid;

use crate::repos::user_repo::{Role, User};
use crate::services::auth::error::AuthError;
use crate::services::auth::identity::CurrentUser;

pub fn is_admin(user: &User) -> bool {
    user.role == Role::Admin
}

pub fn require_authenticated(identity: Option<&CurrentUser>) -> Result<&CurrentUser, AuthError> {
    identity.ok_or(AuthError::Unauthenticated)
}

pub fn require_admin(identity: Option<&CurrentUser>) -> Result<&CurrentUser, AuthError> {
    let current = require_authenticated(identity)?;
    if is_admin(&current.0) {
        Ok(current)
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Permitted iff the caller owns the resource or is an admin.
pub fn require_owner_or_admin(
    identity: Option<&CurrentUser>,
    resource_owner_id: Uuid,
) -> Result<&CurrentUser, AuthError> {
    let current = require_authenticated(identity)?;
    if current.0.id == resource_owner_id || is_admin(&current.0) {
        Ok(current)
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Decide a role change and return the target with its new role.
///
/// The actor is checked before the requested value, so a non-admin gets
/// `Forbidden` whatever they ask for. Persisting the result is the caller's job.
pub fn set_role(
    actor: Option<&CurrentUser>,
    target: &User,
    new_role: &str,
) -> Result<User, AuthError> {
    require_admin(actor)?;

    let role = new_role
        .parse::<Role>()
        .map_err(|_| AuthError::invalid_argument("Invalid role"))?;

    Ok(User {
        role,
        ..target.clone()
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "someone".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            role,
            phone: None,
            created_at: Utc::now(),
        }
    }

    fn current(role: Role) -> CurrentUser {
        CurrentUser(user(role))
    }

    #[test]
    fn is_admin_follows_role() {
        assert!(is_admin(&user(Role::Admin)));
        assert!(!is_admin(&user(Role::User)));
    }

    #[test]
    fn missing_identity_is_unauthenticated_everywhere() {
        let owner = Uuid::new_v4();
        assert!(matches!(
            require_authenticated(None),
            Err(AuthError::Unauthenticated)
        ));
        assert!(matches!(require_admin(None), Err(AuthError::Unauthenticated)));
        assert!(matches!(
            require_owner_or_admin(None, owner),
            Err(AuthError::Unauthenticated)
        ));
        assert!(matches!(
            set_role(None, &user(Role::User), "admin"),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn require_admin_rejects_plain_users() {
        let admin = current(Role::Admin);
        let plain = current(Role::User);

        assert!(require_admin(Some(&admin)).is_ok());
        assert!(matches!(
            require_admin(Some(&plain)),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn owner_or_admin_over_all_combinations() {
        for role in Role::ALL {
            for owns in [true, false] {
                let caller = current(role);
                let owner = if owns { caller.0.id } else { Uuid::new_v4() };

                let permitted = require_owner_or_admin(Some(&caller), owner).is_ok();
                assert_eq!(
                    permitted,
                    owns || role == Role::Admin,
                    "role={role} owns={owns}"
                );
            }
        }
    }

    #[test]
    fn non_admin_can_never_set_roles() {
        let actor = current(Role::User);
        for target_role in Role::ALL {
            let target = user(target_role);
            for requested in ["user", "admin", "superuser", ""] {
                assert!(
                    matches!(
                        set_role(Some(&actor), &target, requested),
                        Err(AuthError::Forbidden)
                    ),
                    "requested={requested:?}"
                );
            }
        }

        // not even on themselves
        assert!(matches!(
            set_role(Some(&actor), &actor.0, "admin"),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn admin_cannot_assign_unknown_roles() {
        let admin = current(Role::Admin);
        let target = user(Role::User);

        for requested in ["superuser", "Admin", "root", ""] {
            assert!(matches!(
                set_role(Some(&admin), &target, requested),
                Err(AuthError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn admin_role_change_keeps_everything_else() {
        let admin = current(Role::Admin);
        let target = user(Role::User);

        let promoted = set_role(Some(&admin), &target, "admin").expect("promote");
        assert_eq!(promoted.role, Role::Admin);
        assert_eq!(promoted.id, target.id);
        assert_eq!(promoted.email, target.email);

        let demoted = set_role(Some(&admin), &promoted, "user").expect("demote");
        assert_eq!(demoted.role, Role::User);
    }
}
