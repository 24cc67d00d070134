//! Ownership/role gate.
//!
//! Every update or delete of an owned resource (event, article, listing,
//! comment) passes through [`ensure_can_mutate`] before any write happens.

use agora_common::{AppError, AppResult};
use agora_db::entities::user;

/// Check whether the acting user may mutate a resource owned by `owner_id`.
#[must_use]
pub fn can_mutate(owner_id: &str, acting_user: &user::Model) -> bool {
    acting_user.is_admin || acting_user.id == owner_id
}

/// Require mutation rights, surfacing `Forbidden` otherwise.
pub fn ensure_can_mutate(owner_id: &str, acting_user: &user::Model) -> AppResult<()> {
    if can_mutate(owner_id, acting_user) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to modify this resource".to_string(),
        ))
    }
}

/// Require admin rights, surfacing `Forbidden` otherwise.
pub fn ensure_admin(acting_user: &user::Model) -> AppResult<()> {
    if acting_user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "This operation requires admin rights".to_string(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            username_lower: format!("user-{id}"),
            email: format!("{id}@example.com"),
            name: None,
            password_hash: "hash".to_string(),
            token: None,
            avatar_url: None,
            bio: None,
            is_admin,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_owner_can_mutate() {
        let user = test_user("u1", false);
        assert!(can_mutate("u1", &user));
        assert!(ensure_can_mutate("u1", &user).is_ok());
    }

    #[test]
    fn test_admin_can_mutate_others_resources() {
        let admin = test_user("u2", true);
        assert!(can_mutate("u1", &admin));
        assert!(ensure_can_mutate("u1", &admin).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let user = test_user("u2", false);
        assert!(!can_mutate("u1", &user));
        assert!(matches!(
            ensure_can_mutate("u1", &user),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_ensure_admin() {
        let admin = test_user("u1", true);
        let user = test_user("u2", false);
        assert!(ensure_admin(&admin).is_ok());
        assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden(_))));
    }
}
