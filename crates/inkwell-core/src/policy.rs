//! Authorization policy gating every mutation of the content graph.

use serde::{Deserialize, Serialize};

use crate::domain::{ADMIN_ROLE, User, UserId};
use crate::error::DomainError;

/// Authenticated identity performing a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub roles: Vec<String>,
}

impl Actor {
    pub fn new(user_id: UserId, roles: Vec<String>) -> Self {
        Self { user_id, roles }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.roles.clone())
    }
}

/// What the actor wants to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Changing the text of a post or comment. Only its author may.
    Edit,
    Update,
    Delete,
    Deactivate,
    Reactivate,
    /// Reading data that is visible only to its owner and moderators.
    ReadPrivate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Forbidden,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn ensure(self) -> Result<(), DomainError> {
        match self {
            Self::Allow => Ok(()),
            Self::Forbidden => Err(DomainError::Forbidden),
        }
    }
}

/// Owner-or-Admin rule. Resources without an owner are Admin-only, except
/// for `Edit`, which the author alone holds.
pub fn authorize(actor: &Actor, owner: Option<UserId>, action: Action) -> Decision {
    let owns = owner == Some(actor.user_id);
    let allowed = match action {
        Action::Edit => owns,
        _ => owns || actor.is_admin(),
    };
    if allowed {
        return Decision::Allow;
    }

    tracing::warn!(
        actor = %actor.user_id,
        owner = ?owner,
        action = ?action,
        "Access denied"
    );
    Decision::Forbidden
}

/// Policy for account-level actions on `target`.
///
/// The bootstrap account can never be deactivated or deleted, not even by an
/// administrator.
pub fn guard_account(actor: &Actor, target: &User, action: Action) -> Decision {
    if target.is_bootstrap_admin() && matches!(action, Action::Deactivate | Action::Delete) {
        tracing::warn!(
            actor = %actor.user_id,
            action = ?action,
            "Refusing to touch the bootstrap account"
        );
        return Decision::Forbidden;
    }

    authorize(actor, Some(target.id), action)
}

pub fn require_admin(actor: &Actor) -> Decision {
    authorize(actor, None, Action::ReadPrivate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn member() -> Actor {
        Actor::new(Uuid::new_v4(), vec![])
    }

    fn admin() -> Actor {
        Actor::new(Uuid::new_v4(), vec![ADMIN_ROLE.to_string()])
    }

    fn account(user_name: &str) -> User {
        User::new(
            user_name.to_string(),
            format!("{user_name}@example.com"),
            "hash".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_owner_is_allowed() {
        let actor = member();
        for action in [Action::Edit, Action::Update, Action::Delete, Action::ReadPrivate] {
            assert!(authorize(&actor, Some(actor.user_id), action).is_allowed());
        }
    }

    #[test]
    fn test_stranger_is_forbidden() {
        let actor = member();
        let owner = Uuid::new_v4();
        assert_eq!(
            authorize(&actor, Some(owner), Action::Delete),
            Decision::Forbidden
        );
        assert!(matches!(
            authorize(&actor, Some(owner), Action::Update).ensure(),
            Err(DomainError::Forbidden)
        ));
    }

    #[test]
    fn test_admin_is_allowed_everywhere() {
        let actor = admin();
        assert!(authorize(&actor, Some(Uuid::new_v4()), Action::Delete).is_allowed());
        assert!(authorize(&actor, None, Action::Update).is_allowed());
        assert!(require_admin(&actor).is_allowed());
    }

    #[test]
    fn test_admin_cannot_edit_foreign_content() {
        let actor = admin();
        assert_eq!(
            authorize(&actor, Some(Uuid::new_v4()), Action::Edit),
            Decision::Forbidden
        );
        assert_eq!(authorize(&actor, None, Action::Edit), Decision::Forbidden);
        assert!(authorize(&actor, Some(actor.user_id), Action::Edit).is_allowed());
    }

    #[test]
    fn test_ownerless_resources_are_admin_only() {
        assert_eq!(authorize(&member(), None, Action::Delete), Decision::Forbidden);
        assert_eq!(require_admin(&member()), Decision::Forbidden);
    }

    #[test]
    fn test_bootstrap_account_cannot_be_deactivated_or_deleted() {
        let bootstrap = account(crate::domain::BOOTSTRAP_USER_NAME);
        let itself = Actor::new(bootstrap.id, vec![ADMIN_ROLE.to_string()]);

        for actor in [admin(), itself] {
            assert_eq!(
                guard_account(&actor, &bootstrap, Action::Deactivate),
                Decision::Forbidden
            );
            assert_eq!(
                guard_account(&actor, &bootstrap, Action::Delete),
                Decision::Forbidden
            );
        }
        assert!(guard_account(&admin(), &bootstrap, Action::Update).is_allowed());
    }

    #[test]
    fn test_account_owner_rule() {
        let alice = account("alice");
        let as_alice = Actor::from(&alice);

        assert!(guard_account(&as_alice, &alice, Action::Deactivate).is_allowed());
        assert_eq!(
            guard_account(&member(), &alice, Action::Update),
            Decision::Forbidden
        );
    }
}
