//! Account registration, credential checks and account moderation.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{ADMIN_ROLE, BOOTSTRAP_USER_NAME, PhotoUpdate, User, UserId};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::policy::{self, Action, Actor};
use crate::ports::{AuthError, PasswordService};

use super::Stores;
use super::validation::{self, MAX_NAME_LEN, MAX_USER_NAME_LEN};

const BOOTSTRAP_EMAIL: &str = "admin@inkwell.local";

#[derive(Debug, Clone)]
pub struct RegisterUserInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
}

/// Profile changes. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photo: PhotoUpdate,
}

#[derive(Clone)]
pub struct UserService {
    stores: Stores,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(stores: Stores, passwords: Arc<dyn PasswordService>) -> Self {
        Self { stores, passwords }
    }

    pub async fn register(&self, input: RegisterUserInput) -> DomainResult<User> {
        validation::required_text("User name", &input.user_name, MAX_USER_NAME_LEN)?;
        validation::email(&input.email)?;
        validation::max_length("First name", &input.first_name, MAX_NAME_LEN)?;
        validation::max_length("Last name", &input.last_name, MAX_NAME_LEN)?;
        validation::password(&input.password, &input.confirm_password)?;

        if self
            .stores
            .users
            .find_by_user_name(&input.user_name)
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate(format!(
                "User name '{}' is already taken",
                input.user_name
            )));
        }
        if self.stores.users.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(&input.password).map_err(auth_failure)?;
        let mut user = User::new(
            input.user_name,
            input.email,
            password_hash,
            self.stores.clock.now(),
        );
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.birth_date = input.birth_date;
        user.photo_url = input.photo_url;

        let user = self.stores.users.insert(user).await?;
        tracing::info!(user_id = %user.id, user_name = %user.user_name, "User registered");
        Ok(user)
    }

    /// Check credentials. Unknown, deactivated and wrong-password attempts
    /// all fail the same way.
    pub async fn authenticate(&self, user_name: &str, password: &str) -> DomainResult<User> {
        let Some(user) = self.stores.users.find_by_user_name(user_name).await? else {
            return Err(DomainError::Unauthorized);
        };
        if !user.is_active() {
            tracing::warn!(user_id = %user.id, "Login attempt on deactivated account");
            return Err(DomainError::Unauthorized);
        }

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(auth_failure)?;
        if !valid {
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn get_user(&self, actor: &Actor, user_id: UserId) -> DomainResult<User> {
        let user = self.stores.require_user(user_id).await?;
        policy::authorize(actor, Some(user.id), Action::ReadPrivate).ensure()?;
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        actor: &Actor,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> DomainResult<User> {
        self.stores.require_author(actor.user_id).await?;
        let mut user = self.stores.require_user(user_id).await?;
        policy::guard_account(actor, &user, Action::Update).ensure()?;

        if let Some(first_name) = &update.first_name {
            validation::max_length("First name", first_name, MAX_NAME_LEN)?;
        }
        if let Some(last_name) = &update.last_name {
            validation::max_length("Last name", last_name, MAX_NAME_LEN)?;
        }
        if let Some(email) = &update.email {
            validation::email(email)?;
            if let Some(other) = self.stores.users.find_by_email(email).await? {
                if other.id != user.id {
                    return Err(DomainError::Duplicate("Email already registered".to_string()));
                }
            }
        }

        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if update.birth_date.is_some() {
            user.birth_date = update.birth_date;
        }
        user.photo_url = update.photo.apply(user.photo_url.take());

        let user = self.save(user).await?;
        tracing::debug!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    pub async fn list_users(&self, actor: &Actor) -> DomainResult<Vec<User>> {
        self.stores.require_author(actor.user_id).await?;
        policy::require_admin(actor).ensure()?;
        Ok(self.stores.users.list_all().await?)
    }

    /// Soft delete: the account is kept and its comments are hidden from
    /// listings.
    pub async fn deactivate(&self, actor: &Actor, user_id: UserId) -> DomainResult<User> {
        self.stores.require_author(actor.user_id).await?;
        let mut user = self.stores.require_user(user_id).await?;
        policy::guard_account(actor, &user, Action::Deactivate).ensure()?;

        if !user.is_active() {
            return Ok(user);
        }
        user.status = false;
        let user = self.save(user).await?;

        tracing::info!(user_id = %user.id, actor = %actor.user_id, "User deactivated");
        Ok(user)
    }

    pub async fn reactivate(&self, actor: &Actor, user_id: UserId) -> DomainResult<User> {
        self.stores.require_author(actor.user_id).await?;
        policy::require_admin(actor).ensure()?;
        let mut user = self.stores.require_user(user_id).await?;

        if user.is_active() {
            return Ok(user);
        }
        user.status = true;
        let user = self.save(user).await?;

        tracing::info!(user_id = %user.id, actor = %actor.user_id, "User reactivated");
        Ok(user)
    }

    /// Physically remove an account. Its likes go with it; its posts and
    /// comments stay, attributed to nobody.
    pub async fn hard_delete(&self, actor: &Actor, user_id: UserId) -> DomainResult<()> {
        self.stores.require_author(actor.user_id).await?;
        let user = self.stores.require_user(user_id).await?;
        policy::guard_account(actor, &user, Action::Delete).ensure()?;
        policy::require_admin(actor).ensure()?;

        self.stores
            .users
            .delete_anonymizing(user_id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found("User", user_id),
                other => other.into(),
            })?;

        tracing::info!(user_id = %user_id, actor = %actor.user_id, "User purged");
        Ok(())
    }

    /// Make sure the bootstrap administrator exists and holds the Admin role.
    pub async fn ensure_bootstrap_admin(&self, password: &str) -> DomainResult<User> {
        if let Some(mut admin) = self
            .stores
            .users
            .find_by_user_name(BOOTSTRAP_USER_NAME)
            .await?
        {
            if admin.has_role(ADMIN_ROLE) && admin.is_active() {
                return Ok(admin);
            }
            if !admin.has_role(ADMIN_ROLE) {
                admin.roles.push(ADMIN_ROLE.to_string());
            }
            admin.status = true;
            return self.save(admin).await;
        }

        let password_hash = self.passwords.hash(password).map_err(auth_failure)?;
        let mut admin = User::new(
            BOOTSTRAP_USER_NAME.to_string(),
            BOOTSTRAP_EMAIL.to_string(),
            password_hash,
            self.stores.clock.now(),
        );
        admin.roles = vec![ADMIN_ROLE.to_string()];

        match self.stores.users.insert(admin).await {
            Ok(admin) => {
                tracing::info!(user_id = %admin.id, "Bootstrap administrator created");
                Ok(admin)
            }
            // Another instance seeded it first.
            Err(RepoError::Constraint(_)) => self
                .stores
                .users
                .find_by_user_name(BOOTSTRAP_USER_NAME)
                .await?
                .ok_or_else(|| DomainError::not_found("User", BOOTSTRAP_USER_NAME)),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, user: User) -> DomainResult<User> {
        let id = user.id;
        self.stores.users.update(user).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("User", id),
            other => other.into(),
        })
    }
}

fn auth_failure(err: AuthError) -> DomainError {
    tracing::error!(error = %err, "Credential processing failed");
    DomainError::Internal(err.to_string())
}
