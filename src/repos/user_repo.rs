/*
 * Responsibility
 * - users テーブル向け SQLx 操作 (Credential Store)
 * - UserStore trait で抽象化し、handler/service は trait 越しに使う
 * - passwordHash は find_by_email (ログイン用) 以外では返さない
 */
use std::{fmt, str::FromStr};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

/// Enumerated user roles. Every persisted user has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// A user record as seen by everything except the login path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Owner columns joined onto a resource row for admin listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerSummary {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// `u.name AS "ownerName", u.email AS "ownerEmail", u.role AS "ownerRole"` of a users join.
#[derive(Debug, FromRow)]
pub(crate) struct OwnerColumns {
    #[sqlx(rename = "ownerName")]
    name: String,
    #[sqlx(rename = "ownerEmail")]
    email: String,
    #[sqlx(rename = "ownerRole")]
    role: String,
}

impl OwnerColumns {
    pub(crate) fn into_summary(self, user_id: Uuid) -> RepoResult<OwnerSummary> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| RepoError::InvalidRow(e.to_string()))?;

        Ok(OwnerSummary {
            user_id,
            name: self.name,
            email: self.email,
            role,
        })
    }
}

/// User + stored secret hash. Only returned by `find_by_email`.
#[derive(Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the hash
        f.debug_struct("UserCredentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Emails compare case-insensitively; this is the canonical stored form.
/// Lookups match the stored column exactly, so every write and read goes through here.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserCredentials>>;

    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<User>>;

    // Returns `RepoError::Conflict` when the email is already taken.
    async fn create(&self, new_user: NewUser) -> RepoResult<User>;

    async fn list(&self) -> RepoResult<Vec<User>>;

    async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch)
    -> RepoResult<Option<User>>;

    async fn update_role(&self, user_id: Uuid, role: Role) -> RepoResult<Option<User>>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    #[sqlx(rename = "userId")]
    id: Uuid,
    name: String,
    email: String,
    role: String,
    phone: Option<String>,
    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    #[sqlx(rename = "passwordHash")]
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| RepoError::InvalidRow(e.to_string()))?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            phone: row.phone,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT "userId", name, email, role, phone, "createdAt", "passwordHash"
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(UserCredentials {
                user: User::try_from(r.user)?,
                password_hash: r.password_hash,
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", name, email, role, phone, "createdAt"
            FROM users
            WHERE "userId" = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, new_user: NewUser) -> RepoResult<User> {
        // unique index on email -> 23505 -> RepoError::Conflict
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, "passwordHash")
            VALUES ($1, $2, $3)
            RETURNING "userId", name, email, role, phone, "createdAt"
            "#,
        )
        .bind(new_user.name.trim())
        .bind(normalize_email(&new_user.email))
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        User::try_from(row)
    }

    async fn list(&self) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", name, email, role, phone, "createdAt"
            FROM users
            ORDER BY "createdAt" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        patch: ProfilePatch,
    ) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone)
            WHERE "userId" = $1
            RETURNING "userId", name, email, role, phone, "createdAt"
            "#,
        )
        .bind(user_id)
        .bind(patch.name.as_deref().map(str::trim))
        .bind(patch.email.as_deref().map(normalize_email))
        .bind(patch.phone.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn update_role(&self, user_id: Uuid, role: Role) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET role = $2
            WHERE "userId" = $1
            RETURNING "userId", name, email, role, phone, "createdAt"
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_only_enumerated_values() {
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(
            "superuser".parse::<Role>(),
            Err(UnknownRole("superuser".to_string()))
        );
        assert!("Admin".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn emails_are_normalized_for_comparison() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("Émile@X.com"), "émile@x.com");
    }
}
