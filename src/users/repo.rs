use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// Account role. Fixed to `user` at signup; promotion to `admin` happens
/// out-of-band (directly in the database).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub username: String,
    pub role: Role,
    pub about: String,
    pub hero_description: String,
    pub user_title: String,
    pub contact_email: Option<String>,
    pub profile_picture_url: Option<String>,
    pub resume_url: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Row shape for the admin user listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub about: &'a str,
    pub hero_description: &'a str,
    pub user_title: &'a str,
}

/// Field-wise profile patch. `None` leaves the stored value untouched, so a
/// text-only update never disturbs previously stored asset URLs.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub about: Option<String>,
    pub user_title: Option<String>,
    pub hero_description: Option<String>,
    pub contact_email: Option<String>,
    pub profile_picture_url: Option<String>,
    pub resume_url: Option<String>,
}

const USER_COLUMNS: &str = "id, email, password_hash, username, role, about, \
     hero_description, user_title, contact_email, profile_picture_url, resume_url, created_at";

impl User {
    pub async fn create(db: &PgPool, new: NewUser<'_>) -> Result<User, ApiError> {
        let res = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, username, role, about, hero_description, user_title)
            VALUES ($1, $2, $3, 'user', $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.username)
        .bind(new.about)
        .bind(new.hero_description)
        .bind(new.user_title)
        .fetch_one(db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(ApiError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM users WHERE email = $1"#
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM users WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn list_by_role(db: &PgPool, role: Role) -> anyhow::Result<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username, email, role
            FROM users
            WHERE role = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(role)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Apply a profile patch in one statement and return the refreshed row.
    /// COALESCE keeps every field whose patch slot is `None`, so text updates
    /// and asset-URL updates land atomically regardless of which are present.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                username            = COALESCE($2, username),
                about               = COALESCE($3, about),
                user_title          = COALESCE($4, user_title),
                hero_description    = COALESCE($5, hero_description),
                contact_email       = COALESCE($6, contact_email),
                profile_picture_url = COALESCE($7, profile_picture_url),
                resume_url          = COALESCE($8, resume_url)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.username)
        .bind(changes.about)
        .bind(changes.user_title)
        .bind(changes.hero_description)
        .bind(changes.contact_email)
        .bind(changes.profile_picture_url)
        .bind(changes.resume_url)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "$argon2id$secret".into(),
            username: "Alice".into(),
            role: Role::User,
            about: "hi".into(),
            hero_description: "builds things".into(),
            user_title: "Engineer".into(),
            contact_email: None,
            profile_picture_url: None,
            resume_url: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("a@b.com"));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
