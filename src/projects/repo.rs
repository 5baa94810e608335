use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub demo_link: Option<String>,
    pub source_link: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Project {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        demo_link: Option<&str>,
        source_link: Option<&str>,
        thumbnail_url: Option<&str>,
    ) -> anyhow::Result<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (user_id, name, demo_link, source_link, thumbnail_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, demo_link, source_link, thumbnail_url, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(demo_link)
        .bind(source_link)
        .bind(thumbnail_url)
        .fetch_one(db)
        .await?;
        Ok(project)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, name, demo_link, source_link, thumbnail_url, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(project)
    }

    pub async fn list_by_owner(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, name, demo_link, source_link, thumbnail_url, created_at
            FROM projects
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Update text fields; the thumbnail is only overwritten when a new URL
    /// is supplied (COALESCE keeps the prior one otherwise).
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        demo_link: Option<&str>,
        source_link: Option<&str>,
        thumbnail_url: Option<&str>,
    ) -> anyhow::Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                name = $2,
                demo_link = $3,
                source_link = $4,
                thumbnail_url = COALESCE($5, thumbnail_url)
            WHERE id = $1
            RETURNING id, user_id, name, demo_link, source_link, thumbnail_url, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(demo_link)
        .bind(source_link)
        .bind(thumbnail_url)
        .fetch_optional(db)
        .await?;
        Ok(project)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
