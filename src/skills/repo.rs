use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub icon_url: String,
    pub created_at: OffsetDateTime,
}

impl Skill {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        icon_url: &str,
    ) -> anyhow::Result<Skill> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (user_id, name, icon_url)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, icon_url, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(icon_url)
        .fetch_one(db)
        .await?;
        Ok(skill)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Skill>> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, user_id, name, icon_url, created_at
            FROM skills
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(skill)
    }

    pub async fn list_by_owner(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Skill>> {
        let rows = sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, user_id, name, icon_url, created_at
            FROM skills
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
