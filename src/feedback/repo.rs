use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Append-only feedback row. There is deliberately no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub user_email: String,
    pub message: String,
    pub submitted_at: OffsetDateTime,
}

impl Feedback {
    pub async fn insert(db: &PgPool, user_email: &str, message: &str) -> anyhow::Result<Feedback> {
        let row = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (user_email, message)
            VALUES ($1, $2)
            RETURNING id, user_email, message, submitted_at
            "#,
        )
        .bind(user_email)
        .bind(message)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Newest first, for the admin dashboard.
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, user_email, message, submitted_at
            FROM feedback
            ORDER BY submitted_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
