//! Session visit counter repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::AppResult;

#[derive(Clone)]
pub struct VisitsRepository {
    pool: Pool<Postgres>,
}

impl VisitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Record a visit for the given session and return the updated count
    pub async fn record_visit(&self, session_key: Uuid) -> AppResult<i32> {
        let count: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO session_visits (session_key, num_visits)
            VALUES ($1, 1)
            ON CONFLICT (session_key)
            DO UPDATE SET num_visits = session_visits.num_visits + 1
            RETURNING num_visits
            "#,
        )
        .bind(session_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
