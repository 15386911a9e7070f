//! Recommendation persistence — trait-based, swappable store backend.
//!
//! `AppState` holds an `Arc<dyn RecommendationStore>`. The replacement
//! policy is part of the interface: callers get `replace_batch`, never a
//! separate delete and insert, so atomicity is enforced structurally.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::{AlgorithmType, JobRecommendationRow};

#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Replaces the user's batch for one algorithm tag as a unit. Rows
    /// carrying other algorithm tags must be untouched, and readers must
    /// never observe the old batch gone with the new one partially written.
    async fn replace_batch(
        &self,
        user_id: Uuid,
        algorithm: AlgorithmType,
        batch: &[JobRecommendationRow],
    ) -> Result<(), AppError>;

    /// The user's stored recommendations, best first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<JobRecommendationRow>, AppError>;
}

/// PostgreSQL-backed store. `replace_batch` runs delete + bulk insert in a
/// single transaction; a failure rolls back to the previous batch intact.
pub struct PgRecommendationStore {
    pool: PgPool,
}

impl PgRecommendationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommendationStore for PgRecommendationStore {
    async fn replace_batch(
        &self,
        user_id: Uuid,
        algorithm: AlgorithmType,
        batch: &[JobRecommendationRow],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM job_recommendations WHERE user_id = $1 AND algorithm = $2")
            .bind(user_id)
            .bind(algorithm.as_str())
            .execute(&mut *tx)
            .await?;

        for rec in batch {
            sqlx::query(
                r#"
                INSERT INTO job_recommendations
                    (id, user_id, job_id, score, reason, metadata, algorithm,
                     is_viewed, is_clicked, is_applied, created_at, expires_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(rec.id)
            .bind(rec.user_id)
            .bind(rec.job_id)
            .bind(rec.score)
            .bind(&rec.reason)
            .bind(&rec.metadata)
            .bind(&rec.algorithm)
            .bind(rec.is_viewed)
            .bind(rec.is_clicked)
            .bind(rec.is_applied)
            .bind(rec.created_at)
            .bind(rec.expires_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<JobRecommendationRow>, AppError> {
        let recs = sqlx::query_as(
            r#"
            SELECT * FROM job_recommendations
            WHERE user_id = $1
            ORDER BY score DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(recs)
    }
}
