//! Repository for cached `personal_bests` records.

use sqlx::PgPool;

use rankqueue_core::types::DbId;

/// Provides the dependent-record reset consumed by the ranking side effect.
pub struct PersonalBestRepo;

impl PersonalBestRepo {
    /// Insert a personal-best record. Seeding/test helper.
    pub async fn create(
        pool: &PgPool,
        mapset_id: DbId,
        user_id: DbId,
        score: i64,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO personal_bests (mapset_id, user_id, score)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(mapset_id)
        .bind(user_id)
        .bind(score)
        .fetch_one(pool)
        .await
    }

    /// Invalidate all live personal bests for a mapset. Idempotent.
    pub async fn invalidate_for_mapset(pool: &PgPool, mapset_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE personal_bests SET invalidated_at = NOW()
             WHERE mapset_id = $1 AND invalidated_at IS NULL",
        )
        .bind(mapset_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count live (not yet invalidated) records for a mapset.
    pub async fn count_live(pool: &PgPool, mapset_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM personal_bests
             WHERE mapset_id = $1 AND invalidated_at IS NULL",
        )
        .bind(mapset_id)
        .fetch_one(pool)
        .await
    }
}
