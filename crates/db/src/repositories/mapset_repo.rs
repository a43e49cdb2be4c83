//! Repository for the `mapsets` table.

use sqlx::{PgConnection, PgPool};

use rankqueue_core::types::DbId;

use crate::models::mapset::Mapset;

/// Column list for `mapsets` queries.
const COLUMNS: &str = "id, submitter_id, title, mode, ranked_at, created_at, updated_at";

/// Provides access to mapsets under review.
pub struct MapsetRepo;

impl MapsetRepo {
    /// Register a mapset, returning the created row.
    pub async fn create(
        pool: &PgPool,
        submitter_id: DbId,
        title: &str,
        mode: i16,
    ) -> Result<Mapset, sqlx::Error> {
        let query = format!(
            "INSERT INTO mapsets (submitter_id, title, mode) VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mapset>(&query)
            .bind(submitter_id)
            .bind(title)
            .bind(mode)
            .fetch_one(pool)
            .await
    }

    /// Find a mapset by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Mapset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mapsets WHERE id = $1");
        sqlx::query_as::<_, Mapset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a mapset inside the engine's transaction.
    pub async fn find_by_id_tx(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Mapset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mapsets WHERE id = $1");
        sqlx::query_as::<_, Mapset>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Mark a mapset as publicly ranked. Idempotent: an already-ranked
    /// mapset keeps its original timestamp.
    pub async fn mark_ranked(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE mapsets SET ranked_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND ranked_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
