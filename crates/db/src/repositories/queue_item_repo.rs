//! Repository for the `queue_items` table.

use sqlx::{PgConnection, PgPool};

use rankqueue_core::status::QueueStatus;
use rankqueue_core::types::DbId;

use crate::models::queue_item::{QueueItem, QueueItemView};

/// Column list for `queue_items` queries.
const COLUMNS: &str = "id, mapset_id, status, vote_count, version, created_at, updated_at";

/// SQL `CASE` expression ranking statuses by [`QueueStatus::listing_priority`],
/// so the listing order and the enum stay in lockstep.
fn status_priority_case() -> String {
    let arms: Vec<String> = QueueStatus::ALL
        .iter()
        .map(|s| format!("WHEN '{}' THEN {}", s.as_str(), s.listing_priority()))
        .collect();
    format!("CASE qi.status {} END", arms.join(" "))
}

/// Provides access to queue items. Status and vote count are written only
/// through [`update_versioned`](QueueItemRepo::update_versioned), which is
/// reserved for the transition engine.
pub struct QueueItemRepo;

impl QueueItemRepo {
    /// Enqueue a mapset, creating a pending item.
    pub async fn create(pool: &PgPool, mapset_id: DbId) -> Result<QueueItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO queue_items (mapset_id) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(mapset_id)
            .fetch_one(pool)
            .await
    }

    /// Find a queue item by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QueueItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queue_items WHERE id = $1");
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a queue item inside the engine's transaction.
    pub async fn find_by_id_tx(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<QueueItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queue_items WHERE id = $1");
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List queue items joined with their mapset, optionally filtered by
    /// status and game mode.
    ///
    /// Ordering: vote count descending, then status priority
    /// ([`QueueStatus::listing_priority`]), then last update descending.
    pub async fn list(
        pool: &PgPool,
        status: Option<QueueStatus>,
        mode: Option<i16>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QueueItemView>, sqlx::Error> {
        let query = format!(
            "SELECT
                qi.id, qi.mapset_id, m.title AS mapset_title, m.submitter_id,
                m.mode AS mapset_mode,
                qi.status, qi.vote_count, qi.created_at, qi.updated_at
             FROM queue_items qi
             JOIN mapsets m ON m.id = qi.mapset_id
             WHERE ($1::queue_status IS NULL OR qi.status = $1)
               AND ($2::smallint IS NULL OR m.mode = $2)
             ORDER BY qi.vote_count DESC, {}, qi.updated_at DESC
             LIMIT $3 OFFSET $4",
            status_priority_case()
        );
        sqlx::query_as::<_, QueueItemView>(&query)
            .bind(status)
            .bind(mode)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Conditionally update status and vote count, guarded by the version
    /// token.
    ///
    /// Returns `None` when the row moved under us (version mismatch); the
    /// engine rolls back and retries the whole sequence in that case.
    pub async fn update_versioned(
        conn: &mut PgConnection,
        id: DbId,
        expected_version: DbId,
        status: QueueStatus,
        vote_count: i32,
    ) -> Result<Option<QueueItem>, sqlx::Error> {
        let query = format!(
            "UPDATE queue_items
             SET status = $3, vote_count = $4, version = version + 1, updated_at = NOW()
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(status)
            .bind(vote_count)
            .fetch_optional(conn)
            .await
    }

    /// Items that have been on hold since before `cutoff`, oldest first.
    /// Consumed by the auto-deny job.
    pub async fn held_since(
        pool: &PgPool,
        cutoff: rankqueue_core::types::Timestamp,
    ) -> Result<Vec<QueueItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM queue_items
             WHERE status = 'on_hold' AND updated_at < $1
             ORDER BY updated_at ASC"
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }
}
