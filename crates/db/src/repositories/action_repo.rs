//! Repository for the append-only `queue_actions` table.

use sqlx::{PgConnection, PgPool};

use rankqueue_core::action::ActionType;
use rankqueue_core::types::DbId;

use crate::models::action::{ActiveActionRow, QueueAction};

/// Column list for `queue_actions` queries.
const COLUMNS: &str =
    "id, queue_item_id, actor_id, action_type, is_active, comment, created_at, updated_at";

/// Provides access to the action log. Inserts and retractions run inside the
/// engine's transaction; reads for listings go through the pool.
pub struct ActionRepo;

impl ActionRepo {
    /// Append an active action to the log.
    pub async fn insert(
        conn: &mut PgConnection,
        queue_item_id: DbId,
        actor_id: DbId,
        action_type: ActionType,
        comment: &str,
    ) -> Result<QueueAction, sqlx::Error> {
        let query = format!(
            "INSERT INTO queue_actions (queue_item_id, actor_id, action_type, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueAction>(&query)
            .bind(queue_item_id)
            .bind(actor_id)
            .bind(action_type)
            .bind(comment)
            .fetch_one(conn)
            .await
    }

    /// Active actions for an item, joined with each actor's trial flag,
    /// as consumed by the eligibility checker.
    pub async fn active_for_item(
        conn: &mut PgConnection,
        queue_item_id: DbId,
    ) -> Result<Vec<ActiveActionRow>, sqlx::Error> {
        sqlx::query_as::<_, ActiveActionRow>(
            "SELECT a.actor_id, a.action_type, u.is_trial AS actor_is_trial
             FROM queue_actions a
             JOIN users u ON u.id = a.actor_id
             WHERE a.queue_item_id = $1 AND a.is_active",
        )
        .bind(queue_item_id)
        .fetch_all(conn)
        .await
    }

    /// Count active actions of one kind for an item.
    pub async fn count_active(
        conn: &mut PgConnection,
        queue_item_id: DbId,
        action_type: ActionType,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM queue_actions
             WHERE queue_item_id = $1 AND action_type = $2 AND is_active",
        )
        .bind(queue_item_id)
        .bind(action_type)
        .fetch_one(conn)
        .await
    }

    /// Retract all active votes and denials for an item.
    ///
    /// Runs when a transition resets the vote count, so the next cycle starts
    /// with a clean eligibility slate. Rows stay in the log for audit.
    pub async fn deactivate_consensus_actions(
        conn: &mut PgConnection,
        queue_item_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE queue_actions
             SET is_active = FALSE, updated_at = NOW()
             WHERE queue_item_id = $1 AND is_active AND action_type IN ('vote', 'deny')",
        )
        .bind(queue_item_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Full action log for an item, newest first.
    pub async fn list_for_item(
        pool: &PgPool,
        queue_item_id: DbId,
    ) -> Result<Vec<QueueAction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM queue_actions
             WHERE queue_item_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, QueueAction>(&query)
            .bind(queue_item_id)
            .fetch_all(pool)
            .await
    }

    /// Recount active actions of one kind through the pool. Used by callers
    /// verifying the denormalized vote count against the log.
    pub async fn recount_active(
        pool: &PgPool,
        queue_item_id: DbId,
        action_type: ActionType,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM queue_actions
             WHERE queue_item_id = $1 AND action_type = $2 AND is_active",
        )
        .bind(queue_item_id)
        .bind(action_type)
        .fetch_one(pool)
        .await
    }
}
