//! Read access to reviewers in the identity-owned `users` table.

use sqlx::{PgConnection, PgPool};

use rankqueue_core::types::DbId;

use crate::models::reviewer::Reviewer;

/// Column list for reviewer queries.
const COLUMNS: &str = "id, username, can_approve, is_trial";

/// Provides read access to reviewer records. Creation exists for seeding and
/// tests; account lifecycle is owned by the identity subsystem.
pub struct ReviewerRepo;

impl ReviewerRepo {
    /// Create a user row. Seeding/test helper.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        can_approve: bool,
        is_trial: bool,
    ) -> Result<Reviewer, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, can_approve, is_trial)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reviewer>(&query)
            .bind(username)
            .bind(can_approve)
            .bind(is_trial)
            .fetch_one(pool)
            .await
    }

    /// Find a reviewer by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reviewer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, Reviewer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a reviewer inside the engine's transaction.
    pub async fn find_by_id_tx(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Reviewer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, Reviewer>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
