//! Queue item models.

use serde::Serialize;
use sqlx::FromRow;

use rankqueue_core::status::QueueStatus;
use rankqueue_core::types::{DbId, Timestamp};

/// A row from the `queue_items` table.
///
/// `vote_count` is denormalized from the active action log; the transition
/// engine is the only writer and keeps it consistent. `version` is the
/// optimistic-concurrency token compared on every engine write.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueItem {
    pub id: DbId,
    pub mapset_id: DbId,
    pub status: QueueStatus,
    pub vote_count: i32,
    pub version: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A listing row joining the queue item with its mapset.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueItemView {
    pub id: DbId,
    pub mapset_id: DbId,
    pub mapset_title: String,
    pub submitter_id: DbId,
    pub mapset_mode: i16,
    pub status: QueueStatus,
    pub vote_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
