//! Action log models.

use serde::Serialize;
use sqlx::FromRow;

use rankqueue_core::action::ActionType;
use rankqueue_core::eligibility::ActiveAction;
use rankqueue_core::types::{DbId, Timestamp};

/// A row from the append-only `queue_actions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueAction {
    pub id: DbId,
    pub queue_item_id: DbId,
    pub actor_id: DbId,
    pub action_type: ActionType,
    pub is_active: bool,
    pub comment: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The projection of an active action the eligibility checker needs,
/// joined with the actor's trial flag.
#[derive(Debug, Clone, FromRow)]
pub struct ActiveActionRow {
    pub actor_id: DbId,
    pub action_type: ActionType,
    pub actor_is_trial: bool,
}

impl From<ActiveActionRow> for ActiveAction {
    fn from(row: ActiveActionRow) -> Self {
        ActiveAction {
            actor_id: row.actor_id,
            action_type: row.action_type,
            actor_is_trial: row.actor_is_trial,
        }
    }
}
