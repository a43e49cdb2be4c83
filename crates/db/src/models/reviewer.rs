//! Reviewer models, read from the identity-owned `users` table.

use serde::Serialize;
use sqlx::FromRow;

use rankqueue_core::eligibility::ReviewerView;
use rankqueue_core::types::DbId;

/// The reviewer fields the engine inspects.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reviewer {
    pub id: DbId,
    pub username: String,
    pub can_approve: bool,
    pub is_trial: bool,
}

impl From<&Reviewer> for ReviewerView {
    fn from(reviewer: &Reviewer) -> Self {
        ReviewerView {
            id: reviewer.id,
            can_approve: reviewer.can_approve,
            is_trial: reviewer.is_trial,
        }
    }
}
