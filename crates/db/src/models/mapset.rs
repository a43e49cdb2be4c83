//! Mapset models. The engine reads the submitter and the published flag;
//! everything else about a mapset lives outside this system.

use serde::Serialize;
use sqlx::FromRow;

use rankqueue_core::types::{DbId, Timestamp};

/// A row from the `mapsets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Mapset {
    pub id: DbId,
    pub submitter_id: DbId,
    pub title: String,
    pub mode: i16,
    pub ranked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Mapset {
    /// A mapset with a `ranked_at` timestamp is publicly available.
    pub fn is_ranked(&self) -> bool {
        self.ranked_at.is_some()
    }
}
