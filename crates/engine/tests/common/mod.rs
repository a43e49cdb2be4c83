//! Shared fixtures for engine integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::PgPool;

use rankqueue_core::config::ConsensusConfig;
use rankqueue_core::types::DbId;
use rankqueue_db::repositories::{MapsetRepo, QueueItemRepo, ReviewerRepo};
use rankqueue_engine::{ConsensusEngine, HookError, SideEffects};

/// Records every hook invocation by name, all of them succeeding.
#[derive(Default)]
pub struct RecordingEffects {
    pub calls: Mutex<Vec<String>>,
}

impl RecordingEffects {
    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    /// How many times the named hook fired.
    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }
}

#[async_trait]
impl SideEffects for RecordingEffects {
    async fn publish(&self, _mapset_id: DbId) -> Result<(), HookError> {
        self.record("publish");
        Ok(())
    }

    async fn reset_dependents(&self, _mapset_id: DbId) -> Result<(), HookError> {
        self.record("reset_dependents");
        Ok(())
    }

    async fn record_activity(
        &self,
        _submitter_id: DbId,
        _event_kind: &str,
        _mapset_id: DbId,
    ) -> Result<(), HookError> {
        self.record("record_activity");
        Ok(())
    }

    async fn reindex_search(&self, _mapset_id: DbId) -> Result<(), HookError> {
        self.record("reindex_search");
        Ok(())
    }

    async fn notify(
        &self,
        _recipient_id: DbId,
        _event_kind: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), HookError> {
        self.record("notify");
        Ok(())
    }

    async fn announce(
        &self,
        _event_kind: &str,
        _mapset_id: DbId,
        _actor_id: DbId,
    ) -> Result<(), HookError> {
        self.record("announce");
        Ok(())
    }
}

/// Effects whose publish and reindex hooks always fail; the rest succeed.
#[derive(Default)]
pub struct FailingEffects;

#[async_trait]
impl SideEffects for FailingEffects {
    async fn publish(&self, _mapset_id: DbId) -> Result<(), HookError> {
        Err(HookError::new("publish backend unavailable"))
    }

    async fn reset_dependents(&self, _mapset_id: DbId) -> Result<(), HookError> {
        Ok(())
    }

    async fn record_activity(
        &self,
        _submitter_id: DbId,
        _event_kind: &str,
        _mapset_id: DbId,
    ) -> Result<(), HookError> {
        Ok(())
    }

    async fn reindex_search(&self, _mapset_id: DbId) -> Result<(), HookError> {
        Err(HookError::new("search backend unavailable"))
    }

    async fn notify(
        &self,
        _recipient_id: DbId,
        _event_kind: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), HookError> {
        Ok(())
    }

    async fn announce(
        &self,
        _event_kind: &str,
        _mapset_id: DbId,
        _actor_id: DbId,
    ) -> Result<(), HookError> {
        Ok(())
    }
}

/// Build an engine over the test pool with the given thresholds.
pub fn engine(
    pool: &PgPool,
    effects: Arc<dyn SideEffects>,
    votes_required: i64,
    denials_required: i64,
) -> ConsensusEngine {
    let config = ConsensusConfig::new(votes_required, denials_required, 7).unwrap();
    ConsensusEngine::new(pool.clone(), config, effects).unwrap()
}

/// Create a full (non-trial) reviewer with approval privileges.
pub async fn seed_reviewer(pool: &PgPool, username: &str) -> DbId {
    ReviewerRepo::create(pool, username, true, false)
        .await
        .unwrap()
        .id
}

/// Create a trial reviewer with approval privileges.
pub async fn seed_trial_reviewer(pool: &PgPool, username: &str) -> DbId {
    ReviewerRepo::create(pool, username, true, true)
        .await
        .unwrap()
        .id
}

/// Create a submitter, their mapset, and a pending queue item.
///
/// Returns `(queue_item_id, mapset_id, submitter_id)`.
pub async fn seed_item(pool: &PgPool) -> (DbId, DbId, DbId) {
    let submitter = ReviewerRepo::create(pool, "submitter", false, false)
        .await
        .unwrap();
    let mapset = MapsetRepo::create(pool, submitter.id, "Test Mapset", 1)
        .await
        .unwrap();
    let item = QueueItemRepo::create(pool, mapset.id).await.unwrap();
    (item.id, mapset.id, submitter.id)
}
