//! Production wiring of the side-effect hooks.
//!
//! Database-backed effects go through the repositories; fan-out effects
//! (announcements, search reindex) publish on the event bus where the
//! persistence, announcer and indexing subscribers pick them up.

use std::sync::Arc;

use async_trait::async_trait;

use rankqueue_core::types::DbId;
use rankqueue_db::repositories::{
    EventRepo, MapsetRepo, NotificationRepo, PersonalBestRepo,
};
use rankqueue_db::DbPool;
use rankqueue_events::{kinds, EventBus, QueueEvent};

use crate::hooks::{HookError, SideEffects};

/// Host-supplied side effects backed by the database and the event bus.
pub struct ProductionEffects {
    pool: DbPool,
    bus: Arc<EventBus>,
}

impl ProductionEffects {
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self { pool, bus }
    }
}

#[async_trait]
impl SideEffects for ProductionEffects {
    async fn publish(&self, mapset_id: DbId) -> Result<(), HookError> {
        MapsetRepo::mark_ranked(&self.pool, mapset_id).await?;
        Ok(())
    }

    async fn reset_dependents(&self, mapset_id: DbId) -> Result<(), HookError> {
        let reset = PersonalBestRepo::invalidate_for_mapset(&self.pool, mapset_id).await?;
        tracing::debug!(mapset_id, reset, "Invalidated dependent personal bests");
        Ok(())
    }

    async fn record_activity(
        &self,
        submitter_id: DbId,
        event_kind: &str,
        mapset_id: DbId,
    ) -> Result<(), HookError> {
        EventRepo::insert(
            &self.pool,
            event_kind,
            Some("mapset"),
            Some(mapset_id),
            Some(submitter_id),
            &serde_json::json!({ "mapset_id": mapset_id }),
        )
        .await?;
        Ok(())
    }

    async fn reindex_search(&self, mapset_id: DbId) -> Result<(), HookError> {
        self.bus.publish(
            QueueEvent::new(kinds::SEARCH_REINDEX).with_source("mapset", mapset_id),
        );
        Ok(())
    }

    async fn notify(
        &self,
        recipient_id: DbId,
        event_kind: &str,
        payload: &serde_json::Value,
    ) -> Result<(), HookError> {
        NotificationRepo::create(&self.pool, recipient_id, event_kind, payload).await?;
        Ok(())
    }

    async fn announce(
        &self,
        event_kind: &str,
        mapset_id: DbId,
        actor_id: DbId,
    ) -> Result<(), HookError> {
        self.bus.publish(
            QueueEvent::new(event_kind)
                .with_source("mapset", mapset_id)
                .with_actor(actor_id)
                .with_payload(serde_json::json!({ "mapset_id": mapset_id })),
        );
        Ok(())
    }
}
