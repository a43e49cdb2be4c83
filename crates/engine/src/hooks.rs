//! Side-effect hook contract.
//!
//! Hooks are supplied by the host environment and fired by the engine after
//! a unit of work commits. Each hook must be idempotent on retry: a hook
//! failure is logged and reported to the caller, never rolled back, so the
//! host may re-deliver.

use async_trait::async_trait;

use rankqueue_core::types::DbId;

/// Hook names as reported in [`SubmitOutcome::failed_hooks`](crate::engine::SubmitOutcome).
pub const PUBLISH: &str = "publish";
pub const RESET_DEPENDENTS: &str = "reset_dependents";
pub const RECORD_ACTIVITY: &str = "record_activity";
pub const REINDEX_SEARCH: &str = "reindex_search";
pub const NOTIFY: &str = "notify";
pub const ANNOUNCE: &str = "announce";

/// A side-effect hook failed after the transition was already committed.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<sqlx::Error> for HookError {
    fn from(e: sqlx::Error) -> Self {
        Self(e.to_string())
    }
}

/// The side effects the engine fires on committed outcomes.
///
/// Firing rules (fixed order, failures isolated per hook):
///
/// - `publish`, `reset_dependents`, `reindex_search` — transition to Ranked.
/// - `record_activity` — transitions to Ranked and Denied.
/// - `notify` — every transition, plus non-transitioning comment/vote/deny
///   actions that still warrant submitter visibility.
/// - `announce` — every accepted action.
#[async_trait]
pub trait SideEffects: Send + Sync {
    /// Mark the mapset as publicly available.
    async fn publish(&self, mapset_id: DbId) -> Result<(), HookError>;

    /// Invalidate cached records that depended on the mapset's pre-ranked
    /// state.
    async fn reset_dependents(&self, mapset_id: DbId) -> Result<(), HookError>;

    /// Write an activity-feed entry for the submitter.
    async fn record_activity(
        &self,
        submitter_id: DbId,
        event_kind: &str,
        mapset_id: DbId,
    ) -> Result<(), HookError>;

    /// Ask the search subsystem to reindex the mapset.
    async fn reindex_search(&self, mapset_id: DbId) -> Result<(), HookError>;

    /// Notify a user about an outcome.
    async fn notify(
        &self,
        recipient_id: DbId,
        event_kind: &str,
        payload: &serde_json::Value,
    ) -> Result<(), HookError>;

    /// Broadcast the action outward (team channel, integrations).
    async fn announce(
        &self,
        event_kind: &str,
        mapset_id: DbId,
        actor_id: DbId,
    ) -> Result<(), HookError>;
}
