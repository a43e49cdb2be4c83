//! Auto-deny of items left on hold past the configured limit.
//!
//! A periodic task scans for items that have sat in the on-hold status for
//! longer than `hold_auto_deny_days` and denies each one through the regular
//! [`ConsensusEngine::submit_action`] path, acting as the configured system
//! actor. The system deny carries the same quorum weight as a human deny and
//! is subject to the same eligibility rules; if the denial quorum is not yet
//! met, the item is picked up again on a later tick.
//!
//! [`ConsensusEngine::submit_action`]: rankqueue_engine::ConsensusEngine::submit_action

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use rankqueue_core::action::ActionType;
use rankqueue_core::error::CoreError;
use rankqueue_core::types::DbId;
use rankqueue_db::repositories::QueueItemRepo;
use rankqueue_db::DbPool;
use rankqueue_engine::{ConsensusEngine, EngineError};

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Comment attached to every automatic denial.
const AUTO_DENY_COMMENT: &str =
    "Automatically denied: the item exceeded the on-hold time limit without resolution";

/// Run the hold-timeout loop until `cancel` is triggered.
pub async fn run(
    engine: Arc<ConsensusEngine>,
    pool: DbPool,
    system_actor_id: DbId,
    cancel: CancellationToken,
) {
    tracing::info!(
        hold_auto_deny_days = engine.config().hold_auto_deny_days,
        system_actor_id,
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Hold-timeout job started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Hold-timeout job stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = sweep(&engine, &pool, system_actor_id).await {
                    tracing::error!(error = %e, "Hold-timeout sweep failed");
                }
            }
        }
    }
}

/// One sweep pass: deny every item on hold since before the cutoff.
///
/// Returns the number of items denied. Per-item failures are logged and do
/// not stop the pass; only the initial listing query can fail the sweep.
pub async fn sweep(
    engine: &ConsensusEngine,
    pool: &DbPool,
    system_actor_id: DbId,
) -> Result<usize, sqlx::Error> {
    let cutoff = Utc::now() - chrono::Duration::days(engine.config().hold_auto_deny_days);
    let expired = QueueItemRepo::held_since(pool, cutoff).await?;

    if expired.is_empty() {
        tracing::debug!("Hold-timeout sweep: nothing expired");
        return Ok(0);
    }

    let mut denied = 0;
    for item in expired {
        match engine
            .submit_action(item.id, system_actor_id, ActionType::Deny, AUTO_DENY_COMMENT)
            .await
        {
            Ok(outcome) => {
                denied += 1;
                tracing::info!(
                    item_id = item.id,
                    transition = ?outcome.transition,
                    "Hold-timeout: auto-denied expired item"
                );
            }
            // The system actor already holds an active deny on this item
            // from a previous tick; the item waits for the human quorum.
            Err(EngineError::Core(CoreError::Forbidden(reason))) => {
                tracing::debug!(item_id = item.id, %reason, "Hold-timeout: deny not applicable");
            }
            Err(e) => {
                tracing::error!(item_id = item.id, error = %e, "Hold-timeout: deny failed");
            }
        }
    }

    Ok(denied)
}
