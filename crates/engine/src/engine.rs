//! The consensus engine.
//!
//! `submit_action` runs the full sequence — load, eligibility, append,
//! recount, transition, persist — inside one transaction per attempt, with
//! the queue item's version column as the optimistic-concurrency token.
//! A version mismatch rolls the attempt back (the appended action included)
//! and retries from the load step, so no dangling action can outlive its
//! item update. Hooks fire only after a commit.

use rankqueue_core::action::ActionType;
use rankqueue_core::config::ConsensusConfig;
use rankqueue_core::eligibility::{self, ActiveAction, EligibilityInput, ReviewerView};
use rankqueue_core::error::CoreError;
use rankqueue_core::status::QueueStatus;
use rankqueue_core::transition;
use rankqueue_core::types::DbId;
use rankqueue_db::models::{QueueAction, QueueItem};
use rankqueue_db::repositories::{ActionRepo, MapsetRepo, QueueItemRepo, ReviewerRepo};
use rankqueue_db::DbPool;
use rankqueue_events::kinds;
use serde::Serialize;
use std::sync::Arc;

use crate::error::EngineError;
use crate::hooks::{self, HookError, SideEffects};

/// Attempts before an optimistic-concurrency conflict is surfaced.
const MAX_CONFLICT_RETRIES: u32 = 3;

/// The result of an accepted action.
#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    /// The queue item after the action was applied.
    pub item: QueueItem,
    /// The appended log entry.
    pub action: QueueAction,
    /// The status the item transitioned to, when a threshold was crossed.
    pub transition: Option<QueueStatus>,
    /// Hooks that failed after the transition committed. The state change
    /// itself succeeded; these must be reconciled out of band.
    pub failed_hooks: Vec<String>,
}

/// One committed unit of work, handed to the hook dispatch.
struct Committed {
    item: QueueItem,
    action: QueueAction,
    transition: Option<QueueStatus>,
    submitter_id: DbId,
}

/// The sole mutator of queue items and the action log.
pub struct ConsensusEngine {
    pool: DbPool,
    config: ConsensusConfig,
    effects: Arc<dyn SideEffects>,
}

impl ConsensusEngine {
    /// Build an engine. Fails fast on invalid thresholds.
    pub fn new(
        pool: DbPool,
        config: ConsensusConfig,
        effects: Arc<dyn SideEffects>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            pool,
            config,
            effects,
        })
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Apply one reviewer action to one queue item.
    ///
    /// Returns the updated item, the appended action, the transition (if
    /// any) and the names of hooks that failed after the commit. Eligibility
    /// rejections come back as [`CoreError::Forbidden`] /
    /// [`CoreError::Validation`] with nothing written.
    pub async fn submit_action(
        &self,
        item_id: DbId,
        actor_id: DbId,
        action: ActionType,
        comment: &str,
    ) -> Result<SubmitOutcome, EngineError> {
        for attempt in 1..=MAX_CONFLICT_RETRIES {
            match self.try_submit(item_id, actor_id, action, comment).await? {
                Some(committed) => {
                    if let Some(new_status) = committed.transition {
                        tracing::info!(
                            item_id,
                            actor_id,
                            %action,
                            status = %new_status,
                            "Queue item transitioned"
                        );
                    } else {
                        tracing::info!(item_id, actor_id, %action, "Action recorded");
                    }

                    let failed_hooks = self.fire_hooks(&committed).await;
                    return Ok(SubmitOutcome {
                        item: committed.item,
                        action: committed.action,
                        transition: committed.transition,
                        failed_hooks,
                    });
                }
                None => {
                    tracing::warn!(
                        item_id,
                        actor_id,
                        attempt,
                        "Concurrent update detected, retrying"
                    );
                }
            }
        }

        Err(EngineError::Core(CoreError::Conflict(format!(
            "Queue item {item_id} is under concurrent modification, retries exhausted"
        ))))
    }

    /// One optimistic attempt. `Ok(None)` means the version check failed and
    /// the caller should retry; everything the attempt wrote is rolled back.
    async fn try_submit(
        &self,
        item_id: DbId,
        actor_id: DbId,
        action: ActionType,
        comment: &str,
    ) -> Result<Option<Committed>, EngineError> {
        let mut tx = self.pool.begin().await?;

        let item = QueueItemRepo::find_by_id_tx(&mut *tx, item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "QueueItem",
                id: item_id,
            })?;
        let mapset = MapsetRepo::find_by_id_tx(&mut *tx, item.mapset_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Mapset",
                id: item.mapset_id,
            })?;
        let actor = ReviewerRepo::find_by_id_tx(&mut *tx, actor_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Reviewer",
                id: actor_id,
            })?;

        let active: Vec<ActiveAction> = ActionRepo::active_for_item(&mut *tx, item.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        eligibility::check(&EligibilityInput {
            status: item.status,
            mapset_ranked: mapset.is_ranked(),
            submitter_id: mapset.submitter_id,
            actor: &ReviewerView::from(&actor),
            action,
            comment,
            active_actions: &active,
        })?;

        let appended = ActionRepo::insert(&mut *tx, item.id, actor_id, action, comment).await?;

        let vote_count = ActionRepo::count_active(&mut *tx, item.id, ActionType::Vote).await?;
        let deny_count = ActionRepo::count_active(&mut *tx, item.id, ActionType::Deny).await?;

        let outcome = transition::decide(item.status, action, vote_count, deny_count, &self.config);

        let new_vote_count = if outcome.reset_votes {
            ActionRepo::deactivate_consensus_actions(&mut *tx, item.id).await?;
            0
        } else {
            vote_count as i32
        };
        let new_status = outcome.new_status.unwrap_or(item.status);

        let updated = QueueItemRepo::update_versioned(
            &mut *tx,
            item.id,
            item.version,
            new_status,
            new_vote_count,
        )
        .await?;

        match updated {
            Some(updated_item) => {
                tx.commit().await?;
                Ok(Some(Committed {
                    item: updated_item,
                    action: appended,
                    transition: outcome.new_status,
                    submitter_id: mapset.submitter_id,
                }))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }

    /// Fire hooks for a committed outcome, in fixed order, isolating
    /// failures per hook. Returns the names of hooks that failed.
    async fn fire_hooks(&self, committed: &Committed) -> Vec<String> {
        let mut failed = Vec::new();
        let item = &committed.item;
        let event_kind = event_kind_for(committed.transition, committed.action.action_type);

        if committed.transition == Some(QueueStatus::Ranked) {
            guard(
                &mut failed,
                hooks::PUBLISH,
                self.effects.publish(item.mapset_id).await,
            );
            guard(
                &mut failed,
                hooks::RESET_DEPENDENTS,
                self.effects.reset_dependents(item.mapset_id).await,
            );
        }

        match committed.transition {
            Some(QueueStatus::Ranked) => guard(
                &mut failed,
                hooks::RECORD_ACTIVITY,
                self.effects
                    .record_activity(committed.submitter_id, kinds::ACTIVITY_RANKED, item.mapset_id)
                    .await,
            ),
            Some(QueueStatus::Denied) => guard(
                &mut failed,
                hooks::RECORD_ACTIVITY,
                self.effects
                    .record_activity(committed.submitter_id, kinds::ACTIVITY_DENIED, item.mapset_id)
                    .await,
            ),
            _ => {}
        }

        if committed.transition == Some(QueueStatus::Ranked) {
            guard(
                &mut failed,
                hooks::REINDEX_SEARCH,
                self.effects.reindex_search(item.mapset_id).await,
            );
        }

        let notify_worthy = committed.transition.is_some()
            || matches!(
                committed.action.action_type,
                ActionType::Comment | ActionType::Vote | ActionType::Deny
            );
        if notify_worthy {
            guard(
                &mut failed,
                hooks::NOTIFY,
                self.effects
                    .notify(
                        committed.submitter_id,
                        event_kind,
                        &serde_json::json!({
                            "queue_item_id": item.id,
                            "mapset_id": item.mapset_id,
                            "status": item.status,
                        }),
                    )
                    .await,
            );
        }

        guard(
            &mut failed,
            hooks::ANNOUNCE,
            self.effects
                .announce(event_kind, item.mapset_id, committed.action.actor_id)
                .await,
        );

        failed
    }
}

/// Record a hook result, logging the failure and collecting its name.
fn guard(failed: &mut Vec<String>, name: &'static str, result: Result<(), HookError>) {
    if let Err(e) = result {
        tracing::error!(hook = name, error = %e, "Side-effect hook failed after commit");
        failed.push(name.to_string());
    }
}

/// The event type describing a committed outcome.
fn event_kind_for(transition: Option<QueueStatus>, action: ActionType) -> &'static str {
    match transition {
        Some(QueueStatus::Ranked) => kinds::QUEUE_RANKED,
        Some(QueueStatus::Denied) => kinds::QUEUE_DENIED,
        Some(QueueStatus::Blacklisted) => kinds::QUEUE_BLACKLISTED,
        Some(QueueStatus::OnHold) => kinds::QUEUE_ON_HOLD,
        Some(QueueStatus::Resolved) => kinds::QUEUE_RESOLVED,
        // Pending is never a transition target; treat as the plain action.
        Some(QueueStatus::Pending) | None => match action {
            ActionType::Comment => kinds::QUEUE_COMMENT,
            ActionType::Vote => kinds::QUEUE_VOTE,
            ActionType::Deny => kinds::QUEUE_DENY,
            ActionType::Blacklist => kinds::QUEUE_BLACKLISTED,
            ActionType::OnHold => kinds::QUEUE_ON_HOLD,
            ActionType::Resolve => kinds::QUEUE_RESOLVED,
        },
    }
}
