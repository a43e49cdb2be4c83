//! Pure eligibility checks run before any action is appended.
//!
//! [`check`] inspects the target item, the acting reviewer, and the item's
//! active action log, and either clears the action or returns the typed
//! rejection the caller surfaces unchanged. Nothing here mutates state.

use crate::action::{validate_comment, ActionType};
use crate::error::CoreError;
use crate::status::QueueStatus;
use crate::types::DbId;

/// The slice of a reviewer the eligibility rules inspect.
///
/// Owned by the identity subsystem; the engine reads these three fields only.
#[derive(Debug, Clone)]
pub struct ReviewerView {
    pub id: DbId,
    /// The "may approve content" privilege.
    pub can_approve: bool,
    /// Trial reviewers are subject to mutual-exclusion rules.
    pub is_trial: bool,
}

/// An active log entry as seen by the eligibility rules.
#[derive(Debug, Clone)]
pub struct ActiveAction {
    pub actor_id: DbId,
    pub action_type: ActionType,
    pub actor_is_trial: bool,
}

/// Everything [`check`] looks at for one action request.
#[derive(Debug)]
pub struct EligibilityInput<'a> {
    /// Current status of the queue item.
    pub status: QueueStatus,
    /// Whether the underlying mapset is already published.
    pub mapset_ranked: bool,
    /// The mapset's original submitter.
    pub submitter_id: DbId,
    /// The reviewer casting the action.
    pub actor: &'a ReviewerView,
    /// The requested action.
    pub action: ActionType,
    /// The comment accompanying the action.
    pub comment: &'a str,
    /// All currently-active actions logged against the item.
    pub active_actions: &'a [ActiveAction],
}

/// Decide whether the requested action may be appended.
///
/// Returns `Ok(())` when eligible, otherwise a [`CoreError::Validation`] for
/// malformed input or a [`CoreError::Forbidden`] naming the violated rule.
pub fn check(input: &EligibilityInput<'_>) -> Result<(), CoreError> {
    validate_comment(input.comment)?;

    if input.action.requires_approval_privilege() && !input.actor.can_approve {
        return Err(CoreError::Forbidden(format!(
            "The {} action requires content-approval privileges",
            input.action
        )));
    }

    // Comments stay open for audit discussion even on settled items; every
    // other action is blocked once the mapset is published or the item is in
    // a terminal status.
    if input.action != ActionType::Comment {
        if input.mapset_ranked {
            return Err(CoreError::Forbidden(
                "Mapset is already ranked".to_string(),
            ));
        }
        match input.status {
            QueueStatus::Blacklisted => {
                return Err(CoreError::Forbidden(
                    "Queue item is blacklisted and accepts no further actions".to_string(),
                ));
            }
            QueueStatus::Ranked => {
                return Err(CoreError::Forbidden(
                    "Queue item is already ranked".to_string(),
                ));
            }
            _ => {}
        }
    }

    match input.action {
        ActionType::Comment => Ok(()),
        ActionType::Vote => check_vote(input),
        ActionType::Deny => check_deny(input),
        ActionType::Blacklist => Ok(()),
        ActionType::OnHold => {
            if input.status == QueueStatus::OnHold {
                return Err(CoreError::Forbidden(
                    "Queue item is already on hold".to_string(),
                ));
            }
            Ok(())
        }
        ActionType::Resolve => {
            if input.status == QueueStatus::Resolved {
                return Err(CoreError::Forbidden(
                    "Queue item is already resolved".to_string(),
                ));
            }
            Ok(())
        }
    }
}

fn check_vote(input: &EligibilityInput<'_>) -> Result<(), CoreError> {
    if !matches!(input.status, QueueStatus::Pending | QueueStatus::Resolved) {
        return Err(CoreError::Forbidden(format!(
            "Votes are only accepted while pending or resolved, item is {}",
            input.status
        )));
    }

    if input.actor.id == input.submitter_id {
        return Err(CoreError::Forbidden(
            "Submitters may not vote on their own mapset".to_string(),
        ));
    }

    check_duplicate_and_trial(input, ActionType::Vote)
}

fn check_deny(input: &EligibilityInput<'_>) -> Result<(), CoreError> {
    // Blacklisted is rejected above; Denied rejects further denials but
    // still admits blacklist/hold actions.
    if input.status == QueueStatus::Denied {
        return Err(CoreError::Forbidden(
            "Queue item is already denied".to_string(),
        ));
    }

    check_duplicate_and_trial(input, ActionType::Deny)
}

/// Shared by Vote and Deny: one active action of the kind per reviewer, and
/// no two trial reviewers may both hold an active action of the kind.
fn check_duplicate_and_trial(
    input: &EligibilityInput<'_>,
    kind: ActionType,
) -> Result<(), CoreError> {
    let existing = input
        .active_actions
        .iter()
        .filter(|a| a.action_type == kind);

    for action in existing {
        if action.actor_id == input.actor.id {
            return Err(CoreError::Forbidden(format!(
                "Reviewer already has an active {kind} on this item"
            )));
        }
        if input.actor.is_trial && action.actor_is_trial {
            return Err(CoreError::Forbidden(format!(
                "Another trial reviewer already has an active {kind} on this item"
            )));
        }
    }

    Ok(())
}
