//! The status transition table.
//!
//! [`decide`] is evaluated after an action has passed eligibility and been
//! counted. It is a pure function of the current status, the action, the
//! recomputed active counts, and the configured thresholds. The caller
//! (the transition engine) persists the outcome and fires hooks.

use crate::action::ActionType;
use crate::config::ConsensusConfig;
use crate::status::QueueStatus;

/// Outcome of applying an accepted action to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The status the item moves to, if it moves at all.
    pub new_status: Option<QueueStatus>,
    /// Whether the cached vote count resets to zero. A reset also clears the
    /// active vote/deny log entries so eligibility starts a fresh cycle.
    pub reset_votes: bool,
}

impl Transition {
    fn none() -> Self {
        Self {
            new_status: None,
            reset_votes: false,
        }
    }

    fn to(status: QueueStatus, reset_votes: bool) -> Self {
        Self {
            new_status: Some(status),
            reset_votes,
        }
    }
}

/// Apply the transition table.
///
/// `vote_count` and `deny_count` are the active counts *including* the action
/// just appended. Eligibility has already filtered impossible pairs; this
/// function is still total over every (status, action) combination.
pub fn decide(
    status: QueueStatus,
    action: ActionType,
    vote_count: i64,
    deny_count: i64,
    config: &ConsensusConfig,
) -> Transition {
    match action {
        ActionType::Comment => Transition::none(),

        ActionType::Vote => {
            let quorum = vote_count >= config.votes_required;
            match status {
                QueueStatus::Pending | QueueStatus::Resolved if quorum => {
                    Transition::to(QueueStatus::Ranked, false)
                }
                _ => Transition::none(),
            }
        }

        ActionType::Deny => {
            if deny_count >= config.denials_required {
                Transition::to(QueueStatus::Denied, true)
            } else {
                Transition::none()
            }
        }

        ActionType::Blacklist => Transition::to(QueueStatus::Blacklisted, true),

        ActionType::OnHold => Transition::to(QueueStatus::OnHold, true),

        // Resolve puts a denied or held item back on the voting path. Votes
        // were already cleared by the transition that took it out.
        ActionType::Resolve => Transition::to(QueueStatus::Resolved, false),
    }
}
