//! The queue item status enum and its ordering rules.
//!
//! Every status comparison in the system goes through this closed enum so the
//! compiler enforces that each (status, action) pair is covered.

use serde::{Deserialize, Serialize};

/// Current position of a queue item in the approval workflow.
///
/// Stored in PostgreSQL as the `queue_status` enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "queue_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// Awaiting votes; the initial status of every enqueued mapset.
    Pending,
    /// Denied by quorum; recoverable via a Resolve action and renewed voting.
    Denied,
    /// Removed from consideration. Terminal.
    Blacklisted,
    /// Parked pending discussion; auto-denied after a configured timeout.
    OnHold,
    /// Previously denied or held, issues resolved; back in the voting path.
    Resolved,
    /// Approved by quorum and published. Terminal.
    Ranked,
}

impl QueueStatus {
    /// Every status, in declaration order.
    pub const ALL: [QueueStatus; 6] = [
        QueueStatus::Pending,
        QueueStatus::Denied,
        QueueStatus::Blacklisted,
        QueueStatus::OnHold,
        QueueStatus::Resolved,
        QueueStatus::Ranked,
    ];

    /// Terminal statuses accept no further consensus actions.
    pub fn is_terminal(self) -> bool {
        matches!(self, QueueStatus::Ranked | QueueStatus::Blacklisted)
    }

    /// Listing sort priority: Resolved before Pending before OnHold,
    /// everything else last.
    pub fn listing_priority(self) -> i16 {
        match self {
            QueueStatus::Resolved => 0,
            QueueStatus::Pending => 1,
            QueueStatus::OnHold => 2,
            QueueStatus::Denied => 3,
            QueueStatus::Ranked => 4,
            QueueStatus::Blacklisted => 5,
        }
    }

    /// Snake-case form matching the database enum and event payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Denied => "denied",
            QueueStatus::Blacklisted => "blacklisted",
            QueueStatus::OnHold => "on_hold",
            QueueStatus::Resolved => "resolved",
            QueueStatus::Ranked => "ranked",
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QueueStatus {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(QueueStatus::Pending),
            "denied" => Ok(QueueStatus::Denied),
            "blacklisted" => Ok(QueueStatus::Blacklisted),
            "on_hold" => Ok(QueueStatus::OnHold),
            "resolved" => Ok(QueueStatus::Resolved),
            "ranked" => Ok(QueueStatus::Ranked),
            other => Err(crate::error::CoreError::Validation(format!(
                "Unknown queue status '{other}'"
            ))),
        }
    }
}
