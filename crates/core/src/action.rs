//! Reviewer action types and comment validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Minimum comment length for any action.
pub const MIN_COMMENT_LENGTH: usize = 1;

/// Maximum comment length for any action.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// The kind of action a reviewer casts against a queue item.
///
/// Stored in PostgreSQL as the `action_type` enum type. Actions are
/// append-only; retraction flips `is_active` off, rows are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "action_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Comment,
    Vote,
    Deny,
    Blacklist,
    OnHold,
    Resolve,
}

impl ActionType {
    /// Actions that require the "may approve content" privilege.
    /// Only Comment is open to any authenticated user.
    pub fn requires_approval_privilege(self) -> bool {
        !matches!(self, ActionType::Comment)
    }

    /// Snake-case form matching the database enum and event payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Comment => "comment",
            ActionType::Vote => "vote",
            ActionType::Deny => "deny",
            ActionType::Blacklist => "blacklist",
            ActionType::OnHold => "on_hold",
            ActionType::Resolve => "resolve",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate the comment accompanying an action.
///
/// Every action carries a comment explaining it. Actionable types are bounded
/// to [`MIN_COMMENT_LENGTH`]..=[`MAX_COMMENT_LENGTH`] characters; plain
/// comments share the same ceiling and must be non-empty.
pub fn validate_comment(comment: &str) -> Result<(), CoreError> {
    let len = comment.chars().count();
    if len < MIN_COMMENT_LENGTH {
        return Err(CoreError::Validation(
            "Comment must not be empty".to_string(),
        ));
    }
    if len > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}
