//! Consensus thresholds consumed by the transition engine.

use crate::error::CoreError;

/// Quorum thresholds and the on-hold timeout.
///
/// The engine refuses to operate with any threshold below 1; construct via
/// [`ConsensusConfig::new`] (or call [`validate`](ConsensusConfig::validate)
/// after loading from the environment) so misconfiguration fails at startup.
#[derive(Debug, Clone)]
pub struct ConsensusConfig {
    /// Active votes needed to rank an item.
    pub votes_required: i64,
    /// Active denials needed to deny an item.
    pub denials_required: i64,
    /// Days an item may sit on hold before the system actor auto-denies it.
    pub hold_auto_deny_days: i64,
}

impl ConsensusConfig {
    /// Build a validated configuration.
    pub fn new(
        votes_required: i64,
        denials_required: i64,
        hold_auto_deny_days: i64,
    ) -> Result<Self, CoreError> {
        let config = Self {
            votes_required,
            denials_required,
            hold_auto_deny_days,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold is a positive integer.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in [
            ("VOTES_REQUIRED", self.votes_required),
            ("DENIALS_REQUIRED", self.denials_required),
            ("HOLD_AUTO_DENY_DAYS", self.hold_auto_deny_days),
        ] {
            if value < 1 {
                return Err(CoreError::Validation(format!(
                    "{name} must be >= 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}
