//! The state transition engine: the sole mutator of queue items and the
//! action log.
//!
//! [`ConsensusEngine::submit_action`] is the single mutating entry point for
//! the whole workflow. It validates eligibility, appends the action,
//! recomputes quorum counts, applies the transition table, and persists the
//! result in one unit of work guarded by an optimistic version check. Side
//! effects fire only after the transaction commits and are isolated per hook.

pub mod effects;
pub mod engine;
pub mod error;
pub mod hooks;

pub use effects::ProductionEffects;
pub use engine::{ConsensusEngine, SubmitOutcome};
pub use error::EngineError;
pub use hooks::{HookError, SideEffects};
