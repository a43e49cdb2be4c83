//! Domain logic for the ranking queue consensus engine.
//!
//! This crate holds the pure, I/O-free pieces of the queue workflow:
//!
//! - [`status::QueueStatus`] and [`action::ActionType`] — the closed enums
//!   every (status, action) decision is matched over.
//! - [`eligibility`] — side-effect-free predicate deciding whether a reviewer
//!   may cast a given action against a given item.
//! - [`transition`] — the exhaustive transition table applied after an action
//!   has been accepted and counted.
//! - [`config::ConsensusConfig`] — quorum thresholds and the on-hold timeout,
//!   validated at startup.

pub mod action;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod status;
pub mod transition;
pub mod types;
