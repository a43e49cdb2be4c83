//! Outbound delivery channels.

pub mod announcer;
pub mod webhook;
