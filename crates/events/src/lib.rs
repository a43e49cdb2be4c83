//! Event bus and outbound delivery for the ranking queue.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`QueueEvent`] — the canonical domain event envelope, with the event
//!   type names used across the workflow in [`kinds`].
//! - [`EventPersistence`] — background service that durably writes every
//!   event to the `events` table.
//! - [`delivery`] — outbound webhook channel with bounded retry, and the
//!   [`Announcer`] task that broadcasts queue events to a team channel.

pub mod bus;
pub mod delivery;
pub mod kinds;
pub mod persistence;

pub use bus::{EventBus, QueueEvent};
pub use delivery::announcer::Announcer;
pub use delivery::webhook::WebhookDelivery;
pub use persistence::EventPersistence;
