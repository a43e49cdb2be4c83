//! Row types and DTOs for the ranking queue tables.

pub mod action;
pub mod event;
pub mod mapset;
pub mod notification;
pub mod queue_item;
pub mod reviewer;

pub use action::{ActiveActionRow, QueueAction};
pub use event::StoredEvent;
pub use mapset::Mapset;
pub use notification::Notification;
pub use queue_item::{QueueItem, QueueItemView};
pub use reviewer::Reviewer;
