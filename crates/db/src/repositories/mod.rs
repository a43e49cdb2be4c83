//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` as the first argument. Methods that must participate in the
//! engine's unit of work take `&mut PgConnection` instead and are executed
//! inside the caller's transaction.

pub mod action_repo;
pub mod event_repo;
pub mod mapset_repo;
pub mod notification_repo;
pub mod personal_best_repo;
pub mod queue_item_repo;
pub mod reviewer_repo;

pub use action_repo::ActionRepo;
pub use event_repo::EventRepo;
pub use mapset_repo::MapsetRepo;
pub use notification_repo::NotificationRepo;
pub use personal_best_repo::PersonalBestRepo;
pub use queue_item_repo::QueueItemRepo;
pub use reviewer_repo::ReviewerRepo;
