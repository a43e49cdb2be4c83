//! Event type names published by the consensus workflow.

/// A reviewer commented on a queue item.
pub const QUEUE_COMMENT: &str = "queue.comment";
/// A vote was cast (below quorum).
pub const QUEUE_VOTE: &str = "queue.vote";
/// A denial was cast (below quorum).
pub const QUEUE_DENY: &str = "queue.deny";
/// The item reached vote quorum and was ranked.
pub const QUEUE_RANKED: &str = "queue.ranked";
/// The item reached denial quorum and was denied.
pub const QUEUE_DENIED: &str = "queue.denied";
/// The item was blacklisted.
pub const QUEUE_BLACKLISTED: &str = "queue.blacklisted";
/// The item was placed on hold.
pub const QUEUE_ON_HOLD: &str = "queue.on_hold";
/// The item's issues were marked resolved.
pub const QUEUE_RESOLVED: &str = "queue.resolved";
/// A ranked mapset should be reindexed by the search subsystem.
pub const SEARCH_REINDEX: &str = "search.reindex";
/// Activity-feed entry: the submitter's mapset was ranked.
pub const ACTIVITY_RANKED: &str = "activity.ranked";
/// Activity-feed entry: the submitter's mapset was denied.
pub const ACTIVITY_DENIED: &str = "activity.denied";
