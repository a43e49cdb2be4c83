//! Route definitions for the ranking queue.
//!
//! Every endpoint requires authentication; consensus actions additionally
//! require approval privileges, checked by the engine per request.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::queue;
use crate::state::AppState;

/// Routes mounted at `/queue`.
///
/// ```text
/// GET  /                       -> list_queue
/// POST /                       -> enqueue
/// GET  /{item_id}              -> get_item
/// GET  /{item_id}/actions      -> list_actions
/// POST /{item_id}/vote         -> vote
/// POST /{item_id}/deny         -> deny
/// POST /{item_id}/blacklist    -> blacklist
/// POST /{item_id}/hold         -> hold
/// POST /{item_id}/resolve      -> resolve
/// POST /{item_id}/comment      -> comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(queue::list_queue).post(queue::enqueue))
        .route("/{item_id}", get(queue::get_item))
        .route("/{item_id}/actions", get(queue::list_actions))
        .route("/{item_id}/vote", post(queue::vote))
        .route("/{item_id}/deny", post(queue::deny))
        .route("/{item_id}/blacklist", post(queue::blacklist))
        .route("/{item_id}/hold", post(queue::hold))
        .route("/{item_id}/resolve", post(queue::resolve))
        .route("/{item_id}/comment", post(queue::comment))
}
