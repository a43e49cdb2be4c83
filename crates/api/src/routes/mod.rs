pub mod health;
pub mod queue;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /queue                       list (GET), enqueue (POST)
/// /queue/{item_id}             single item (GET)
/// /queue/{item_id}/actions     action log (GET)
/// /queue/{item_id}/vote        cast a vote (POST)
/// /queue/{item_id}/deny        cast a denial (POST)
/// /queue/{item_id}/blacklist   blacklist the item (POST)
/// /queue/{item_id}/hold        place the item on hold (POST)
/// /queue/{item_id}/resolve     mark issues resolved (POST)
/// /queue/{item_id}/comment     comment without consensus weight (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/queue", queue::router())
}
