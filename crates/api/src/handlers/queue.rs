//! Handlers for the `/queue` resource.
//!
//! All mutations go through [`ConsensusEngine::submit_action`]; handlers only
//! translate HTTP to engine calls and outcomes back to JSON. Hook failures
//! after a committed transition are reported in the response body
//! (`failed_hooks`) while the status stays 200.
//!
//! [`ConsensusEngine::submit_action`]: rankqueue_engine::ConsensusEngine::submit_action

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use rankqueue_core::action::ActionType;
use rankqueue_core::error::CoreError;
use rankqueue_core::status::QueueStatus;
use rankqueue_core::types::DbId;
use rankqueue_db::models::action::QueueAction;
use rankqueue_db::models::queue_item::{QueueItem, QueueItemView};
use rankqueue_db::repositories::{ActionRepo, MapsetRepo, QueueItemRepo};
use rankqueue_engine::SubmitOutcome;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Body for every action endpoint.
#[derive(Debug, Deserialize)]
pub struct ActionBody {
    /// The justification text attached to the action (1-5000 characters).
    pub comment: String,
}

/// Body for `POST /queue`.
#[derive(Debug, Deserialize)]
pub struct EnqueueBody {
    /// The mapset to place under review.
    pub mapset_id: DbId,
}

/// Query parameters for `GET /queue`.
#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    /// Restrict the listing to one status.
    pub status: Option<QueueStatus>,
    /// Restrict the listing to mapsets of one game mode.
    pub mode: Option<i16>,
    /// 1-based page number. Defaults to 1.
    pub page: Option<i64>,
    /// Page size. Defaults to 50, capped at 100.
    pub page_size: Option<i64>,
}

/// Maximum page size for queue listing.
const MAX_PAGE_SIZE: i64 = 100;

/// Default page size for queue listing.
const DEFAULT_PAGE_SIZE: i64 = 50;

// ---------------------------------------------------------------------------
// Action endpoints
// ---------------------------------------------------------------------------

/// Shared body of the six action endpoints.
async fn submit(
    auth: AuthUser,
    state: AppState,
    item_id: DbId,
    action: ActionType,
    body: ActionBody,
) -> AppResult<Json<DataResponse<SubmitOutcome>>> {
    let outcome = state
        .engine
        .submit_action(item_id, auth.user_id, action, &body.comment)
        .await?;

    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/queue/{item_id}/vote
pub async fn vote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<Json<DataResponse<SubmitOutcome>>> {
    submit(auth, state, item_id, ActionType::Vote, body).await
}

/// POST /api/v1/queue/{item_id}/deny
pub async fn deny(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<Json<DataResponse<SubmitOutcome>>> {
    submit(auth, state, item_id, ActionType::Deny, body).await
}

/// POST /api/v1/queue/{item_id}/blacklist
pub async fn blacklist(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<Json<DataResponse<SubmitOutcome>>> {
    submit(auth, state, item_id, ActionType::Blacklist, body).await
}

/// POST /api/v1/queue/{item_id}/hold
pub async fn hold(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<Json<DataResponse<SubmitOutcome>>> {
    submit(auth, state, item_id, ActionType::OnHold, body).await
}

/// POST /api/v1/queue/{item_id}/resolve
pub async fn resolve(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<Json<DataResponse<SubmitOutcome>>> {
    submit(auth, state, item_id, ActionType::Resolve, body).await
}

/// POST /api/v1/queue/{item_id}/comment
pub async fn comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<Json<DataResponse<SubmitOutcome>>> {
    submit(auth, state, item_id, ActionType::Comment, body).await
}

// ---------------------------------------------------------------------------
// Read endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/queue
///
/// List queue items, optionally filtered by status and game mode, ordered
/// by vote count descending, then status priority, then last update.
pub async fn list_queue(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<QueueQuery>,
) -> AppResult<Json<DataResponse<Vec<QueueItemView>>>> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * page_size;

    let items =
        QueueItemRepo::list(&state.pool, params.status, params.mode, page_size, offset).await?;

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/queue/{item_id}
pub async fn get_item(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<Json<DataResponse<QueueItem>>> {
    let item = QueueItemRepo::find_by_id(&state.pool, item_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "QueueItem",
            id: item_id,
        }))?;

    Ok(Json(DataResponse { data: item }))
}

/// GET /api/v1/queue/{item_id}/actions
///
/// The item's full action log, newest first. Retracted (inactive) actions
/// are included; the log is append-only.
pub async fn list_actions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<QueueAction>>>> {
    // 404 for an unknown item rather than an empty list.
    QueueItemRepo::find_by_id(&state.pool, item_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "QueueItem",
            id: item_id,
        }))?;

    let actions = ActionRepo::list_for_item(&state.pool, item_id).await?;

    Ok(Json(DataResponse { data: actions }))
}

/// POST /api/v1/queue
///
/// Enqueue a mapset for review, creating a pending item. A mapset can sit in
/// the queue at most once; a second enqueue returns 409.
pub async fn enqueue(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<EnqueueBody>,
) -> AppResult<(StatusCode, Json<DataResponse<QueueItem>>)> {
    MapsetRepo::find_by_id(&state.pool, body.mapset_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Mapset",
            id: body.mapset_id,
        }))?;

    let item = QueueItemRepo::create(&state.pool, body.mapset_id).await?;

    tracing::info!(
        queue_item_id = item.id,
        mapset_id = body.mapset_id,
        user_id = auth.user_id,
        "Mapset enqueued"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}
