//! Integration tests for the `/api/v1/queue` endpoints and the hold-timeout
//! background job.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use common::{
    build_test_app, build_test_app_with, expect_status, get, get_auth, post_json, seed_item,
    seed_reviewer, token_for,
};
use rankqueue_api::background::hold_timeout;
use rankqueue_core::config::ConsensusConfig;
use rankqueue_core::status::QueueStatus;
use rankqueue_db::repositories::{MapsetRepo, QueueItemRepo, ReviewerRepo};
use rankqueue_engine::{ConsensusEngine, ProductionEffects};
use rankqueue_events::EventBus;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn queue_endpoints_require_authentication(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/v1/queue").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(app, "/api/v1/queue/1/vote", "not-a-token", json!({"comment": "x"}))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Enqueue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn enqueue_creates_pending_item_once(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let submitter = seed_reviewer(&pool, "mapper").await;
    let mapset = MapsetRepo::create(&pool, submitter, "Fresh Mapset", 1)
        .await
        .unwrap();
    let token = token_for(submitter);

    let response = post_json(
        app.clone(),
        "/api/v1/queue",
        &token,
        json!({"mapset_id": mapset.id}),
    )
    .await;
    let json = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["vote_count"], 0);

    // A mapset can sit in the queue at most once.
    let response = post_json(
        app.clone(),
        "/api/v1/queue",
        &token,
        json!({"mapset_id": mapset.id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Unknown mapsets are rejected up front.
    let response = post_json(app, "/api/v1/queue", &token, json!({"mapset_id": 999_999})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Voting through the API
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn sub_quorum_vote_returns_updated_item(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (item_id, _, _) = seed_item(&pool).await;
    let reviewer = seed_reviewer(&pool, "alice").await;

    let response = post_json(
        app,
        &format!("/api/v1/queue/{item_id}/vote"),
        &token_for(reviewer),
        json!({"comment": "plays well"}),
    )
    .await;

    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["item"]["vote_count"], 1);
    assert_eq!(json["data"]["item"]["status"], "pending");
    assert!(json["data"]["transition"].is_null());
    assert_eq!(json["data"]["failed_hooks"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn quorum_votes_rank_the_item(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (item_id, mapset_id, _) = seed_item(&pool).await;

    for name in ["alice", "bob"] {
        let reviewer = seed_reviewer(&pool, name).await;
        let response = post_json(
            app.clone(),
            &format!("/api/v1/queue/{item_id}/vote"),
            &token_for(reviewer),
            json!({"comment": "good"}),
        )
        .await;
        expect_status(response, StatusCode::OK).await;
    }

    let carol = seed_reviewer(&pool, "carol").await;
    let response = post_json(
        app.clone(),
        &format!("/api/v1/queue/{item_id}/vote"),
        &token_for(carol),
        json!({"comment": "ready"}),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["transition"], "ranked");
    assert_eq!(json["data"]["item"]["vote_count"], 3);
    assert_eq!(json["data"]["failed_hooks"].as_array().unwrap().len(), 0);

    // The read endpoint reflects the transition, and the publish hook fired.
    let response = get_auth(app, &format!("/api/v1/queue/{item_id}"), &token_for(carol)).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "ranked");

    let mapset = MapsetRepo::find_by_id(&pool, mapset_id).await.unwrap().unwrap();
    assert!(mapset.is_ranked());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn denial_quorum_denies_and_resets(pool: PgPool) {
    let app = build_test_app_with(pool.clone(), 3, 1);
    let (item_id, _, _) = seed_item(&pool).await;

    let alice = seed_reviewer(&pool, "alice").await;
    let response = post_json(
        app.clone(),
        &format!("/api/v1/queue/{item_id}/vote"),
        &token_for(alice),
        json!({"comment": "promising"}),
    )
    .await;
    expect_status(response, StatusCode::OK).await;

    let bob = seed_reviewer(&pool, "bob").await;
    let response = post_json(
        app,
        &format!("/api/v1/queue/{item_id}/deny"),
        &token_for(bob),
        json!({"comment": "unrankable timing"}),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["transition"], "denied");
    assert_eq!(json["data"]["item"]["vote_count"], 0);
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unprivileged_vote_is_forbidden(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (item_id, _, _) = seed_item(&pool).await;
    let plain_user = ReviewerRepo::create(&pool, "plain", false, false)
        .await
        .unwrap();

    let response = post_json(
        app,
        &format!("/api/v1/queue/{item_id}/vote"),
        &token_for(plain_user.id),
        json!({"comment": "let me in"}),
    )
    .await;
    let json = expect_status(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_comment_is_a_validation_error(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (item_id, _, _) = seed_item(&pool).await;
    let reviewer = seed_reviewer(&pool, "alice").await;

    let response = post_json(
        app,
        &format!("/api/v1/queue/{item_id}/vote"),
        &token_for(reviewer),
        json!({"comment": ""}),
    )
    .await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn acting_on_a_missing_item_returns_404(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let reviewer = seed_reviewer(&pool, "alice").await;

    let response = post_json(
        app.clone(),
        "/api/v1/queue/999999/vote",
        &token_for(reviewer),
        json!({"comment": "ghost"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/v1/queue/999999", &token_for(reviewer)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing & action log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_filters_by_status_and_orders_by_votes(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (first_item, _, submitter_id) = seed_item(&pool).await;

    let second_mapset = MapsetRepo::create(&pool, submitter_id, "Second Mapset", 1)
        .await
        .unwrap();
    let second_item = QueueItemRepo::create(&pool, second_mapset.id).await.unwrap();

    // Only the second item receives a vote, so it must list first.
    let alice = seed_reviewer(&pool, "alice").await;
    let response = post_json(
        app.clone(),
        &format!("/api/v1/queue/{}/vote", second_item.id),
        &token_for(alice),
        json!({"comment": "nice"}),
    )
    .await;
    expect_status(response, StatusCode::OK).await;

    let response = get_auth(
        app.clone(),
        "/api/v1/queue?status=pending",
        &token_for(alice),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], second_item.id);
    assert_eq!(items[1]["id"], first_item);

    // Filtering by a status no item has yields an empty page.
    let response = get_auth(app, "/api/v1/queue?status=ranked", &token_for(alice)).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_filters_by_game_mode(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (four_key_item, _, submitter_id) = seed_item(&pool).await;

    let seven_key_mapset = MapsetRepo::create(&pool, submitter_id, "Seven Key Mapset", 2)
        .await
        .unwrap();
    let seven_key_item = QueueItemRepo::create(&pool, seven_key_mapset.id).await.unwrap();

    let alice = seed_reviewer(&pool, "alice").await;
    let response = get_auth(app.clone(), "/api/v1/queue?mode=2", &token_for(alice)).await;
    let json = expect_status(response, StatusCode::OK).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], seven_key_item.id);
    assert_eq!(items[0]["mapset_mode"], 2);

    // Without the filter both modes are listed.
    let response = get_auth(app, "/api/v1/queue", &token_for(alice)).await;
    let json = expect_status(response, StatusCode::OK).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    assert!(ids.contains(&four_key_item));
    assert!(ids.contains(&seven_key_item.id));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_breaks_vote_ties_by_status_then_recency(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (pending_item, _, submitter_id) = seed_item(&pool).await;

    // Three more zero-vote items in different statuses.
    let mut staged = Vec::new();
    for (title, status) in [
        ("Held Mapset", QueueStatus::OnHold),
        ("Resolved Mapset", QueueStatus::Resolved),
        ("Older Pending Mapset", QueueStatus::Pending),
    ] {
        let mapset = MapsetRepo::create(&pool, submitter_id, title, 1).await.unwrap();
        let item = QueueItemRepo::create(&pool, mapset.id).await.unwrap();
        sqlx::query("UPDATE queue_items SET status = $2 WHERE id = $1")
            .bind(item.id)
            .bind(status)
            .execute(&pool)
            .await
            .unwrap();
        staged.push(item.id);
    }
    let (held_item, resolved_item, older_pending) = (staged[0], staged[1], staged[2]);

    // Backdate one of the pending pair so recency decides their order.
    sqlx::query("UPDATE queue_items SET updated_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(older_pending)
        .execute(&pool)
        .await
        .unwrap();

    let alice = seed_reviewer(&pool, "alice").await;
    let response = get_auth(app, "/api/v1/queue", &token_for(alice)).await;
    let json = expect_status(response, StatusCode::OK).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();

    // All vote counts are equal, so status priority decides (resolved >
    // pending > on hold) and updated_at breaks the pending tie.
    assert_eq!(ids, vec![resolved_item, pending_item, older_pending, held_item]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn action_log_keeps_retracted_entries(pool: PgPool) {
    // One denial is enough to deny, which retracts the earlier vote.
    let app = build_test_app_with(pool.clone(), 3, 1);
    let (item_id, _, _) = seed_item(&pool).await;

    let alice = seed_reviewer(&pool, "alice").await;
    let response = post_json(
        app.clone(),
        &format!("/api/v1/queue/{item_id}/vote"),
        &token_for(alice),
        json!({"comment": "promising"}),
    )
    .await;
    expect_status(response, StatusCode::OK).await;

    let bob = seed_reviewer(&pool, "bob").await;
    let response = post_json(
        app.clone(),
        &format!("/api/v1/queue/{item_id}/deny"),
        &token_for(bob),
        json!({"comment": "broken hitsounds"}),
    )
    .await;
    expect_status(response, StatusCode::OK).await;

    let response = get_auth(
        app,
        &format!("/api/v1/queue/{item_id}/actions"),
        &token_for(alice),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    let actions = json["data"].as_array().unwrap();
    assert_eq!(actions.len(), 2);

    // Every action stays in the log; the reset only flips is_active.
    let active: Vec<bool> = actions
        .iter()
        .map(|a| a["is_active"].as_bool().unwrap())
        .collect();
    assert!(active.iter().all(|a| !a), "reset must retract vote and deny");
}

// ---------------------------------------------------------------------------
// Hold-timeout job
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_hold_is_auto_denied_by_the_system_actor(pool: PgPool) {
    let bus = Arc::new(EventBus::default());
    let effects = Arc::new(ProductionEffects::new(pool.clone(), bus));
    let config = ConsensusConfig::new(3, 1, 7).unwrap();
    let engine = ConsensusEngine::new(pool.clone(), config, effects).unwrap();

    let (item_id, _, _) = seed_item(&pool).await;
    let system_actor = seed_reviewer(&pool, "system").await;

    let alice = seed_reviewer(&pool, "alice").await;
    engine
        .submit_action(
            item_id,
            alice,
            rankqueue_core::action::ActionType::OnHold,
            "waiting on a metadata source",
        )
        .await
        .unwrap();

    // Fresh hold: the sweep must leave it alone.
    let denied = hold_timeout::sweep(&engine, &pool, system_actor).await.unwrap();
    assert_eq!(denied, 0);

    // Age the hold past the limit.
    sqlx::query("UPDATE queue_items SET updated_at = NOW() - INTERVAL '10 days' WHERE id = $1")
        .bind(item_id)
        .execute(&pool)
        .await
        .unwrap();

    let denied = hold_timeout::sweep(&engine, &pool, system_actor).await.unwrap();
    assert_eq!(denied, 1);

    let item = QueueItemRepo::find_by_id(&pool, item_id).await.unwrap().unwrap();
    assert_eq!(item.status, rankqueue_core::status::QueueStatus::Denied);
    assert_eq!(item.vote_count, 0);

    // A later sweep has nothing left to do.
    let denied = hold_timeout::sweep(&engine, &pool, system_actor).await.unwrap();
    assert_eq!(denied, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sweep_deny_counts_toward_quorum_without_meeting_it(pool: PgPool) {
    let bus = Arc::new(EventBus::default());
    let effects = Arc::new(ProductionEffects::new(pool.clone(), bus));
    // Two denials required: the system deny alone must not flip the status.
    let config = ConsensusConfig::new(3, 2, 7).unwrap();
    let engine = ConsensusEngine::new(pool.clone(), config, effects).unwrap();

    let (item_id, _, _) = seed_item(&pool).await;
    let system_actor = seed_reviewer(&pool, "system").await;

    let alice = seed_reviewer(&pool, "alice").await;
    engine
        .submit_action(
            item_id,
            alice,
            rankqueue_core::action::ActionType::OnHold,
            "needs discussion",
        )
        .await
        .unwrap();

    sqlx::query("UPDATE queue_items SET updated_at = NOW() - INTERVAL '10 days' WHERE id = $1")
        .bind(item_id)
        .execute(&pool)
        .await
        .unwrap();

    // The deny lands but no transition happens yet.
    let denied = hold_timeout::sweep(&engine, &pool, system_actor).await.unwrap();
    assert_eq!(denied, 1);
    let item = QueueItemRepo::find_by_id(&pool, item_id).await.unwrap().unwrap();
    assert_eq!(item.status, rankqueue_core::status::QueueStatus::OnHold);

    // The deny refreshed updated_at, so the item is no longer expired.
    let denied = hold_timeout::sweep(&engine, &pool, system_actor).await.unwrap();
    assert_eq!(denied, 0);

    // Even when it expires again, the system actor's duplicate deny is
    // rejected by eligibility and the sweep leaves the item waiting for
    // the human quorum.
    sqlx::query("UPDATE queue_items SET updated_at = NOW() - INTERVAL '10 days' WHERE id = $1")
        .bind(item_id)
        .execute(&pool)
        .await
        .unwrap();
    let denied = hold_timeout::sweep(&engine, &pool, system_actor).await.unwrap();
    assert_eq!(denied, 0);
    let item = QueueItemRepo::find_by_id(&pool, item_id).await.unwrap().unwrap();
    assert_eq!(item.status, rankqueue_core::status::QueueStatus::OnHold);
}
