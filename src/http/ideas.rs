use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::identity::VoterIdentity;
use crate::models::idea::{
    IdeaCreateRequest, IdeaCreateResponse, IdeaRecord, IdeaView, StatsView, VoteStatusView,
    VoteSubmissionResponse,
};
use crate::state::AppState;
use crate::store::{aggregation, ideas, ledger, voting};

use super::{HttpError, parse_idea_id};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ideas", get(list_ideas).post(create_idea))
        .route("/ideas/{idea_id}", get(get_idea))
        .route("/ideas/{idea_id}/vote", get(get_vote_status).post(submit_vote))
        .route("/stats", get(get_stats))
}

async fn list_ideas(State(state): State<AppState>) -> Result<Json<Vec<IdeaView>>, HttpError> {
    let listed = ideas::list_ideas_with_counts(&state.database).await?;
    Ok(Json(listed))
}

async fn create_idea(
    State(state): State<AppState>,
    Json(payload): Json<IdeaCreateRequest>,
) -> Result<Json<IdeaCreateResponse>, HttpError> {
    let id = ideas::create_idea(
        &state.database,
        &payload.title,
        &payload.description,
        payload.author.as_deref(),
    )
    .await?;

    Ok(Json(IdeaCreateResponse {
        success: true,
        id,
        message: "Idea submitted".to_string(),
    }))
}

async fn get_idea(
    Path(idea_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<IdeaRecord>, HttpError> {
    let idea_id = parse_idea_id(&idea_id)?;
    let model = ideas::get_idea(&state.database, idea_id).await?;
    Ok(Json(IdeaRecord::from(model)))
}

async fn submit_vote(
    Path(idea_id): Path<String>,
    State(state): State<AppState>,
    voter: VoterIdentity,
) -> Result<Json<VoteSubmissionResponse>, HttpError> {
    let idea_id = parse_idea_id(&idea_id)?;
    let receipt = voting::cast_vote(&state.database, idea_id, &voter).await?;
    assert!(receipt.accepted, "Rejected votes surface as errors");

    Ok(Json(VoteSubmissionResponse {
        success: true,
        message: "Vote recorded".to_string(),
    }))
}

async fn get_vote_status(
    Path(idea_id): Path<String>,
    State(state): State<AppState>,
    voter: VoterIdentity,
) -> Result<Json<VoteStatusView>, HttpError> {
    let idea_id = parse_idea_id(&idea_id)?;
    ideas::ensure_exists(&state.database, idea_id).await?;
    let has_voted = ledger::has_voted(&state.database, idea_id, &voter).await?;
    Ok(Json(VoteStatusView { idea_id, has_voted }))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsView>, HttpError> {
    let totals = aggregation::stats(&state.database).await?;
    Ok(Json(totals))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};

    use super::super::testing::*;

    fn idea_payload(title: &str) -> Value {
        json!({
            "title": title,
            "description": "A long enough description for the idea",
            "author": "Mira"
        })
    }

    fn vote_from(id: i64, forwarded: &str) -> Request<Body> {
        Request::post(format!("/api/ideas/{id}/vote"))
            .header("x-forwarded-for", forwarded)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn create_then_fetch_idea() {
        let app = app(test_state().await);
        let (status, created) = send(&app, post_json("/api/ideas", idea_payload("  Solar panels  "))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["success"], true);

        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = send(&app, get(&format!("/api/ideas/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["title"], "Solar panels");
        assert_eq!(fetched["author"], "Mira");
        assert_eq!(fetched["votes"], 0);
        assert_eq!(fetched["status"], "pending");
    }

    #[tokio::test]
    async fn invalid_idea_is_rejected_with_message() {
        let app = app(test_state().await);
        let (status, body) = send(
            &app,
            post_json("/api/ideas", json!({"title": "ok", "description": "short"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Title"));

        let (_, listed) = send(&app, get("/api/ideas")).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn missing_and_malformed_ids_are_404() {
        let app = app(test_state().await);
        let (status, body) = send(&app, get("/api/ideas/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());

        let (status, _) = send(&app, get("/api/ideas/not-a-number")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, post_empty("/api/ideas/999/vote")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn second_vote_from_same_address_is_rejected() {
        let app = app(test_state().await);
        let (_, created) = send(&app, post_json("/api/ideas", idea_payload("Bike racks"))).await;
        let id = created["id"].as_i64().unwrap();

        let (status, body) = send(&app, vote_from(id, "198.51.100.4")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = send(&app, vote_from(id, "198.51.100.4, 10.0.0.1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("already voted"));

        let (status, _) = send(&app, vote_from(id, "198.51.100.5")).await;
        assert_eq!(status, StatusCode::OK);

        let (_, fetched) = send(&app, get(&format!("/api/ideas/{id}"))).await;
        assert_eq!(fetched["votes"], 2);
    }

    #[tokio::test]
    async fn peer_address_is_used_without_forwarded_header() {
        let app = app(test_state().await);
        let (_, created) = send(&app, post_json("/api/ideas", idea_payload("Water fountain"))).await;
        let id = created["id"].as_i64().unwrap();
        let vote_uri = format!("/api/ideas/{id}/vote");

        let (_, before) = send(&app, get(&vote_uri)).await;
        assert_eq!(before, json!({"idea_id": id, "has_voted": false}));

        let (status, _) = send(&app, post_empty(&vote_uri)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, after) = send(&app, get(&vote_uri)).await;
        assert_eq!(after["has_voted"], true);

        let (status, _) = send(&app, post_empty(&vote_uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn listing_and_stats_reflect_votes_and_comments() {
        let app = app(test_state().await);
        let (_, first) = send(&app, post_json("/api/ideas", idea_payload("Garden club"))).await;
        let (_, second) = send(&app, post_json("/api/ideas", idea_payload("Chess club"))).await;
        let first = first["id"].as_i64().unwrap();
        let second = second["id"].as_i64().unwrap();

        send(&app, vote_from(second, "192.0.2.1")).await;
        send(
            &app,
            post_json(
                &format!("/api/ideas/{first}/comments"),
                json!({"text": "Count me in"}),
            ),
        )
        .await;

        let (status, listed) = send(&app, get("/api/ideas")).await;
        assert_eq!(status, StatusCode::OK);
        let listed = listed.as_array().unwrap();
        assert_eq!(listed[0]["id"], second);
        assert_eq!(listed[0]["vote_count"], 1);
        assert_eq!(listed[1]["comment_count"], 1);

        let (_, totals) = send(&app, get("/api/stats")).await;
        assert_eq!(totals, json!({"ideas": 2, "comments": 1, "votes": 1}));
    }
}
