use crate::api::{ApiResponse, rejected_body, state::AppState};
use crate::session::{SessionIdentity, session_cookie, with_session_cookie};
use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use speakercoach_core::Score;

#[derive(Debug, Deserialize)]
pub struct RecordScoreRequest {
    pub eye_contact_percentage: f64,
}

// GET /api/scores/
pub async fn list_scores(
    State(state): State<AppState>,
    session: SessionIdentity,
) -> Json<ApiResponse<Vec<Score>>> {
    let identity = match state.live_session(session.presented()) {
        Ok(Some(identity)) => identity,
        Ok(None) => return Json(ApiResponse::ok(Vec::new())),
        Err(e) => return Json(ApiResponse::error(format!("Failed to list scores: {}", e))),
    };

    match state.scores.list(&identity) {
        Ok(scores) => Json(ApiResponse::ok(scores)),
        Err(e) => Json(ApiResponse::error(format!("Failed to list scores: {}", e))),
    }
}

// POST /api/scores/
pub async fn record_score(
    State(state): State<AppState>,
    session: SessionIdentity,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };
    let request: RecordScoreRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return Json(ApiResponse::<()>::error(format!("Invalid request: {}", e)))
                .into_response();
        }
    };

    let identity = match session.live_or_mint(&state) {
        Ok(identity) => identity,
        Err(e) => {
            return Json(ApiResponse::<()>::error(format!(
                "Failed to record score: {}",
                e
            )))
            .into_response();
        }
    };

    // Scores live only as long as the session that owns them.
    let recorded = state
        .history
        .touch(&identity)
        .map_err(anyhow::Error::from)
        .and_then(|()| state.scores.record(&identity, request.eye_contact_percentage));

    match recorded {
        Ok(score) => with_session_cookie(
            Json(ApiResponse::ok(score)),
            session_cookie(&identity, state.sessions.max_age()),
        ),
        Err(e) => Json(ApiResponse::<()>::error(format!(
            "Failed to record score: {}",
            e
        )))
        .into_response(),
    }
}
