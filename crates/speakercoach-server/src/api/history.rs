use crate::api::{ApiResponse, rejected_body, state::AppState};
use crate::session::{SessionIdentity, session_cookie, with_session_cookie};
use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::Method,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use speakercoach_core::SessionRecord;

#[derive(Serialize, Debug)]
pub struct HistoryResponse {
    pub history: Vec<SessionRecord>,
}

// GET /api/history/
pub async fn get_history(
    State(state): State<AppState>,
    session: SessionIdentity,
) -> Json<HistoryResponse> {
    let Some(identity) = session.presented() else {
        return Json(HistoryResponse {
            history: Vec::new(),
        });
    };

    let history = match state.history.read(identity) {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(identity, error = %e, "Failed to read session history");
            Vec::new()
        }
    };

    Json(HistoryResponse { history })
}

// ANY /api/save-session/
pub async fn save_session(
    State(state): State<AppState>,
    method: Method,
    session: SessionIdentity,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method != Method::POST {
        return Json(ApiResponse::<()>::error("Invalid method")).into_response();
    }
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };

    let identity = match session.live_or_mint(&state) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to resolve session");
            return Json(ApiResponse::<()>::error(e.to_string())).into_response();
        }
    };

    match state.history.append_payload(&identity, &body) {
        Ok(()) => with_session_cookie(
            Json(ApiResponse::<()>::success()),
            session_cookie(&identity, state.sessions.max_age()),
        ),
        Err(e) => {
            tracing::warn!(identity = %identity, error = %e, "Rejected session save");
            Json(ApiResponse::<()>::error(e.to_string())).into_response()
        }
    }
}
