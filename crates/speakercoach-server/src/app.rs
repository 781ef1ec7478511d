use crate::api::{
    AppState,
    history::{get_history, save_session},
    scores::{list_scores, record_score},
};
use axum::{
    Json, Router,
    http::{Method, header},
    routing::{any, get},
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Serialize)]
struct Health {
    status: String,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "speakercoach is working!".to_string(),
    })
}

/// Every route is served with and without the trailing slash.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/api/history", get(get_history))
        .route("/api/history/", get(get_history))
        // Accepts every method so non-POST requests get the structured error
        .route("/api/save-session", any(save_session))
        .route("/api/save-session/", any(save_session))
        .route("/api/scores", get(list_scores).post(record_score))
        .route("/api/scores/", get(list_scores).post(record_score))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
