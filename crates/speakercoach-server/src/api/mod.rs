pub mod history;
pub mod response;
pub mod scores;
pub mod state;

pub use response::ApiResponse;
pub use state::AppState;

use axum::{
    Json,
    extract::rejection::BytesRejection,
    response::{IntoResponse, Response},
};

/// Structured error for a body the extractor refused, such as one over the
/// size limit.
fn rejected_body(rejection: BytesRejection) -> Response {
    tracing::warn!(status = %rejection.status(), "Rejected request body");
    Json(ApiResponse::<()>::error(format!(
        "Invalid request body: {}",
        rejection.body_text()
    )))
    .into_response()
}
