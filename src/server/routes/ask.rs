//! Question answering endpoint

use axum::extract::State;
use axum::Json;
use std::time::Instant;

use crate::error::Result;
use crate::server::auth::AuthUser;
use crate::server::state::AppState;
use crate::types::request::AskRequest;
use crate::types::response::AskResponse;

/// POST /api/ask - answer a question from the caller's documents
pub async fn ask(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    let answer = state
        .composer()
        .answer(
            &user_id,
            &request.question,
            &request.history,
            request.document_id.as_deref(),
        )
        .await?;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        sources = answer.sources.len(),
        "answered question"
    );

    Ok(Json(AskResponse::from(answer)))
}
