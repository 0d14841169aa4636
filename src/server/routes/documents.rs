//! Document upload, listing, and deletion

use axum::extract::{Multipart, Path, State};
use axum::Json;

use crate::error::{Error, Result};
use crate::server::auth::AuthUser;
use crate::server::state::AppState;
use crate::types::response::{DeleteResponse, DocumentListResponse, UploadResponse};

/// POST /api/documents - upload and ingest one file
pub async fn upload(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Malformed upload: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("Failed to read file: {}", e)))?;
        upload = Some((filename, data.to_vec()));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(Error::Validation("No file provided".to_string()));
    };

    tracing::info!(%filename, bytes = data.len(), "processing upload");

    let receipt = state.pipeline().ingest(&user_id, &filename, &data).await?;

    Ok(Json(UploadResponse {
        success: true,
        document_id: receipt.document_id,
        document_name: receipt.document_name,
        chunks_created: receipt.chunk_count,
    }))
}

/// GET /api/documents - the caller's documents, newest first
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DocumentListResponse>> {
    let documents = state.db().list_documents(&user_id)?;
    Ok(Json(DocumentListResponse { documents }))
}

/// DELETE /api/documents/:id - delete a document and its chunks
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(document_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.db().delete_document(&user_id, &document_id)? {
        return Err(Error::NotFoundOrUnauthorized("Document"));
    }
    tracing::info!(%document_id, "deleted document");
    Ok(Json(DeleteResponse { success: true }))
}
