//! Image upload handlers: multipart form with a single file field, stored in the blob store.

use crate::error::{AppError, RouteResultExt};
use crate::extractors::EntityId;
use crate::models::ImageTarget;
use crate::response::stored_url;
use crate::service::{attach_image, Upload};
use crate::state::AppState;
use axum::extract::{multipart::MultipartError, Multipart, State};
use axum::Json;

/// POST /eventos/:evento_id/imagen: multipart field `imagen`.
pub async fn evento(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    attach(&state, ImageTarget::Evento, id, multipart).await
}

/// POST /participantes/:participante_id/imagen: multipart field `imagen`.
pub async fn participante(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    attach(&state, ImageTarget::Participante, id, multipart).await
}

/// POST /registros/:registro_id/foto: multipart field `foto`.
pub async fn registro(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    attach(&state, ImageTarget::Registro, id, multipart).await
}

async fn attach(
    state: &AppState,
    target: ImageTarget,
    id: i64,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let upload = read_file_field(multipart, target.field_name()).await?;
    let url = attach_image(state.store.as_ref(), state.blobs.as_ref(), target, id, upload)
        .await
        .or_route(target.route_message())?;
    Ok(stored_url(target.url_column(), url))
}

/// The single file part named `field`. Parts with other names are skipped.
async fn read_file_field(mut multipart: Multipart, field: &str) -> Result<Upload, AppError> {
    let mut upload = None;
    while let Some(part) = multipart.next_field().await.map_err(multipart_error)? {
        if part.name() != Some(field) {
            continue;
        }
        if upload.is_some() {
            return Err(AppError::Validation(format!("only one '{}' file is accepted", field)));
        }
        let Some(file_name) = part.file_name().map(String::from) else {
            return Err(AppError::Validation(format!("'{}' must be a file", field)));
        };
        let content_type = part.content_type().map(String::from);
        let body = part.bytes().await.map_err(multipart_error)?;
        upload = Some(Upload {
            file_name,
            content_type,
            body,
        });
    }
    upload.ok_or_else(|| AppError::Validation(format!("missing '{}' file field in multipart body", field)))
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::from_body_rejection(e.status(), e.body_text())
}
