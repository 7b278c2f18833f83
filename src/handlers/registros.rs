//! Material records of an event.

use crate::error::{AppError, RouteResultExt};
use crate::extractors::{EntityId, ValidJson};
use crate::models::{NuevoRegistro, RegistroMaterial};
use crate::response::{created, CreatedId};
use crate::state::AppState;
use axum::{extract::State, Json};

/// GET /eventos/:evento_id/registros
pub async fn list(
    State(state): State<AppState>,
    EntityId(evento_id): EntityId,
) -> Result<Json<Vec<RegistroMaterial>>, AppError> {
    let rows = state
        .store
        .list_material_records(evento_id)
        .await
        .or_route("Error al obtener registros de materiales")?;
    Ok(Json(rows))
}

/// POST /eventos/:evento_id/registros
pub async fn register(
    State(state): State<AppState>,
    EntityId(evento_id): EntityId,
    ValidJson(body): ValidJson<NuevoRegistro>,
) -> Result<Json<CreatedId>, AppError> {
    let id = state
        .store
        .register_material(evento_id, &body)
        .await
        .or_route("Error al registrar material")?;
    Ok(created(id))
}
