//! Participants of an event.

use crate::error::{AppError, RouteResultExt};
use crate::extractors::{EntityId, ValidJson};
use crate::models::{NuevoParticipante, Participante};
use crate::response::{created, CreatedId};
use crate::state::AppState;
use axum::{extract::State, Json};

/// GET /eventos/:evento_id/participantes
pub async fn list(
    State(state): State<AppState>,
    EntityId(evento_id): EntityId,
) -> Result<Json<Vec<Participante>>, AppError> {
    let rows = state
        .store
        .list_participants(evento_id)
        .await
        .or_route("Error al obtener participantes")?;
    Ok(Json(rows))
}

/// POST /eventos/:evento_id/participantes
pub async fn register(
    State(state): State<AppState>,
    EntityId(evento_id): EntityId,
    ValidJson(body): ValidJson<NuevoParticipante>,
) -> Result<Json<CreatedId>, AppError> {
    let id = state
        .store
        .register_participant(evento_id, &body)
        .await
        .or_route("Error al inscribir participante")?;
    Ok(created(id))
}
