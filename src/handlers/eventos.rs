//! Events: list and create.

use crate::error::{AppError, RouteResultExt};
use crate::extractors::ValidJson;
use crate::models::{Evento, NuevoEvento};
use crate::response::{created, CreatedId};
use crate::state::AppState;
use axum::{extract::State, Json};

/// GET /eventos
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Evento>>, AppError> {
    let rows = state.store.list_events().await.or_route("Error al obtener eventos")?;
    Ok(Json(rows))
}

/// POST /eventos
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<NuevoEvento>,
) -> Result<Json<CreatedId>, AppError> {
    let id = state.store.create_event(&body).await.or_route("Error al crear evento")?;
    tracing::info!(id, nombre = %body.nombre, "evento created");
    Ok(created(id))
}
