//! Event, participant and material-record routes.

use crate::handlers::{eventos, imagenes, participantes, registros};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/eventos", get(eventos::list).post(eventos::create))
        .route(
            "/eventos/:evento_id/participantes",
            get(participantes::list).post(participantes::register),
        )
        .route(
            "/eventos/:evento_id/registros",
            get(registros::list).post(registros::register),
        )
        .route("/eventos/:evento_id/imagen", post(imagenes::evento))
        .route("/participantes/:participante_id/imagen", post(imagenes::participante))
        .route("/registros/:registro_id/foto", post(imagenes::registro))
        .with_state(state)
}
