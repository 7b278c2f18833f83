//! [`EventStore`] over a PostgreSQL pool. Values are always bound, never spliced into SQL.

use super::{EventStore, StoreError};
use crate::models::{Evento, ImageTarget, NuevoEvento, NuevoParticipante, NuevoRegistro, Participante, RegistroMaterial};
use crate::settings::Settings;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Bounded pool; callers beyond `max_connections` wait for a free connection.
pub async fn create_pool(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    let mut options = PgPoolOptions::new().max_connections(settings.max_connections);
    if let Some(timeout) = settings.acquire_timeout {
        options = options.acquire_timeout(timeout);
    }
    options.connect(&settings.database_url).await
}

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const SELECT_EVENTOS: &str = "SELECT id, nombre, descripcion, fecha_inicio, fecha_fin, lugar, \
    materiales_aceptados, premios, organizador, imagen_url FROM eventos ORDER BY id";

const INSERT_EVENTO: &str = "INSERT INTO eventos (nombre, descripcion, fecha_inicio, fecha_fin, lugar, \
    materiales_aceptados, premios, organizador) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id";

const SELECT_PARTICIPANTES: &str =
    "SELECT id, nombre, tipo, evento_id, imagen_url FROM participantes WHERE evento_id = $1 ORDER BY id";

const INSERT_PARTICIPANTE: &str =
    "INSERT INTO participantes (nombre, tipo, evento_id) VALUES ($1, $2, $3) RETURNING id";

// The event id is copied from the participant row, so a record can never name
// an event its participant is not enrolled in.
const INSERT_REGISTRO: &str = "INSERT INTO registros_material (participante_id, evento_id, material, cantidad) \
    SELECT p.id, p.evento_id, $3, $4 FROM participantes p WHERE p.id = $1 AND p.evento_id = $2 \
    RETURNING id";

const SELECT_REGISTROS: &str = "SELECT r.id, p.nombre AS participante, r.material, r.cantidad, \
    r.fecha_registro, r.foto_url \
    FROM registros_material r JOIN participantes p ON r.participante_id = p.id \
    WHERE r.evento_id = $1 ORDER BY r.id";

#[async_trait]
impl EventStore for PgEventStore {
    async fn list_events(&self) -> Result<Vec<Evento>, StoreError> {
        tracing::debug!(sql = %SELECT_EVENTOS, "query");
        let rows = sqlx::query_as::<_, Evento>(SELECT_EVENTOS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_event(&self, evento: &NuevoEvento) -> Result<i64, StoreError> {
        tracing::debug!(sql = %INSERT_EVENTO, nombre = %evento.nombre, "query");
        let (id,): (i64,) = sqlx::query_as(INSERT_EVENTO)
            .bind(&evento.nombre)
            .bind(&evento.descripcion)
            .bind(evento.fecha_inicio)
            .bind(evento.fecha_fin)
            .bind(&evento.lugar)
            .bind(&evento.materiales_aceptados)
            .bind(&evento.premios)
            .bind(&evento.organizador)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn list_participants(&self, evento_id: i64) -> Result<Vec<Participante>, StoreError> {
        tracing::debug!(sql = %SELECT_PARTICIPANTES, evento_id, "query");
        let rows = sqlx::query_as::<_, Participante>(SELECT_PARTICIPANTES)
            .bind(evento_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn register_participant(&self, evento_id: i64, participante: &NuevoParticipante) -> Result<i64, StoreError> {
        tracing::debug!(sql = %INSERT_PARTICIPANTE, evento_id, "query");
        let (id,): (i64,) = sqlx::query_as(INSERT_PARTICIPANTE)
            .bind(&participante.nombre)
            .bind(&participante.tipo)
            .bind(evento_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn register_material(&self, evento_id: i64, registro: &NuevoRegistro) -> Result<i64, StoreError> {
        tracing::debug!(sql = %INSERT_REGISTRO, evento_id, participante_id = registro.participante_id, "query");
        let row: Option<(i64,)> = sqlx::query_as(INSERT_REGISTRO)
            .bind(registro.participante_id)
            .bind(evento_id)
            .bind(&registro.material)
            .bind(registro.cantidad)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(id,)| id).ok_or_else(|| {
            StoreError::NotFound(format!(
                "participante {} in evento {}",
                registro.participante_id, evento_id
            ))
        })
    }

    async fn list_material_records(&self, evento_id: i64) -> Result<Vec<RegistroMaterial>, StoreError> {
        tracing::debug!(sql = %SELECT_REGISTROS, evento_id, "query");
        let rows = sqlx::query_as::<_, RegistroMaterial>(SELECT_REGISTROS)
            .bind(evento_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn set_image_url(&self, target: ImageTarget, id: i64, url: &str) -> Result<u64, StoreError> {
        // Table and column come from a closed enum, never from the request.
        let sql = format!("UPDATE {} SET {} = $1 WHERE id = $2", target.table(), target.url_column());
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(url).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
