//! Data-access layer: one operation per entity action, each a single parameterized statement.

mod postgres;
mod schema;

pub use postgres::{create_pool, PgEventStore};
pub use schema::{ensure_database_exists, ensure_schema};

use crate::error::{Classify, ConfigError, ErrorKind};
use crate::models::{Evento, ImageTarget, NuevoEvento, NuevoParticipante, NuevoRegistro, Participante, RegistroMaterial};
use async_trait::async_trait;
use thiserror::Error;

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    #[error("database: {0}")]
    Db(#[source] sqlx::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            let code = db.code().map(|c| c.into_owned());
            match code.as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => return StoreError::NotFound(db.message().to_string()),
                Some(UNIQUE_VIOLATION) => return StoreError::Conflict(db.message().to_string()),
                _ => {}
            }
        }
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound("row".into()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                StoreError::Unavailable(e)
            }
            _ => StoreError::Db(e),
        }
    }
}

impl Classify for StoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Conflict(_) => ErrorKind::Conflict,
            StoreError::Unavailable(_) => ErrorKind::UpstreamUnavailable,
            StoreError::Db(_) | StoreError::Config(_) => ErrorKind::Internal,
        }
    }
}

/// Persistence operations used by the HTTP handlers. Implemented over Postgres by [`PgEventStore`].
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Evento>, StoreError>;

    /// Insert an event with no image; returns the generated id.
    async fn create_event(&self, evento: &NuevoEvento) -> Result<i64, StoreError>;

    async fn list_participants(&self, evento_id: i64) -> Result<Vec<Participante>, StoreError>;

    async fn register_participant(&self, evento_id: i64, participante: &NuevoParticipante) -> Result<i64, StoreError>;

    /// Insert a material record stamped with the server time. Fails with `NotFound`
    /// unless the participant belongs to `evento_id`.
    async fn register_material(&self, evento_id: i64, registro: &NuevoRegistro) -> Result<i64, StoreError>;

    /// Material records of an event with the participant's name in place of its id.
    async fn list_material_records(&self, evento_id: i64) -> Result<Vec<RegistroMaterial>, StoreError>;

    /// Overwrite the image URL of one row. Returns the number of rows affected (0 or 1).
    async fn set_image_url(&self, target: ImageTarget, id: i64, url: &str) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
