//! Backend for community cleanup events: events, participants, collected-material
//! records, and image attachments stored in S3.

pub mod blob;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod state;
pub mod store;

pub use blob::{BlobError, BlobStore, S3BlobStore};
pub use error::{AppError, ConfigError, ErrorKind};
pub use models::{Evento, ImageTarget, NuevoEvento, NuevoParticipante, NuevoRegistro, Participante, RegistroMaterial};
pub use routes::{api_routes, app, common_routes, common_routes_with_ready};
pub use settings::Settings;
pub use state::AppState;
pub use store::{create_pool, ensure_database_exists, ensure_schema, EventStore, PgEventStore, StoreError};
