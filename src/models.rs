//! Rows returned by the store and request bodies accepted by the API.
//! Field names match the column names so rows serialize unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Evento {
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub lugar: String,
    pub materiales_aceptados: String,
    pub premios: String,
    pub organizador: String,
    pub imagen_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Participante {
    pub id: i64,
    pub nombre: String,
    pub tipo: String,
    pub evento_id: i64,
    pub imagen_url: Option<String>,
}

/// Material record joined with its participant; `participante` holds the participant's name.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct RegistroMaterial {
    pub id: i64,
    pub participante: String,
    pub material: String,
    pub cantidad: f64,
    pub fecha_registro: DateTime<Utc>,
    pub foto_url: Option<String>,
}

/// Body of `POST /eventos`.
#[derive(Debug, Clone, Deserialize)]
pub struct NuevoEvento {
    pub nombre: String,
    pub descripcion: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub lugar: String,
    pub materiales_aceptados: String,
    pub premios: String,
    pub organizador: String,
}

/// Body of `POST /eventos/:evento_id/participantes`.
#[derive(Debug, Clone, Deserialize)]
pub struct NuevoParticipante {
    pub nombre: String,
    pub tipo: String,
}

/// Body of `POST /eventos/:evento_id/registros`.
#[derive(Debug, Clone, Deserialize)]
pub struct NuevoRegistro {
    pub participante_id: i64,
    pub material: String,
    pub cantidad: f64,
}

/// Entity an uploaded image is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageTarget {
    Evento,
    Participante,
    Registro,
}

impl ImageTarget {
    pub fn table(self) -> &'static str {
        match self {
            ImageTarget::Evento => "eventos",
            ImageTarget::Participante => "participantes",
            ImageTarget::Registro => "registros_material",
        }
    }

    /// URL column; also the key of the JSON response.
    pub fn url_column(self) -> &'static str {
        match self {
            ImageTarget::Evento | ImageTarget::Participante => "imagen_url",
            ImageTarget::Registro => "foto_url",
        }
    }

    /// Multipart field carrying the file.
    pub fn field_name(self) -> &'static str {
        match self {
            ImageTarget::Evento | ImageTarget::Participante => "imagen",
            ImageTarget::Registro => "foto",
        }
    }

    pub fn key_prefix(self) -> &'static str {
        match self {
            ImageTarget::Evento => "eventos",
            ImageTarget::Participante => "participantes",
            ImageTarget::Registro => "registros",
        }
    }

    pub fn route_message(self) -> &'static str {
        match self {
            ImageTarget::Evento => "Error al guardar la URL de la imagen",
            ImageTarget::Participante => "Error al guardar la URL de la imagen del participante",
            ImageTarget::Registro => "Error al guardar la URL de la foto del registro",
        }
    }
}
