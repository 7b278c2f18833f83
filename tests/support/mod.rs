//! In-memory fakes of the store and blob store plus request helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use ecoactivate::blob::{BlobError, BlobStore};
use ecoactivate::{
    app, AppState, EventStore, Evento, ImageTarget, NuevoEvento, NuevoParticipante, NuevoRegistro, Participante,
    RegistroMaterial, StoreError,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const BOUNDARY: &str = "ecoactivate-test-boundary";

#[derive(Default)]
struct Tables {
    eventos: Vec<Evento>,
    participantes: Vec<Participante>,
    registros: Vec<Registro>,
}

struct Registro {
    id: i64,
    participante_id: i64,
    evento_id: i64,
    material: String,
    cantidad: f64,
    fecha_registro: chrono::DateTime<chrono::Utc>,
    foto_url: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    pub unavailable: AtomicBool,
    pub failing_updates: AtomicBool,
}

impl MemoryStore {
    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    pub fn evento(&self, id: i64) -> Option<Evento> {
        self.tables.lock().unwrap().eventos.iter().find(|e| e.id == id).cloned()
    }

    pub fn participante(&self, id: i64) -> Option<Participante> {
        self.tables.lock().unwrap().participantes.iter().find(|p| p.id == id).cloned()
    }

    pub fn foto_url(&self, registro_id: i64) -> Option<String> {
        let tables = self.tables.lock().unwrap();
        tables.registros.iter().find(|r| r.id == registro_id).and_then(|r| r.foto_url.clone())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(&self) -> Result<Vec<Evento>, StoreError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().eventos.clone())
    }

    async fn create_event(&self, evento: &NuevoEvento) -> Result<i64, StoreError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let id = tables.eventos.len() as i64 + 1;
        tables.eventos.push(Evento {
            id,
            nombre: evento.nombre.clone(),
            descripcion: evento.descripcion.clone(),
            fecha_inicio: evento.fecha_inicio,
            fecha_fin: evento.fecha_fin,
            lugar: evento.lugar.clone(),
            materiales_aceptados: evento.materiales_aceptados.clone(),
            premios: evento.premios.clone(),
            organizador: evento.organizador.clone(),
            imagen_url: None,
        });
        Ok(id)
    }

    async fn list_participants(&self, evento_id: i64) -> Result<Vec<Participante>, StoreError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.participantes.iter().filter(|p| p.evento_id == evento_id).cloned().collect())
    }

    async fn register_participant(&self, evento_id: i64, participante: &NuevoParticipante) -> Result<i64, StoreError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.eventos.iter().any(|e| e.id == evento_id) {
            return Err(StoreError::NotFound(format!("evento {}", evento_id)));
        }
        let id = tables.participantes.len() as i64 + 1;
        tables.participantes.push(Participante {
            id,
            nombre: participante.nombre.clone(),
            tipo: participante.tipo.clone(),
            evento_id,
            imagen_url: None,
        });
        Ok(id)
    }

    async fn register_material(&self, evento_id: i64, registro: &NuevoRegistro) -> Result<i64, StoreError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let enrolled = tables
            .participantes
            .iter()
            .any(|p| p.id == registro.participante_id && p.evento_id == evento_id);
        if !enrolled {
            return Err(StoreError::NotFound(format!(
                "participante {} in evento {}",
                registro.participante_id, evento_id
            )));
        }
        let id = tables.registros.len() as i64 + 1;
        tables.registros.push(Registro {
            id,
            participante_id: registro.participante_id,
            evento_id,
            material: registro.material.clone(),
            cantidad: registro.cantidad,
            fecha_registro: chrono::Utc::now(),
            foto_url: None,
        });
        Ok(id)
    }

    async fn list_material_records(&self, evento_id: i64) -> Result<Vec<RegistroMaterial>, StoreError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let rows = tables
            .registros
            .iter()
            .filter(|r| r.evento_id == evento_id)
            .filter_map(|r| {
                let p = tables.participantes.iter().find(|p| p.id == r.participante_id)?;
                Some(RegistroMaterial {
                    id: r.id,
                    participante: p.nombre.clone(),
                    material: r.material.clone(),
                    cantidad: r.cantidad,
                    fecha_registro: r.fecha_registro,
                    foto_url: r.foto_url.clone(),
                })
            })
            .collect();
        Ok(rows)
    }

    async fn set_image_url(&self, target: ImageTarget, id: i64, url: &str) -> Result<u64, StoreError> {
        self.check()?;
        if self.failing_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Db(sqlx::Error::Protocol("connection reset during UPDATE".into())));
        }
        let mut tables = self.tables.lock().unwrap();
        let slot = match target {
            ImageTarget::Evento => tables.eventos.iter_mut().find(|e| e.id == id).map(|e| &mut e.imagen_url),
            ImageTarget::Participante => tables
                .participantes
                .iter_mut()
                .find(|p| p.id == id)
                .map(|p| &mut p.imagen_url),
            ImageTarget::Registro => tables.registros.iter_mut().find(|r| r.id == id).map(|r| &mut r.foto_url),
        };
        match slot {
            Some(slot) => {
                *slot = Some(url.to_string());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

#[derive(Default)]
pub struct MemoryBlobs {
    objects: Mutex<BTreeMap<String, Bytes>>,
    pub failing_puts: AtomicBool,
}

impl MemoryBlobs {
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobs {
    async fn put(&self, key: &str, _content_type: Option<&str>, body: Bytes) -> Result<String, BlobError> {
        if self.failing_puts.load(Ordering::SeqCst) {
            return Err(BlobError::Upload {
                key: key.to_string(),
                message: "bucket unreachable".into(),
            });
        }
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(format!("https://blobs.test/{}", key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub blobs: Arc<MemoryBlobs>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let blobs = Arc::new(MemoryBlobs::default());
        let state = AppState::new(store.clone(), blobs.clone());
        Self {
            router: app(state, 1024 * 1024),
            store,
            blobs,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_file(&self, uri: &str, field: &str, file_name: &str, content: &[u8]) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
                .body(Body::from(multipart_body(field, file_name, content)))
                .unwrap(),
        )
        .await
    }

    /// Multipart POST of a prebuilt body; `chunked` streams it without a content length.
    pub async fn post_multipart(&self, uri: &str, body: Vec<u8>, chunked: bool) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY));
        let request = if chunked {
            let chunks: Vec<Result<Bytes, std::io::Error>> =
                body.chunks(64 * 1024).map(|c| Ok(Bytes::copy_from_slice(c))).collect();
            builder.body(Body::from_stream(futures::stream::iter(chunks))).unwrap()
        } else {
            builder
                .header("content-length", body.len())
                .body(Body::from(body))
                .unwrap()
        };
        self.send(request).await
    }

    /// Creates the "Playa Limpia" event and returns its id.
    pub async fn seed_evento(&self) -> i64 {
        let (status, body) = self.post_json("/eventos", playa_limpia()).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn seed_participante(&self, evento_id: i64, nombre: &str) -> i64 {
        let (status, body) = self
            .post_json(
                &format!("/eventos/{}/participantes", evento_id),
                serde_json::json!({ "nombre": nombre, "tipo": "equipo" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["id"].as_i64().unwrap()
    }
}

pub fn playa_limpia() -> Value {
    serde_json::json!({
        "nombre": "Playa Limpia",
        "descripcion": "...",
        "fecha_inicio": "2024-01-01",
        "fecha_fin": "2024-01-02",
        "lugar": "Costa",
        "materiales_aceptados": "plastico",
        "premios": "camisetas",
        "organizador": "ONG X"
    })
}

pub fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    multipart_parts(&[(field, Some(file_name), content)])
}

/// Multipart body with one part per `(name, filename, content)`; `None` makes a plain text part.
pub fn multipart_parts(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
            }
            None => {
                body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes())
            }
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
