//! HTTP handlers: each maps one route to one store operation (or the image attachment).

pub mod eventos;
pub mod imagenes;
pub mod participantes;
pub mod registros;
